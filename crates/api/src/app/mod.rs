//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: ledger service wiring over the storage handle
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};

use tallybook_store::TransactionStore;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// The storage handle is passed in explicitly so tests can substitute the
/// in-memory store.
pub fn build_app(store: Arc<dyn TransactionStore>) -> Router {
    let services = Arc::new(services::AppServices::new(store));

    routes::router().layer(Extension(services))
}
