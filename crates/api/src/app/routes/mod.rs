use axum::{Router, routing::get};

pub mod system;
pub mod transactions;

/// Top-level routing tree.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/transactions", transactions::router())
}
