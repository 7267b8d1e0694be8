//! `tallybook-store` — persistence for the transaction ledger.
//!
//! The `TransactionStore` trait is the seam between the ledger service and
//! storage. Two implementations:
//! - `PgTransactionStore`: Postgres via sqlx (production).
//! - `InMemoryTransactionStore`: tests/dev.

mod in_memory;
mod postgres;
mod r#trait;

pub use in_memory::InMemoryTransactionStore;
pub use postgres::{PgTransactionStore, ensure_schema};
pub use r#trait::{NewTransaction, StoreError, TransactionStore};
