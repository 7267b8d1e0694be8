use thiserror::Error;

use tallybook_core::{SessionId, Transaction, TransactionId};

/// A transaction ready to be persisted.
///
/// `amount` is already sign-normalized by the ledger service; the store
/// persists it verbatim. `created_at` is assigned by the backend at insert
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub id: TransactionId,
    pub session_id: SessionId,
    pub title: String,
    pub amount: i64,
}

/// Storage-layer error.
///
/// Anything the backend reports is fatal for the current request; there is
/// no retry and each operation touches at most one row.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violation (duplicate transaction id).
    #[error("conflict in {operation}: {message}")]
    Conflict {
        operation: &'static str,
        message: String,
    },

    /// Any other backend failure (connection, query, deserialization).
    #[error("storage backend failure in {operation}: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

/// Session-scoped persistence for ledger transactions.
///
/// Every method takes the owning `SessionId` explicitly; implementations
/// must never return a row belonging to a different session.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a new transaction. Single-row insert; backend atomicity is
    /// the only transactional guarantee required.
    async fn insert(&self, tx: NewTransaction) -> Result<(), StoreError>;

    /// All transactions for a session, in insertion order. An empty ledger
    /// yields an empty vector.
    async fn list_for_session(&self, session_id: SessionId) -> Result<Vec<Transaction>, StoreError>;

    /// The single transaction matching BOTH id and session, if any.
    async fn get_for_session(
        &self,
        session_id: SessionId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Signed sum of all amounts for a session; 0 for an empty ledger.
    async fn sum_for_session(&self, session_id: SessionId) -> Result<i64, StoreError>;
}
