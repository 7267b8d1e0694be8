use std::sync::Arc;

use thiserror::Error;

use tallybook_core::{DomainError, SessionId, Transaction, TransactionId, TransactionKind};
use tallybook_store::{NewTransaction, StoreError, TransactionStore};

/// Validated-against input for recording a new ledger entry.
///
/// `amount` is the client-supplied magnitude; the stored sign is derived
/// from `kind` at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub title: String,
    pub amount: i64,
    pub kind: TransactionKind,
}

/// Ledger service error.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The transaction ledger, scoped per session on every call.
///
/// Holds no state beyond the storage handle; requests are served
/// independently and every operation touches at most one row on the write
/// path.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<dyn TransactionStore>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    /// Record a new transaction for `session_id`.
    ///
    /// Validation happens before any storage access; on success the stored
    /// amount is `+amount` for credit and `-amount` for debit.
    pub async fn record(
        &self,
        session_id: SessionId,
        entry: RecordEntry,
    ) -> Result<TransactionId, LedgerError> {
        if entry.title.trim().is_empty() {
            return Err(DomainError::validation("title", "must not be empty").into());
        }
        if entry.amount <= 0 {
            return Err(DomainError::validation("amount", "must be a positive magnitude").into());
        }

        let id = TransactionId::new();
        let amount = entry.kind.signed(entry.amount);

        self.store
            .insert(NewTransaction {
                id,
                session_id,
                title: entry.title,
                amount,
            })
            .await?;

        tracing::debug!(%id, %session_id, amount, kind = entry.kind.as_str(), "transaction recorded");
        Ok(id)
    }

    /// All transactions owned by `session_id`, in insertion order.
    pub async fn list(&self, session_id: SessionId) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.store.list_for_session(session_id).await?)
    }

    /// The transaction matching both `id` and `session_id`.
    ///
    /// A row owned by a different session yields the same `NotFound` as a
    /// row that does not exist; existence never leaks across sessions.
    pub async fn get(
        &self,
        session_id: SessionId,
        id: TransactionId,
    ) -> Result<Transaction, LedgerError> {
        self.store
            .get_for_session(session_id, id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    /// Signed sum of all amounts owned by `session_id` (0 when empty).
    pub async fn summary(&self, session_id: SessionId) -> Result<i64, LedgerError> {
        Ok(self.store.sum_for_session(session_id).await?)
    }
}
