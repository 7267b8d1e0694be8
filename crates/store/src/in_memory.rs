use std::sync::RwLock;

use chrono::Utc;

use tallybook_core::{SessionId, Transaction, TransactionId};

use crate::r#trait::{NewTransaction, StoreError, TransactionStore};

/// In-memory transaction store.
///
/// Intended for tests/dev. Rows are kept in insertion order; session
/// scoping is applied on every read, matching the Postgres queries.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    rows: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(operation: &'static str) -> StoreError {
    StoreError::Backend {
        operation,
        message: "lock poisoned".to_string(),
    }
}

#[async_trait::async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, tx: NewTransaction) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned("insert"))?;

        if rows.iter().any(|t| t.id == tx.id) {
            return Err(StoreError::Conflict {
                operation: "insert",
                message: format!("duplicate transaction id {}", tx.id),
            });
        }

        rows.push(Transaction {
            id: tx.id,
            title: tx.title,
            amount: tx.amount,
            session_id: tx.session_id,
            created_at: Utc::now(),
        });

        Ok(())
    }

    async fn list_for_session(&self, session_id: SessionId) -> Result<Vec<Transaction>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned("list_for_session"))?;

        Ok(rows
            .iter()
            .filter(|t| t.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn get_for_session(
        &self,
        session_id: SessionId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned("get_for_session"))?;

        Ok(rows
            .iter()
            .find(|t| t.id == id && t.session_id == session_id)
            .cloned())
    }

    async fn sum_for_session(&self, session_id: SessionId) -> Result<i64, StoreError> {
        let rows = self.rows.read().map_err(|_| poisoned("sum_for_session"))?;

        Ok(rows
            .iter()
            .filter(|t| t.session_id == session_id)
            .map(|t| t.amount)
            .sum())
    }
}
