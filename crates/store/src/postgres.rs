//! Postgres-backed transaction store.
//!
//! Session isolation is enforced at the query level: every read includes
//! `session_id` in the WHERE clause, so a row belonging to another session
//! can never be loaded, not even by primary key.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | Postgres Error Code | StoreError | Scenario |
//! |------------|---------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate transaction id (practically unreachable with 128-bit ids) |
//! | Database (other) | Any other | `Backend` | Constraint/query failures |
//! | PoolClosed | N/A | `Backend` | Connection pool was closed |
//! | Other | N/A | `Backend` | Network errors, connection failures, etc. |

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use std::sync::Arc;
use tracing::instrument;

use tallybook_core::{SessionId, Transaction, TransactionId};

use crate::r#trait::{NewTransaction, StoreError, TransactionStore};

/// Idempotent bootstrap DDL for the single `transactions` table.
///
/// `created_at` defaults to the database clock so insertion order is
/// decided by the backend, not by per-process clocks.
const SCHEMA_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id         UUID PRIMARY KEY,
    title      TEXT NOT NULL,
    amount     BIGINT NOT NULL,
    session_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS transactions_session_idx
    ON transactions (session_id, created_at);
"#;

/// Create the `transactions` table if it does not exist yet.
///
/// Safe to run at every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA_DDL)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    Ok(())
}

/// Postgres-backed `TransactionStore`.
///
/// Thread-safe: all operations go through the sqlx connection pool. No
/// application-level locking; single-row inserts rely on the backend's own
/// atomicity.
#[derive(Debug, Clone)]
pub struct PgTransactionStore {
    pool: Arc<PgPool>,
}

impl PgTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl TransactionStore for PgTransactionStore {
    #[instrument(skip(self, tx), fields(id = %tx.id, session_id = %tx.session_id), err)]
    async fn insert(&self, tx: NewTransaction) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, title, amount, session_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(tx.id.as_uuid())
        .bind(&tx.title)
        .bind(tx.amount)
        .bind(tx.session_id.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(())
    }

    // Rapid inserts can share a NOW() timestamp; the time-ordered UUIDv7 id
    // breaks the tie so the composite order is exactly insertion order.
    #[instrument(skip(self), fields(session_id = %session_id), err)]
    async fn list_for_session(&self, session_id: SessionId) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, amount, session_id, created_at
            FROM transactions
            WHERE session_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_for_session", e))?;

        let mut transactions = Vec::with_capacity(rows.len());
        for row in rows {
            let parsed = TransactionRow::from_row(&row)
                .map_err(|e| row_error("list_for_session", e))?;
            transactions.push(parsed.into());
        }

        Ok(transactions)
    }

    #[instrument(skip(self), fields(session_id = %session_id, id = %id), err)]
    async fn get_for_session(
        &self,
        session_id: SessionId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, amount, session_id, created_at
            FROM transactions
            WHERE id = $1 AND session_id = $2
            LIMIT 1
            "#,
        )
        .bind(id.as_uuid())
        .bind(session_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_for_session", e))?;

        match row {
            Some(row) => {
                let parsed = TransactionRow::from_row(&row)
                    .map_err(|e| row_error("get_for_session", e))?;
                Ok(Some(parsed.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self), fields(session_id = %session_id), err)]
    async fn sum_for_session(&self, session_id: SessionId) -> Result<i64, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT AS total
            FROM transactions
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("sum_for_session", e))?;

        let total: i64 = row
            .try_get("total")
            .map_err(|e| row_error("sum_for_session", e))?;

        Ok(total)
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Conflict { operation, message }
            } else {
                StoreError::Backend { operation, message }
            }
        }
        sqlx::Error::PoolClosed => StoreError::Backend {
            operation,
            message: "connection pool closed".to_string(),
        },
        other => StoreError::Backend {
            operation,
            message: other.to_string(),
        },
    }
}

fn row_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    StoreError::Backend {
        operation,
        message: format!("failed to deserialize row: {err}"),
    }
}

#[derive(Debug)]
struct TransactionRow {
    id: uuid::Uuid,
    title: String,
    amount: i64,
    session_id: uuid::Uuid,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for TransactionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(TransactionRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            amount: row.try_get("amount")?,
            session_id: row.try_get("session_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            id: TransactionId::from_uuid(row.id),
            title: row.title,
            amount: row.amount,
            session_id: SessionId::from_uuid(row.session_id),
            created_at: row.created_at,
        }
    }
}
