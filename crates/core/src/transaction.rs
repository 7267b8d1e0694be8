//! The ledger transaction record and its sign-normalization rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::{SessionId, TransactionId};

/// Direction of a ledger entry, as supplied by the client.
///
/// The stored amount's sign is derived from this discriminator at write
/// time; the client never controls the sign directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

impl TransactionKind {
    /// Apply this kind's sign to a positive magnitude.
    ///
    /// `credit` keeps the magnitude positive, `debit` negates it. Callers
    /// are expected to have validated `magnitude > 0` already.
    pub fn signed(self, magnitude: i64) -> i64 {
        match self {
            TransactionKind::Credit => magnitude,
            TransactionKind::Debit => -magnitude,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }
}

impl core::str::FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            other => Err(DomainError::validation(
                "type",
                format!("must be \"credit\" or \"debit\", got {other:?}"),
            )),
        }
    }
}

/// A single immutable ledger entry, owned by exactly one session.
///
/// `amount` is stored already sign-normalized (positive = credit,
/// negative = debit). There is no update or delete for this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    pub amount: i64,
    pub session_id: SessionId,
    pub created_at: DateTime<Utc>,
}
