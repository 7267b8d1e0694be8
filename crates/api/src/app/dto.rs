use serde::Deserialize;
use serde_json::json;

use tallybook_core::Transaction;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    pub title: String,
    pub amount: i64,
    /// `"credit"` or `"debit"`; parsed into `TransactionKind` at the
    /// boundary so the rejection names the field.
    #[serde(rename = "type")]
    pub kind: String,
}

// -------------------------
// Response mapping
// -------------------------

pub fn transaction_to_json(tx: &Transaction) -> serde_json::Value {
    json!({
        "id": tx.id,
        "title": tx.title,
        "amount": tx.amount,
        "session_id": tx.session_id,
        "created_at": tx.created_at,
    })
}
