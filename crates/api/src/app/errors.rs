use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use tallybook_core::{DomainError, TransactionKind};
use tallybook_ledger::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::Domain(DomainError::Validation { field, reason }) => {
            validation_error(field, reason)
        }
        LedgerError::Domain(DomainError::InvalidId(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg)
        }
        LedgerError::Domain(DomainError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "not found")
        }
        LedgerError::Store(e) => {
            // Full detail goes to the log only; the client gets a generic 500.
            tracing::error!(error = %e, "storage failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "storage backend failure",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Structural rejection of a request body (missing field, wrong type,
/// malformed JSON), normalized to the same shape as domain validation.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    let message = rejection.body_text();

    match field_from_body_text(&message) {
        Some(field) => validation_error(field, message.clone()),
        None => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
    }
}

const DESERIALIZE_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Best-effort extraction of the offending field from a serde body-error
/// message. Axum routes `Json` deserialization through `serde_path_to_error`,
/// so a wrong-typed field is reported as `<path>: <detail>`; a missing field
/// is reported as ``missing field `<name>` ``.
fn field_from_body_text(text: &str) -> Option<&str> {
    if let Some(rest) = text.split("missing field ").nth(1) {
        let rest = rest.trim_start_matches('`');
        let end = rest
            .find(|c: char| c == '`' || c.is_whitespace())
            .unwrap_or(rest.len());
        return Some(&rest[..end]).filter(|f| !f.is_empty());
    }

    let rest = text.strip_prefix(DESERIALIZE_PREFIX).unwrap_or(text);
    let head = rest.split(':').next()?.trim();
    let is_path = !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    is_path.then_some(head)
}

/// Field-level validation rejection (which field failed and why).
pub fn validation_error(field: &str, reason: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_error",
            "field": field,
            "message": reason.into(),
        })),
    )
        .into_response()
}

pub fn parse_transaction_kind(s: &str) -> Result<TransactionKind, axum::response::Response> {
    s.parse::<TransactionKind>().map_err(|e| match e {
        DomainError::Validation { field, reason } => validation_error(field, reason),
        other => json_error(StatusCode::BAD_REQUEST, "validation_error", other.to_string()),
    })
}
