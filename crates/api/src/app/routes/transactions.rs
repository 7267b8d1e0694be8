use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use tallybook_core::{SessionId, TransactionId};
use tallybook_ledger::RecordEntry;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;
use crate::session;

/// Transaction routes. The session middleware guards every read; creation
/// (the POST route) resolves or mints its session inside the handler.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list).post(record))
        .route("/summary", get(summary))
        .route("/:id", get(get_by_id))
        .layer(axum::middleware::from_fn(session::require_session))
}

pub async fn record(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    body: Result<Json<dto::RecordTransactionRequest>, JsonRejection>,
) -> axum::response::Response {
    // Structural body failures get the same field-level shape as domain
    // validation, not the extractor's default rejection.
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let kind = match errors::parse_transaction_kind(&body.kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    // Reuse the caller's session unchanged, or mint a fresh one for a
    // first-time writer.
    let (session_id, minted) = match session::session_from_headers(&headers) {
        Some(existing) => (existing, false),
        None => (SessionId::mint(), true),
    };

    let entry = RecordEntry {
        title: body.title,
        amount: body.amount,
        kind,
    };

    if let Err(e) = services.ledger().record(session_id, entry).await {
        return errors::ledger_error_to_response(e);
    }

    let mut response = StatusCode::CREATED.into_response();
    if minted {
        match HeaderValue::from_str(&session::session_cookie(session_id)) {
            Ok(value) => {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to encode session cookie");
                return errors::json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "failed to attach session cookie",
                );
            }
        }
    }

    response
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.ledger().list(session.session_id()).await {
        Ok(rows) => {
            let transactions = rows.iter().map(dto::transaction_to_json).collect::<Vec<_>>();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "transactions": transactions })),
            )
                .into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    // Malformed ids are rejected here, before any storage lookup.
    let id = match TransactionId::from_str(&id) {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()),
    };

    match services.ledger().get(session.session_id(), id).await {
        Ok(tx) => (StatusCode::OK, Json(dto::transaction_to_json(&tx))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    match services.ledger().summary(session.session_id()).await {
        Ok(amount) => (
            StatusCode::OK,
            Json(serde_json::json!({ "summary": { "amount": amount } })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
