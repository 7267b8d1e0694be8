//! Session identity resolver.
//!
//! Identity is an opaque `sessionId` cookie minted by the server on first
//! write and reused verbatim afterwards. Non-creation routes require it to
//! be present; the creation route mints one when absent. A session is
//! never silently rotated.

use std::str::FromStr;

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};

use tallybook_core::SessionId;

use crate::app::errors;
use crate::context::SessionContext;

pub const SESSION_COOKIE: &str = "sessionId";

/// Cookie validity window: 7 days, path-scoped to root.
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Extract the session identifier from the request's `Cookie` headers.
///
/// A cookie whose value is not a well-formed UUID is treated as absent.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else { continue };

        for pair in value.split(';') {
            let Some((name, raw)) = pair.trim().split_once('=') else {
                continue;
            };
            if name != SESSION_COOKIE {
                continue;
            }
            if let Ok(session_id) = SessionId::from_str(raw.trim()) {
                return Some(session_id);
            }
        }
    }

    None
}

/// `Set-Cookie` value instructing the client to retain `session_id`.
pub fn session_cookie(session_id: SessionId) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; Max-Age={SESSION_MAX_AGE_SECS}")
}

/// Middleware guarding the transaction routes.
///
/// Creation (POST) is the one operation allowed to arrive without a
/// session; its handler resolves or mints the identifier itself. Every
/// other operation is rejected here, before it can reach the ledger
/// service or storage.
pub async fn require_session(mut req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::POST {
        return next.run(req).await;
    }

    match session_from_headers(req.headers()) {
        Some(session_id) => {
            req.extensions_mut().insert(SessionContext::new(session_id));
            next.run(req).await
        }
        None => errors::json_error(
            StatusCode::UNAUTHORIZED,
            "missing_session",
            format!("a valid {SESSION_COOKIE} cookie is required"),
        ),
    }
}
