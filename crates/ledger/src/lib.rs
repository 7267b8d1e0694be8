//! `tallybook-ledger` — the session-scoped transaction ledger service.
//!
//! Validation, sign normalization, and aggregation live here. The service
//! holds an explicitly passed storage handle and takes the resolved
//! `SessionId` as an argument on every call; it never reads identity from
//! ambient context.

pub mod service;

pub use service::{LedgerError, LedgerService, RecordEntry};
