//! `tallybook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no HTTP or storage
//! concerns): typed identifiers, the transaction record, and the domain
//! error model.

pub mod error;
pub mod id;
pub mod transaction;

pub use error::{DomainError, DomainResult};
pub use id::{SessionId, TransactionId};
pub use transaction::{Transaction, TransactionKind};
