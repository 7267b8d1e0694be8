use tallybook_core::SessionId;

/// Session context for a request.
///
/// Inserted by the session middleware; immutable and required for every
/// ledger route except transaction creation (which may mint its own).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session_id: SessionId,
}

impl SessionContext {
    pub fn new(session_id: SessionId) -> Self {
        Self { session_id }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}
