//! Logout response shape.

use aegis_session::{Access, SessionHandle};
use aegis_types::SessionId;

/// The outcome of a logout (single-session or bulk-by-principal).
///
/// Carries every session the operation destroyed — the root first, then
/// any delegated sessions the cascade reached.
#[derive(Debug, Clone, Default)]
pub struct LogoutResponse {
    sessions: Vec<SessionHandle>,
}

impl LogoutResponse {
    /// Nothing was destroyed (unknown id, or the principal had no
    /// sessions).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A logout that destroyed the given sessions.
    #[must_use]
    pub fn new(sessions: Vec<SessionHandle>) -> Self {
        Self { sessions }
    }

    /// The destroyed sessions.
    #[must_use]
    pub fn sessions(&self) -> &[SessionHandle] {
        &self.sessions
    }

    /// Ids of the destroyed sessions.
    #[must_use]
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.iter().map(|s| *s.read().id()).collect()
    }

    /// Whether anything was destroyed.
    #[must_use]
    pub fn destroyed_any(&self) -> bool {
        !self.sessions.is_empty()
    }

    /// Accesses across all destroyed sessions whose relying parties
    /// still hold local sessions (single logout did not reach them).
    #[must_use]
    pub fn remaining_accesses(&self) -> Vec<Access> {
        self.sessions
            .iter()
            .flat_map(|s| s.read().logged_in_accesses())
            .collect()
    }
}
