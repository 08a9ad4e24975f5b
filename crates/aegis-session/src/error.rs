//! Session-layer error types.

use aegis_types::{AccessId, SessionId};
use thiserror::Error;

/// Error from a mutating operation on a [`Session`](crate::Session).
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The session is invalidated; only cascade-invalidation may still
    /// touch it.
    #[error("session {id} is invalidated")]
    Invalidated {
        /// The invalidated session.
        id: SessionId,
    },

    /// A session cannot be built from a failed authentication response.
    #[error("authentication response carries no principal")]
    MissingPrincipal,

    /// The named access does not belong to this session.
    #[error("access {access} not found in session")]
    AccessNotFound {
        /// The token that was looked up.
        access: AccessId,
    },
}

/// In-band failure of a token validation.
///
/// These are protocol outcomes, not faults: the orchestrator folds them
/// into the factory-built response and the relying party sees a
/// well-formed error body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessValidationError {
    /// A bounded-use token was already consumed.
    #[error("token already used")]
    TokenUsed,

    /// The token was presented for a different service than it was
    /// granted to.
    #[error("token granted to {granted}, presented for {presented}")]
    ResourceMismatch {
        /// Resource the token was minted for.
        granted: String,
        /// Resource named in the validation request.
        presented: String,
    },
}

/// Error from the session store backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot answer right now. Transient; the caller may
    /// retry, the core does not.
    #[error("session store unavailable: {reason}")]
    Unavailable {
        /// Backend-supplied detail.
        reason: String,
    },

    /// The store refused the operation for a domain reason (e.g.
    /// creating a session from a failed authentication).
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_ids() {
        let id = SessionId::new();
        let err = SessionError::Invalidated { id };
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn storage_error_wraps_session_error() {
        let err: StorageError = SessionError::MissingPrincipal.into();
        assert!(err.to_string().contains("no principal"));
    }
}
