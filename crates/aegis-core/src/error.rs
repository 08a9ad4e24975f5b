//! Orchestrator error taxonomy.
//!
//! Only non-proxied `grant_access` failures surface as `Err`; the
//! front-end converts them into protocol faults. Authentication and
//! token-validation failures always travel in-band inside the response
//! objects.

use aegis_session::StorageError;
use aegis_types::SessionId;
use thiserror::Error;

/// Error surfaced by an [`Authority`](crate::Authority) operation.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// The target service is not registered with the authority.
    #[error("service [{service_id}] not authorized to use the authority")]
    UnauthorizedService {
        /// The unmatched service URI.
        service_id: String,
    },

    /// The named session is not in the store, or the request named no
    /// session at all (non-proxied request).
    #[error("session [{}] could not be found", .id.as_ref().map_or_else(|| "none".to_string(), ToString::to_string))]
    SessionNotFound {
        /// The session that was looked up, when the request named one.
        id: Option<SessionId>,
    },

    /// The session exists but is invalidated or expired (non-proxied
    /// request).
    #[error("session [{id}] is no longer valid")]
    SessionInvalidated {
        /// The dead session.
        id: SessionId,
    },

    /// The store backend could not answer. Transient; the caller
    /// retries, the core does not.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
