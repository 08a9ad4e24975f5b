//! Session storage abstraction.
//!
//! The [`SessionStorage`] trait is the seam between the authority core
//! and whatever holds the canonical session records (the in-memory
//! reference store, or an external backend). This allows pluggable
//! storage without the core knowing about persistence formats.

use crate::{Session, SessionHandle, StorageError};
use aegis_auth::AuthenticationResponse;
use aegis_types::{AccessId, SessionId};

/// Durable, indexed store of sessions.
///
/// # Indexes
///
/// | Index | Key | Value |
/// |-------|-----|-------|
/// | by id | session id | session |
/// | by access | access token | owning session |
/// | by principal | principal id | set of sessions |
///
/// Only accesses with [`requires_storage`](crate::Access::requires_storage)
/// appear in the token index.
///
/// # Consistency Contract
///
/// - Every index operation is linearizable with respect to a single
///   session id; `create_session` and `destroy_session` are atomic
///   across all three indexes.
/// - A lookup after a completed create/update/destroy on the same
///   session observes that operation's effects.
/// - Cross-session operations (bulk logout) are **not** globally
///   atomic; each session's destroy is its own linearization point.
/// - Mutation of one `Session` is serialized by the handle's own lock;
///   the store never holds a session lock while holding its index lock.
///
/// # Update Semantics
///
/// `update_session` takes a *snapshot* and must be idempotent over
/// (session, access-set) snapshots: it adds token-index entries for
/// newly granted stored accesses, removes entries only for accesses the
/// snapshot shows as consumed, and installs sessions it has never seen
/// (that is how delegated sessions are persisted). It must never remove
/// entries merely because the snapshot predates a concurrent grant, and
/// it must never resurrect a destroyed session from a stale snapshot —
/// destruction is terminal.
pub trait SessionStorage: Send + Sync {
    /// Atomically allocates a session for a successful authentication
    /// and installs it in all indexes.
    ///
    /// # Errors
    ///
    /// [`StorageError::Session`] when the response carries no principal;
    /// [`StorageError::Unavailable`] when the backend cannot answer.
    fn create_session(
        &self,
        response: &AuthenticationResponse,
    ) -> Result<SessionHandle, StorageError>;

    /// Refreshes index entries from a session snapshot. See the trait
    /// docs for the exact semantics.
    ///
    /// # Errors
    ///
    /// [`StorageError::Unavailable`] when the backend cannot answer.
    fn update_session(&self, snapshot: &Session) -> Result<(), StorageError>;

    /// Removes a session from every index and returns the detached
    /// handle. The caller invalidates it; the store does not.
    ///
    /// Idempotent: an unknown or already-destroyed id returns `None`.
    ///
    /// # Errors
    ///
    /// [`StorageError::Unavailable`] when the backend cannot answer.
    fn destroy_session(&self, id: &SessionId) -> Result<Option<SessionHandle>, StorageError>;

    /// Looks a session up by id.
    ///
    /// # Errors
    ///
    /// [`StorageError::Unavailable`] when the backend cannot answer.
    fn find_session_by_session_id(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionHandle>, StorageError>;

    /// Looks a session up by one of its access tokens.
    ///
    /// # Errors
    ///
    /// [`StorageError::Unavailable`] when the backend cannot answer.
    fn find_session_by_access_id(
        &self,
        id: &AccessId,
    ) -> Result<Option<SessionHandle>, StorageError>;

    /// All sessions belonging to a principal.
    ///
    /// # Errors
    ///
    /// [`StorageError::Unavailable`] when the backend cannot answer.
    fn find_sessions_by_principal(
        &self,
        principal_id: &str,
    ) -> Result<Vec<SessionHandle>, StorageError>;

    /// Ids of every stored session, for the expiry sweep.
    ///
    /// # Errors
    ///
    /// [`StorageError::Unavailable`] when the backend cannot answer.
    fn session_ids(&self) -> Result<Vec<SessionId>, StorageError>;
}
