//! The authenticated session: a principal's long-lived context.

use crate::{Access, ExpirationPolicy, LogoutNotifier, ServiceAccessRequest, SessionError};
use aegis_auth::{Authentication, AuthenticationResponse};
use aegis_types::{AccessId, Principal, SessionId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Shared, per-session-locked handle to a canonical session record.
///
/// The store owns the canonical records and hands these out; the
/// per-session lock is what serializes concurrent mutation of one
/// session while different sessions proceed in parallel.
pub type SessionHandle = Arc<RwLock<Session>>;

/// Points from a delegated session to the access that minted it.
///
/// Parent/child relations are ids, never owned objects: lookups go
/// through the store, so no reference cycles exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRef {
    /// Session the access belongs to.
    pub session: SessionId,
    /// The delegation-anchoring access.
    pub access: AccessId,
}

/// A principal's authenticated context.
///
/// # State Machine
///
/// `ACTIVE → INVALIDATED`, one way, terminal. Login creates an active
/// session; logout, admin logout, parent invalidation or the expiry
/// sweep invalidate it. An invalidated session rejects every mutating
/// operation except cascade invalidation itself.
///
/// # Ownership
///
/// A session exclusively owns its accesses (by value, keyed by token)
/// and records its delegated children by id only. The store indexes
/// both; nothing else holds references. `Clone` produces a *snapshot* —
/// the canonical record stays wherever the store put it, and snapshots
/// exist to feed the store's index-sync path.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    parent: Option<AccessRef>,
    principal: Principal,
    authentications: Vec<Authentication>,
    accesses: HashMap<AccessId, Access>,
    child_ids: Vec<SessionId>,
    created: Instant,
    last_used: Instant,
    long_term: bool,
    invalidated: bool,
}

impl Session {
    /// Builds a root session from a successful authentication.
    ///
    /// # Errors
    ///
    /// [`SessionError::MissingPrincipal`] when the response did not
    /// succeed — a session always rests on at least one authentication.
    pub fn from_authentication(response: &AuthenticationResponse) -> Result<Self, SessionError> {
        let principal = response
            .principal()
            .ok_or(SessionError::MissingPrincipal)?
            .clone();
        if response.authentications().is_empty() {
            return Err(SessionError::MissingPrincipal);
        }
        let now = Instant::now();
        Ok(Self {
            id: SessionId::new(),
            parent: None,
            principal,
            authentications: response.authentications().to_vec(),
            accesses: HashMap::new(),
            child_ids: Vec::new(),
            created: now,
            last_used: now,
            long_term: response.is_long_term(),
            invalidated: false,
        })
    }

    /// The stable session id.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The access that delegated this session, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&AccessRef> {
        self.parent.as_ref()
    }

    /// The authenticated identity.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Every authentication event accumulated by this session, oldest
    /// first. Never empty.
    #[must_use]
    pub fn authentications(&self) -> &[Authentication] {
        &self.authentications
    }

    /// Ids of sessions delegated from this one.
    #[must_use]
    pub fn child_ids(&self) -> &[SessionId] {
        &self.child_ids
    }

    /// All live accesses, in no particular order.
    pub fn accesses(&self) -> impl Iterator<Item = &Access> {
        self.accesses.values()
    }

    /// When the session was created.
    #[must_use]
    pub fn created(&self) -> Instant {
        self.created
    }

    /// When the session last granted or validated something.
    #[must_use]
    pub fn last_used(&self) -> Instant {
        self.last_used
    }

    /// Whether this is a long-term ("remember-me") session.
    #[must_use]
    pub fn is_long_term(&self) -> bool {
        self.long_term
    }

    /// Whether the session has been invalidated.
    #[must_use]
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// `true` while the session is neither invalidated nor expired
    /// under `policy`.
    #[must_use]
    pub fn is_valid(&self, policy: &dyn ExpirationPolicy) -> bool {
        !self.invalidated && !policy.is_expired(self)
    }

    /// Marks activity for sliding expiration.
    pub fn touch(&mut self) {
        self.last_used = Instant::now();
    }

    /// Mints a fresh access for the requested service and returns a
    /// snapshot of it.
    ///
    /// Always mints a new token — token values are one-shot unique.
    /// Idempotent-grant reuse, where a response factory opts into it,
    /// is the orchestrator's business.
    ///
    /// # Errors
    ///
    /// [`SessionError::Invalidated`] on an invalidated session.
    pub fn grant(&mut self, request: &ServiceAccessRequest) -> Result<Access, SessionError> {
        if self.invalidated {
            return Err(SessionError::Invalidated { id: self.id });
        }
        self.touch();
        let access = Access::mint(self.id, request);
        let id = *access.id();
        tracing::debug!(session = %self.id, access = %id, service = request.service_id(),
            "granted access");
        self.accesses.insert(id, access.clone());
        Ok(access)
    }

    /// Looks up an access owned by this session.
    #[must_use]
    pub fn get_access(&self, id: &AccessId) -> Option<&Access> {
        self.accesses.get(id)
    }

    /// Mutable access lookup, for validation.
    #[must_use]
    pub fn get_access_mut(&mut self, id: &AccessId) -> Option<&mut Access> {
        self.accesses.get_mut(id)
    }

    /// Finds an unconsumed access already granted to `service_id`, for
    /// factories that declare granting idempotent.
    #[must_use]
    pub fn find_reusable_access(&self, service_id: &str) -> Option<&Access> {
        self.accesses
            .values()
            .find(|a| a.resource_id() == service_id && !a.is_used())
    }

    /// Appends an authentication from a forced re-auth of the same
    /// principal.
    pub fn add_authentications(&mut self, authentications: &[Authentication]) {
        self.authentications.extend_from_slice(authentications);
        self.touch();
    }

    /// Mints a delegated session anchored on one of this session's
    /// accesses.
    ///
    /// The child is returned unstored; the orchestrator persists it via
    /// the store's update path. The child's parent pointer and this
    /// session's child list are both ids.
    ///
    /// # Errors
    ///
    /// [`SessionError::Invalidated`] when this session is invalidated,
    /// [`SessionError::AccessNotFound`] when the anchoring access does
    /// not belong to this session, [`SessionError::MissingPrincipal`]
    /// when the delegation authentication did not succeed.
    pub fn delegate(
        &mut self,
        access_id: &AccessId,
        response: &AuthenticationResponse,
    ) -> Result<Session, SessionError> {
        if self.invalidated {
            return Err(SessionError::Invalidated { id: self.id });
        }
        if !self.accesses.contains_key(access_id) {
            return Err(SessionError::AccessNotFound { access: *access_id });
        }
        let mut child = Session::from_authentication(response)?;
        child.parent = Some(AccessRef {
            session: self.id,
            access: *access_id,
        });
        self.child_ids.push(*child.id());
        self.touch();
        tracing::debug!(parent = %self.id, access = %access_id, child = %child.id,
            "delegated session created");
        Ok(child)
    }

    /// Invalidates this session: terminal, idempotent.
    ///
    /// Every access gets its best-effort logout notification. The
    /// returned ids are the delegated children the **caller** must
    /// cascade into (children are indices, so the cascade walks the
    /// store). A second call returns nothing and notifies no one.
    pub fn invalidate(&mut self, notifier: &dyn LogoutNotifier) -> Vec<SessionId> {
        if self.invalidated {
            return Vec::new();
        }
        self.invalidated = true;
        for access in self.accesses.values_mut() {
            access.invalidate(notifier);
        }
        tracing::debug!(session = %self.id, children = self.child_ids.len(),
            "session invalidated");
        self.child_ids.clone()
    }

    /// Accesses whose relying parties still hold a local session —
    /// what a logout response reports as outstanding.
    #[must_use]
    pub fn logged_in_accesses(&self) -> Vec<Access> {
        self.accesses
            .values()
            .filter(|a| !a.is_local_session_destroyed())
            .cloned()
            .collect()
    }

    /// Wraps the session into a store handle.
    #[must_use]
    pub fn into_handle(self) -> SessionHandle {
        Arc::new(RwLock::new(self))
    }

    /// Shifts the session's clock into the past. Test-only.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, age: std::time::Duration) {
        if let Some(t) = self.created.checked_sub(age) {
            self.created = t;
        }
        if let Some(t) = self.last_used.checked_sub(age) {
            self.last_used = t;
        }
    }

    /// Re-grants under a given policy. Convenience used across the
    /// crate's tests.
    #[cfg(test)]
    pub(crate) fn grant_with_policy(
        &mut self,
        service_id: &str,
        policy: crate::UsagePolicy,
    ) -> AccessId {
        let request =
            ServiceAccessRequest::new(self.id, service_id).with_usage_policy(policy);
        *self
            .grant(&request)
            .expect("grant on valid session")
            .id()
    }
}
