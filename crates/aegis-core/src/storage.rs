//! In-memory reference implementation of [`SessionStorage`].

use aegis_auth::AuthenticationResponse;
use aegis_session::{Session, SessionHandle, SessionStorage, StorageError};
use aegis_types::{AccessId, SessionId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Thread-safe, in-memory session store.
///
/// All three indexes live behind a single `RwLock` so that every
/// create/update/destroy is atomic across them. Session *contents* are
/// never read under the index lock — destroy scans the secondary
/// indexes by value instead — so the store can never deadlock against a
/// caller holding a session lock.
///
/// | Index | Key | Value |
/// |-------|-----|-------|
/// | `by_id` | session id | handle |
/// | `by_access` | access token | owning session id |
/// | `by_principal` | principal id | session id set |
#[derive(Debug, Default)]
pub struct DefaultSessionStorage {
    inner: RwLock<Indexes>,
}

#[derive(Debug, Default)]
struct Indexes {
    by_id: HashMap<SessionId, SessionHandle>,
    by_access: HashMap<AccessId, SessionId>,
    by_principal: HashMap<String, HashSet<SessionId>>,
    /// Destroy is terminal: a snapshot update racing a destroy must not
    /// resurrect the session, so destroyed ids are remembered.
    destroyed: HashSet<SessionId>,
}

impl DefaultSessionStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.inner.read().by_id.len()
    }
}

impl Indexes {
    /// Index maintenance shared by create and update: principal entry,
    /// plus token entries per the snapshot's access set. Additive for
    /// new stored accesses; removes entries only for consumed ones.
    fn sync_from(&mut self, snapshot: &Session) {
        let id = *snapshot.id();
        self.by_principal
            .entry(snapshot.principal().id().to_string())
            .or_default()
            .insert(id);

        for access in snapshot.accesses() {
            if access.is_consumed() {
                self.by_access.remove(access.id());
            } else if access.requires_storage() {
                self.by_access.insert(*access.id(), id);
            }
        }
    }
}

impl SessionStorage for DefaultSessionStorage {
    fn create_session(
        &self,
        response: &AuthenticationResponse,
    ) -> Result<SessionHandle, StorageError> {
        let session = Session::from_authentication(response)?;
        let id = *session.id();
        let mut inner = self.inner.write();
        inner.sync_from(&session);
        let handle = session.into_handle();
        inner.by_id.insert(id, handle.clone());
        tracing::debug!(session = %id, "session created");
        Ok(handle)
    }

    fn update_session(&self, snapshot: &Session) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        if inner.destroyed.contains(snapshot.id()) {
            tracing::debug!(session = %snapshot.id(), "update ignored for destroyed session");
            return Ok(());
        }
        if !inner.by_id.contains_key(snapshot.id()) {
            // First sighting: this is how delegated sessions get stored.
            let handle = snapshot.clone().into_handle();
            inner.by_id.insert(*snapshot.id(), handle);
            tracing::debug!(session = %snapshot.id(), "session installed on update");
        }
        inner.sync_from(snapshot);
        Ok(())
    }

    fn destroy_session(&self, id: &SessionId) -> Result<Option<SessionHandle>, StorageError> {
        let mut inner = self.inner.write();
        inner.destroyed.insert(*id);
        let Some(handle) = inner.by_id.remove(id) else {
            return Ok(None);
        };
        // Scan-based removal keeps session locks out of the store lock.
        inner.by_access.retain(|_, owner| owner != id);
        inner.by_principal.retain(|_, sessions| {
            sessions.remove(id);
            !sessions.is_empty()
        });
        tracing::debug!(session = %id, "session destroyed");
        Ok(Some(handle))
    }

    fn find_session_by_session_id(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionHandle>, StorageError> {
        Ok(self.inner.read().by_id.get(id).cloned())
    }

    fn find_session_by_access_id(
        &self,
        id: &AccessId,
    ) -> Result<Option<SessionHandle>, StorageError> {
        let inner = self.inner.read();
        Ok(inner
            .by_access
            .get(id)
            .and_then(|sid| inner.by_id.get(sid))
            .cloned())
    }

    fn find_sessions_by_principal(
        &self,
        principal_id: &str,
    ) -> Result<Vec<SessionHandle>, StorageError> {
        let inner = self.inner.read();
        Ok(inner
            .by_principal
            .get(principal_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter_map(|sid| inner.by_id.get(sid))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn session_ids(&self) -> Result<Vec<SessionId>, StorageError> {
        Ok(self.inner.read().by_id.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_auth::{Authentication, AuthenticationResponse};
    use aegis_session::{NoopLogoutNotifier, ServiceAccessRequest, UsagePolicy};
    use aegis_types::{AttributeMap, Principal};

    fn auth_response(principal: &str) -> AuthenticationResponse {
        let p = Principal::new(principal);
        AuthenticationResponse::success(
            p.clone(),
            vec![Authentication::now(p, "user-password")],
            AttributeMap::new(),
            false,
        )
    }

    fn grant(
        store: &DefaultSessionStorage,
        handle: &SessionHandle,
        service: &str,
        policy: UsagePolicy,
    ) -> AccessId {
        let (snapshot, token) = {
            let mut session = handle.write();
            let request =
                ServiceAccessRequest::new(*session.id(), service).with_usage_policy(policy);
            let token = *session.grant(&request).expect("grant on valid session").id();
            (session.clone(), token)
        };
        store.update_session(&snapshot).expect("update");
        token
    }

    // ── Index agreement ──────────────────────────────────────

    #[test]
    fn create_installs_all_indexes() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let id = *handle.read().id();

        assert!(store
            .find_session_by_session_id(&id)
            .expect("lookup")
            .is_some());
        let by_principal = store.find_sessions_by_principal("alice").expect("lookup");
        assert_eq!(by_principal.len(), 1);
        assert_eq!(*by_principal[0].read().id(), id);
    }

    #[test]
    fn stored_access_is_findable_by_token() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let token = grant(
            &store,
            &handle,
            "https://app.example",
            UsagePolicy::BoundedUses(1),
        );

        let found = store
            .find_session_by_access_id(&token)
            .expect("lookup")
            .expect("indexed");
        assert_eq!(*found.read().id(), *handle.read().id());
    }

    #[test]
    fn self_validating_access_is_not_indexed() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let token = grant(
            &store,
            &handle,
            "https://saml.example",
            UsagePolicy::SelfValidating,
        );

        assert!(store
            .find_session_by_access_id(&token)
            .expect("lookup")
            .is_none());
    }

    // ── Update semantics ─────────────────────────────────────

    #[test]
    fn update_is_idempotent_over_snapshots() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let token = grant(
            &store,
            &handle,
            "https://app.example",
            UsagePolicy::BoundedUses(1),
        );

        let snapshot = handle.read().clone();
        store.update_session(&snapshot).expect("update once");
        store.update_session(&snapshot).expect("update twice");

        assert!(store
            .find_session_by_access_id(&token)
            .expect("lookup")
            .is_some());
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn update_installs_unknown_sessions() {
        let store = DefaultSessionStorage::new();
        let session =
            Session::from_authentication(&auth_response("delegated")).expect("session");
        let id = *session.id();

        store.update_session(&session).expect("install");
        assert!(store
            .find_session_by_session_id(&id)
            .expect("lookup")
            .is_some());
        assert_eq!(
            store
                .find_sessions_by_principal("delegated")
                .expect("lookup")
                .len(),
            1
        );
    }

    #[test]
    fn consumed_access_is_unlinked_on_update() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let token = grant(
            &store,
            &handle,
            "https://app.example",
            UsagePolicy::BoundedUses(1),
        );

        struct Confirms;
        impl aegis_session::LogoutNotifier for Confirms {
            fn notify(&self, _r: &str, _a: &AccessId) -> bool {
                true
            }
        }

        // Consume the use, then confirm local logout: access is consumed.
        let snapshot = {
            let mut session = handle.write();
            let req = aegis_session::TokenServiceAccessRequest::new(token, "https://app.example");
            session
                .get_access_mut(&token)
                .expect("granted")
                .validate(&req)
                .expect("single use");
            session
                .get_access_mut(&token)
                .expect("granted")
                .invalidate(&Confirms);
            session.clone()
        };
        store.update_session(&snapshot).expect("update");

        assert!(store
            .find_session_by_access_id(&token)
            .expect("lookup")
            .is_none());
        // The session itself is untouched.
        assert!(store
            .find_session_by_session_id(snapshot.id())
            .expect("lookup")
            .is_some());
    }

    #[test]
    fn merely_used_access_stays_findable() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let token = grant(
            &store,
            &handle,
            "https://app.example",
            UsagePolicy::BoundedUses(1),
        );

        let snapshot = {
            let mut session = handle.write();
            let req = aegis_session::TokenServiceAccessRequest::new(token, "https://app.example");
            session
                .get_access_mut(&token)
                .expect("granted")
                .validate(&req)
                .expect("single use");
            session.clone()
        };
        store.update_session(&snapshot).expect("update");

        // Used but not locally destroyed: must still resolve so a
        // re-validation can answer "token used" rather than "not found".
        assert!(store
            .find_session_by_access_id(&token)
            .expect("lookup")
            .is_some());
    }

    // ── Destroy ──────────────────────────────────────────────

    #[test]
    fn destroy_removes_every_index() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let id = *handle.read().id();
        let token = grant(
            &store,
            &handle,
            "https://app.example",
            UsagePolicy::BoundedUses(1),
        );

        let detached = store.destroy_session(&id).expect("destroy").expect("found");
        assert_eq!(*detached.read().id(), id);

        assert!(store
            .find_session_by_session_id(&id)
            .expect("lookup")
            .is_none());
        assert!(store
            .find_session_by_access_id(&token)
            .expect("lookup")
            .is_none());
        assert!(store
            .find_sessions_by_principal("alice")
            .expect("lookup")
            .is_empty());
    }

    #[test]
    fn destroy_is_idempotent() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let id = *handle.read().id();

        assert!(store.destroy_session(&id).expect("first").is_some());
        assert!(store.destroy_session(&id).expect("second").is_none());
        assert!(store.destroy_session(&SessionId::new()).expect("unknown").is_none());
    }

    #[test]
    fn update_cannot_resurrect_a_destroyed_session() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let id = *handle.read().id();
        let token = grant(
            &store,
            &handle,
            "https://app.example",
            UsagePolicy::BoundedUses(1),
        );

        let stale_snapshot = handle.read().clone();
        store.destroy_session(&id).expect("destroy");
        store
            .update_session(&stale_snapshot)
            .expect("update is a quiet no-op");

        assert!(store
            .find_session_by_session_id(&id)
            .expect("lookup")
            .is_none());
        assert!(store
            .find_session_by_access_id(&token)
            .expect("lookup")
            .is_none());
    }

    #[test]
    fn destroyed_session_is_still_referencable() {
        let store = DefaultSessionStorage::new();
        let handle = store.create_session(&auth_response("alice")).expect("create");
        let id = *handle.read().id();

        let detached = store.destroy_session(&id).expect("destroy").expect("found");
        let children = detached.write().invalidate(&NoopLogoutNotifier);
        assert!(children.is_empty());
        assert!(detached.read().is_invalidated());
    }

    // ── Concurrency ──────────────────────────────────────────

    #[test]
    fn parallel_creates_and_lookups() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(DefaultSessionStorage::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let principal = format!("user-{i}");
                    let handle = store
                        .create_session(&auth_response(&principal))
                        .expect("concurrent create");
                    let id = *handle.read().id();
                    assert!(store
                        .find_session_by_session_id(&id)
                        .expect("concurrent lookup")
                        .is_some());
                    assert_eq!(
                        store
                            .find_sessions_by_principal(&principal)
                            .expect("concurrent principal lookup")
                            .len(),
                        1
                    );
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread panicked");
        }

        assert_eq!(store.session_count(), 8);
    }
}
