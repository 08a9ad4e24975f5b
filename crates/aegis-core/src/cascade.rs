//! Session-tree destruction.
//!
//! Parent/child relations between sessions are ids, so invalidation
//! cannot chase object references; this helper walks the tree through
//! the store. Used by logout, forced re-authentication and the expiry
//! sweep.

use aegis_session::{LogoutNotifier, SessionHandle, SessionStorage, StorageError};
use aegis_types::SessionId;

/// Destroys `id` and, transitively, every delegated child session.
///
/// Each session is removed from the store first and invalidated after —
/// so a lookup racing the destroy either sees a live session or none at
/// all, never a half-dead one. Returns the destroyed sessions, root
/// first. Already-destroyed or never-persisted children are skipped
/// silently.
pub(crate) fn destroy_session_tree(
    storage: &dyn SessionStorage,
    notifier: &dyn LogoutNotifier,
    id: &SessionId,
) -> Result<Vec<SessionHandle>, StorageError> {
    let mut destroyed = Vec::new();
    let mut pending = vec![*id];

    while let Some(next) = pending.pop() {
        let Some(handle) = storage.destroy_session(&next)? else {
            continue;
        };
        let children = handle.write().invalidate(notifier);
        if !children.is_empty() {
            tracing::debug!(session = %next, children = children.len(),
                "cascading invalidation to delegated sessions");
        }
        pending.extend(children);
        destroyed.push(handle);
    }

    Ok(destroyed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultSessionStorage;
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

    #[test]
    fn destroys_grandchildren() {
        let store = DefaultSessionStorage::new();
        let root = store.create_session(&auth_response("alice")).expect("root");
        let root_id = *root.read().id();

        // root ── anchor ── child ── anchor ── grandchild
        let child = {
            let mut session = root.write();
            let request = ServiceAccessRequest::new(*session.id(), "https://proxy.example")
                .with_usage_policy(UsagePolicy::LogoutOnly);
            let anchor = session.grant(&request).expect("anchor grant");
            session
                .delegate(anchor.id(), &auth_response("https://proxy.example/cb"))
                .expect("delegate")
        };
        store.update_session(&child).expect("persist child");
        store.update_session(&root.read().clone()).expect("persist root");

        let child_handle = store
            .find_session_by_session_id(child.id())
            .expect("lookup")
            .expect("stored");
        let grandchild = {
            let mut session = child_handle.write();
            let request = ServiceAccessRequest::new(*session.id(), "https://deeper.example")
                .with_usage_policy(UsagePolicy::LogoutOnly);
            let anchor = session.grant(&request).expect("anchor grant");
            session
                .delegate(anchor.id(), &auth_response("https://deeper.example/cb"))
                .expect("delegate")
        };
        store.update_session(&grandchild).expect("persist grandchild");
        store
            .update_session(&child_handle.read().clone())
            .expect("persist child again");

        let destroyed = destroy_session_tree(&store, &NoopLogoutNotifier, &root_id)
            .expect("cascade");

        assert_eq!(destroyed.len(), 3);
        assert!(destroyed.iter().all(|s| s.read().is_invalidated()));
        for dead in &destroyed {
            let id = *dead.read().id();
            assert!(store
                .find_session_by_session_id(&id)
                .expect("lookup")
                .is_none());
        }
    }

    #[test]
    fn unknown_root_destroys_nothing() {
        let store = DefaultSessionStorage::new();
        let destroyed =
            destroy_session_tree(&store, &NoopLogoutNotifier, &SessionId::new()).expect("cascade");
        assert!(destroyed.is_empty());
    }
}
