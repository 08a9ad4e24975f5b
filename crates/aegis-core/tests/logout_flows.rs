//! Logout semantics: single session, bulk by principal, idempotence.

mod common;

use aegis_core::{AccessOutcome, ServiceAccessRequest, TokenServiceAccessRequest};
use common::{authority, login, APP, APP2};
use std::sync::Arc;

#[tokio::test]
async fn logout_destroys_and_invalidates() {
    let authority = authority();
    let session_id = login(&authority, "alice", "secret")
        .await
        .session_id()
        .expect("session");

    let response = authority.logout_session(&session_id).expect("logout");
    assert!(response.destroyed_any());
    assert_eq!(response.session_ids(), vec![session_id]);
    assert!(response.sessions()[0].read().is_invalidated());

    assert!(authority
        .storage()
        .find_session_by_session_id(&session_id)
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn logout_unknown_session_is_empty_and_quiet() {
    let authority = authority();
    let response = authority
        .logout_session(&aegis_types::SessionId::new())
        .expect("logout runs");
    assert!(!response.destroyed_any());
}

#[tokio::test]
async fn logout_twice_is_idempotent() {
    let authority = authority();
    let session_id = login(&authority, "alice", "secret")
        .await
        .session_id()
        .expect("session");

    assert!(authority
        .logout_session(&session_id)
        .expect("first")
        .destroyed_any());
    assert!(!authority
        .logout_session(&session_id)
        .expect("second")
        .destroyed_any());
}

#[tokio::test]
async fn logout_reports_outstanding_accesses() {
    let notifier = Arc::new(common::RecordingNotifier::default());
    let authority = common::builder().with_notifier(notifier.clone()).build();
    let session_id = login(&authority, "alice", "secret")
        .await
        .session_id()
        .expect("session");

    for service in [APP, APP2] {
        authority
            .grant_access(&ServiceAccessRequest::new(session_id, service))
            .await
            .expect("grant");
    }

    let response = authority.logout_session(&session_id).expect("logout");

    // Both relying parties were notified; neither confirmed, so both
    // remain outstanding in the response.
    let mut notified = notifier.resources();
    notified.sort();
    assert_eq!(notified, vec![APP.to_string(), APP2.to_string()]);

    let mut remaining: Vec<_> = response
        .remaining_accesses()
        .iter()
        .map(|a| a.resource_id().to_string())
        .collect();
    remaining.sort();
    assert_eq!(remaining, vec![APP.to_string(), APP2.to_string()]);
}

#[tokio::test]
async fn confirmed_single_logout_leaves_nothing_outstanding() {
    let notifier = Arc::new(common::RecordingNotifier::confirming());
    let authority = common::builder().with_notifier(notifier).build();
    let session_id = login(&authority, "alice", "secret")
        .await
        .session_id()
        .expect("session");
    authority
        .grant_access(&ServiceAccessRequest::new(session_id, APP))
        .await
        .expect("grant");

    let response = authority.logout_session(&session_id).expect("logout");
    assert!(response.remaining_accesses().is_empty());
}

#[tokio::test]
async fn validating_a_token_of_a_logged_out_session_fails() {
    let authority = authority();
    let session_id = login(&authority, "alice", "secret")
        .await
        .session_id()
        .expect("session");
    let grant = authority
        .grant_access(&ServiceAccessRequest::new(session_id, APP))
        .await
        .expect("grant");
    let token = *grant.access().expect("access").id();

    authority.logout_session(&session_id).expect("logout");

    // The session (and its token index entries) are gone.
    let response = authority
        .validate(&TokenServiceAccessRequest::new(token, APP))
        .await
        .expect("validate runs");
    assert_eq!(response.outcome(), AccessOutcome::TokenNotFound);
}

// ─── Administrative logout by principal ────────────────────────────

#[tokio::test]
async fn admin_logout_destroys_every_session_of_the_principal() {
    let authority = authority();
    let first = login(&authority, "alice", "secret")
        .await
        .session_id()
        .expect("session A");
    let second = login(&authority, "alice", "secret")
        .await
        .session_id()
        .expect("session B");
    assert_ne!(first, second);

    let bystander = login(&authority, "bob", "pw")
        .await
        .session_id()
        .expect("bob's session");

    let response = authority.logout_principal("alice").expect("bulk logout");
    let mut destroyed = response.session_ids();
    destroyed.sort_by_key(std::string::ToString::to_string);
    let mut expected = vec![first, second];
    expected.sort_by_key(std::string::ToString::to_string);
    assert_eq!(destroyed, expected);

    assert!(authority
        .storage()
        .find_sessions_by_principal("alice")
        .expect("lookup")
        .is_empty());

    // Bob is untouched.
    assert!(authority
        .storage()
        .find_session_by_session_id(&bystander)
        .expect("lookup")
        .is_some());
}

#[tokio::test]
async fn admin_logout_of_unknown_principal_is_empty() {
    let authority = authority();
    let response = authority.logout_principal("nobody").expect("bulk logout");
    assert!(!response.destroyed_any());
}
