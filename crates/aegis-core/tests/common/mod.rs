#![allow(dead_code)]
//! Shared helpers for the authority integration tests.
//!
//! The standard rig: a static two-user directory (alice/secret,
//! bob/pw), an always-reachable endpoint validator for delegation
//! credentials, and a registry admitting the `app.example`,
//! `app2.example` and `proxy.example` services — `evil.example` is
//! deliberately absent.

use aegis_auth::endpoint::{EndpointValidator, UrlEndpointHandler};
use aegis_auth::testing::StaticDirectoryHandler;
use aegis_auth::Credential;
use aegis_core::{Authority, AuthorityConfig, LoginRequest, LoginResponse};
use aegis_session::LogoutNotifier;
use aegis_types::AccessId;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Once;
use std::sync::Arc;

pub const APP: &str = "https://app.example/login";
pub const APP2: &str = "https://app2.example";
pub const PROXY: &str = "https://proxy.example/pgtCallback";
pub const EVIL: &str = "https://evil.example";

static INIT: Once = Once::new();

/// Installs a debug-level subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

struct AlwaysUp;

#[async_trait]
impl EndpointValidator for AlwaysUp {
    async fn is_valid_endpoint(&self, _url: &str) -> bool {
        true
    }
}

/// Records every single-logout callback; confirms destruction only when
/// built with `confirming()`.
#[derive(Default)]
pub struct RecordingNotifier {
    confirm: bool,
    pub notified: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn confirming() -> Self {
        Self {
            confirm: true,
            notified: Mutex::new(Vec::new()),
        }
    }

    pub fn resources(&self) -> Vec<String> {
        self.notified.lock().clone()
    }
}

impl LogoutNotifier for RecordingNotifier {
    fn notify(&self, resource_id: &str, _access_id: &AccessId) -> bool {
        self.notified.lock().push(resource_id.to_string());
        self.confirm
    }
}

/// The standard builder, left open for per-test additions.
pub fn builder() -> aegis_core::AuthorityBuilder {
    init_tracing();
    Authority::builder()
        .with_handler(Arc::new(
            StaticDirectoryHandler::new()
                .with_user("alice", "secret")
                .with_user("bob", "pw"),
        ))
        .with_handler(Arc::new(UrlEndpointHandler::new(Arc::new(AlwaysUp))))
        .allow_service("https://app.example/*")
        .allow_service(APP2)
        .allow_service("https://proxy.example/*")
}

/// The standard rig with default config.
pub fn authority() -> Authority {
    builder().build()
}

/// A rig whose access tokens expire immediately.
pub fn authority_with_instant_access_expiry() -> Authority {
    builder()
        .with_config(AuthorityConfig {
            access_ttl_secs: 0,
            ..Default::default()
        })
        .build()
}

/// A rig whose sessions expire immediately.
pub fn authority_with_instant_session_expiry() -> Authority {
    builder()
        .with_config(AuthorityConfig {
            session_ttl_secs: 0,
            sliding_expiration: false,
            ..Default::default()
        })
        .build()
}

pub fn password(user: &str, pass: &str) -> Vec<Credential> {
    vec![Credential::user_password(user, pass)]
}

/// Logs in and asserts success.
pub async fn login(authority: &Authority, user: &str, pass: &str) -> LoginResponse {
    let response = authority
        .login(&LoginRequest::new(password(user, pass)))
        .await
        .expect("storage reachable");
    assert!(response.succeeded(), "login for {user} should succeed");
    response
}
