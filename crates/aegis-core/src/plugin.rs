//! Login plugin chains.
//!
//! Two independent ordered lists wrap the authentication manager:
//!
//! - **Pre-auth** plugins run before any credential is examined. The
//!   first plugin returning a response short-circuits the whole login —
//!   this is how throttling, CAPTCHA gates and MFA interstitials are
//!   built without the orchestrator knowing about them.
//! - **Response** plugins run after authentication, in order, and see
//!   both the request and the outcome. They cannot veto; they exist for
//!   notification-style concerns (lockout counters, last-login stamps).
//!
//! The chains are deliberately ignorant of each other.

use crate::{LoginRequest, LoginResponse};
use aegis_auth::AuthenticationResponse;
use async_trait::async_trait;

/// Runs before authentication; may intercept the login.
#[async_trait]
pub trait PreAuthenticationPlugin: Send + Sync {
    /// Returns `None` to let the login proceed, or a complete
    /// [`LoginResponse`] to short-circuit (later plugins and the
    /// authentication manager never run).
    async fn continue_with_authentication(&self, request: &LoginRequest) -> Option<LoginResponse>;
}

/// Runs after authentication; observes the outcome.
#[async_trait]
pub trait AuthenticationResponsePlugin: Send + Sync {
    /// Invoked for every authentication attempt, success or failure.
    async fn handle(&self, request: &LoginRequest, response: &AuthenticationResponse);
}
