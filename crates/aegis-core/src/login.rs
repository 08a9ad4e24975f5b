//! Login request/response shapes.

use aegis_auth::{AuthenticationResponse, Credential};
use aegis_session::SessionHandle;
use aegis_types::SessionId;

/// A front-end's request to establish a session.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    credentials: Vec<Credential>,
    long_term: bool,
    remote_address: Option<String>,
}

impl LoginRequest {
    /// A login attempt with the given credentials.
    #[must_use]
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials,
            long_term: false,
            remote_address: None,
        }
    }

    /// Asks for a long-term ("remember-me") session.
    #[must_use]
    pub fn with_long_term(mut self) -> Self {
        self.long_term = true;
        self
    }

    /// Records the client address, for observers and throttling plugins.
    #[must_use]
    pub fn with_remote_address(mut self, address: impl Into<String>) -> Self {
        self.remote_address = Some(address.into());
        self
    }

    /// The presented credentials.
    #[must_use]
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Whether a long-term session was requested.
    #[must_use]
    pub fn is_long_term(&self) -> bool {
        self.long_term
    }

    /// The client address, if the front-end recorded one.
    #[must_use]
    pub fn remote_address(&self) -> Option<&str> {
        self.remote_address.as_deref()
    }
}

/// The outcome of a login attempt.
///
/// A failed login is not an error: it is a response with no session,
/// carrying the in-band failure map of the authentication response.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    session: Option<SessionHandle>,
    authentication: AuthenticationResponse,
}

impl LoginResponse {
    /// A successful login with a freshly created session.
    #[must_use]
    pub fn granted(session: SessionHandle, authentication: AuthenticationResponse) -> Self {
        Self {
            session: Some(session),
            authentication,
        }
    }

    /// A denied login.
    #[must_use]
    pub fn denied(authentication: AuthenticationResponse) -> Self {
        Self {
            session: None,
            authentication,
        }
    }

    /// Whether a session was established.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.session.is_some()
    }

    /// The established session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    /// The id of the established session, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| *s.read().id())
    }

    /// The underlying authentication outcome, including failures.
    #[must_use]
    pub fn authentication(&self) -> &AuthenticationResponse {
        &self.authentication
    }
}
