//! Access request shapes.
//!
//! Two requests reach the session layer: a [`ServiceAccessRequest`]
//! asks an existing session to mint a token for a service, and a
//! [`TokenServiceAccessRequest`] presents a previously minted token for
//! validation. Both carry a protocol tag so the response factory
//! registry can pick the right encoder.

use crate::UsagePolicy;
use aegis_auth::Credential;
use aegis_types::{AccessId, SessionId};
use serde::{Deserialize, Serialize};

/// The protocol family a request or token speaks.
///
/// The core never renders protocol bytes; the tag only routes to a
/// response factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Legacy plain-text validation.
    Cas1,
    /// XML service/proxy validation.
    Cas2,
    /// SAML 1.1 assertions (self-validating at issuance).
    Saml11,
}

/// A request to mint an access token against an existing session.
///
/// # Example
///
/// ```
/// use aegis_session::ServiceAccessRequest;
/// use aegis_types::SessionId;
///
/// let session = SessionId::new();
/// let req = ServiceAccessRequest::new(session, "https://app.example/login");
/// assert!(req.is_valid());
/// assert!(!req.is_force_authentication());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccessRequest {
    session_id: Option<SessionId>,
    service_id: String,
    protocol: Protocol,
    usage_policy: UsagePolicy,
    force_authentication: bool,
    long_term: bool,
    proxied: bool,
    credentials: Vec<Credential>,
}

impl ServiceAccessRequest {
    /// A standard one-shot service-ticket request (CAS2, single use).
    #[must_use]
    pub fn new(session_id: SessionId, service_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id),
            service_id: service_id.into(),
            protocol: Protocol::Cas2,
            usage_policy: UsagePolicy::BoundedUses(1),
            force_authentication: false,
            long_term: false,
            proxied: false,
            credentials: Vec::new(),
        }
    }

    /// A request with no session attached (arrives when the front-end
    /// could not find a session cookie). Still shape-valid; the missing
    /// session surfaces at lookup time.
    #[must_use]
    pub fn without_session(service_id: impl Into<String>) -> Self {
        let mut req = Self::new(SessionId::new(), service_id);
        req.session_id = None;
        req
    }

    /// Overrides the usage policy of the access to be minted.
    #[must_use]
    pub fn with_usage_policy(mut self, policy: UsagePolicy) -> Self {
        self.usage_policy = policy;
        self
    }

    /// Overrides the protocol tag.
    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Demands fresh authentication with the given credentials before
    /// granting.
    #[must_use]
    pub fn with_forced_authentication(mut self, credentials: Vec<Credential>) -> Self {
        self.force_authentication = true;
        self.credentials = credentials;
        self
    }

    /// Asks for a long-term session should forced re-authentication
    /// replace the current one.
    #[must_use]
    pub fn with_long_term(mut self) -> Self {
        self.long_term = true;
        self
    }

    /// Marks the request as originating from a proxy chain. Proxied
    /// requests get factory error responses instead of thrown errors.
    #[must_use]
    pub fn proxied(mut self) -> Self {
        self.proxied = true;
        self
    }

    /// The session expected to grant the access.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// The target service URI.
    #[must_use]
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// The protocol family of the eventual response.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The usage policy for the access to be minted.
    #[must_use]
    pub fn usage_policy(&self) -> UsagePolicy {
        self.usage_policy
    }

    /// Whether fresh authentication is demanded.
    #[must_use]
    pub fn is_force_authentication(&self) -> bool {
        self.force_authentication
    }

    /// Whether a long-term session is requested.
    #[must_use]
    pub fn is_long_term(&self) -> bool {
        self.long_term
    }

    /// Whether this request came through a proxy chain.
    #[must_use]
    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    /// Credentials for forced re-authentication.
    #[must_use]
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Shape-level validity: a non-empty service, and credentials
    /// whenever re-authentication is forced. Whether the named session
    /// exists (or is named at all) is a lookup concern, not a shape one.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.service_id.is_empty()
            && (!self.force_authentication || !self.credentials.is_empty())
    }
}

/// A previously issued token presented back for validation.
///
/// # Example
///
/// ```
/// use aegis_session::TokenServiceAccessRequest;
/// use aegis_types::AccessId;
///
/// let token = AccessId::new();
/// let req = TokenServiceAccessRequest::new(token, "https://app.example/login");
/// assert!(req.is_valid());
/// assert!(req.credentials().is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenServiceAccessRequest {
    token: AccessId,
    service_id: String,
    protocol: Protocol,
    credentials: Vec<Credential>,
}

impl TokenServiceAccessRequest {
    /// A plain validation request.
    #[must_use]
    pub fn new(token: AccessId, service_id: impl Into<String>) -> Self {
        Self {
            token,
            service_id: service_id.into(),
            protocol: Protocol::Cas2,
            credentials: Vec::new(),
        }
    }

    /// Overrides the protocol tag.
    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Attaches delegation credentials: on successful validation the
    /// authority also mints a delegated session for the presenter.
    #[must_use]
    pub fn with_delegation(mut self, credentials: Vec<Credential>) -> Self {
        self.credentials = credentials;
        self
    }

    /// The token under validation.
    #[must_use]
    pub fn token(&self) -> &AccessId {
        &self.token
    }

    /// The service presenting the token.
    #[must_use]
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    /// The protocol family of the eventual response.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Delegation credentials, empty for plain validation.
    #[must_use]
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Shape-level validity: a non-empty presenting service.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.service_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_is_single_use_cas2() {
        let req = ServiceAccessRequest::new(SessionId::new(), "https://app.example");
        assert_eq!(req.protocol(), Protocol::Cas2);
        assert_eq!(req.usage_policy(), UsagePolicy::BoundedUses(1));
        assert!(req.is_valid());
    }

    #[test]
    fn sessionless_request_is_still_shape_valid() {
        // A missing session is a lookup failure, not a malformed request.
        let req = ServiceAccessRequest::without_session("https://app.example");
        assert!(req.session_id().is_none());
        assert!(req.is_valid());
    }

    #[test]
    fn forced_auth_without_credentials_is_invalid() {
        let req = ServiceAccessRequest::new(SessionId::new(), "https://app.example")
            .with_forced_authentication(vec![]);
        assert!(!req.is_valid());
    }

    #[test]
    fn empty_service_is_invalid() {
        let req = ServiceAccessRequest::new(SessionId::new(), "");
        assert!(!req.is_valid());

        let token_req = TokenServiceAccessRequest::new(AccessId::new(), "");
        assert!(!token_req.is_valid());
    }

    #[test]
    fn serde_round_trip() {
        let req = ServiceAccessRequest::new(SessionId::new(), "https://app.example")
            .with_usage_policy(UsagePolicy::LogoutOnly)
            .proxied();
        let json = serde_json::to_string(&req).expect("serialize");
        let back: ServiceAccessRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.service_id(), req.service_id());
        assert_eq!(back.usage_policy(), UsagePolicy::LogoutOnly);
        assert!(back.is_proxied());
    }
}
