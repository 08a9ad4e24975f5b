//! Service access responses and the factory registry (C8).
//!
//! Factories are the only components aware of protocol-specific
//! encodings; this layer stops at the structured response — the wire
//! rendering belongs to the front-end.

use crate::AuthorityError;
use aegis_auth::AuthenticationResponse;
use aegis_session::{
    Access, Protocol, ServiceAccessRequest, SessionHandle, TokenServiceAccessRequest,
};
use aegis_types::Principal;
use std::sync::Arc;

/// What happened to a grant or validation request.
///
/// Everything except `Granted`/`Validated` is an in-band protocol
/// error: the relying party always receives a well-formed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// An access was minted.
    Granted,
    /// The token validated successfully.
    Validated,
    /// The request failed shape-level validation.
    InvalidRequest,
    /// No stored session bears the presented token.
    TokenNotFound,
    /// A bounded-use token was already consumed.
    TokenUsed,
    /// The token (or its session) outlived its TTL.
    TokenExpired,
    /// The named session is not in the store (proxied path).
    SessionNotFound,
    /// The session exists but is invalidated or expired (proxied path).
    SessionInvalidated,
    /// The token was presented for a service it was not granted to.
    ResourceMismatch,
    /// Forced re-authentication failed.
    AuthenticationFailed,
}

impl AccessOutcome {
    /// Whether the operation achieved what was asked.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Granted | Self::Validated)
    }
}

/// The structured response handed back to the front-end for both
/// `grant_access` and `validate`.
#[derive(Debug, Clone)]
pub struct ServiceAccessResponse {
    outcome: AccessOutcome,
    protocol: Protocol,
    session: Option<SessionHandle>,
    access: Option<Access>,
    authentication: Option<AuthenticationResponse>,
    remaining_accesses: Vec<Access>,
}

impl ServiceAccessResponse {
    /// What happened.
    #[must_use]
    pub fn outcome(&self) -> AccessOutcome {
        self.outcome
    }

    /// The protocol family the front-end should encode for.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The session involved, when one was found.
    #[must_use]
    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    /// Snapshot of the access granted or validated.
    #[must_use]
    pub fn access(&self) -> Option<&Access> {
        self.access.as_ref()
    }

    /// The re-authentication outcome, present on forced-auth grants and
    /// failed forced-auth attempts.
    #[must_use]
    pub fn authentication(&self) -> Option<&AuthenticationResponse> {
        self.authentication.as_ref()
    }

    /// Accesses of a session destroyed by a principal switch whose
    /// relying parties still hold local sessions.
    #[must_use]
    pub fn remaining_accesses(&self) -> &[Access] {
        &self.remaining_accesses
    }

    /// The authenticated identity behind the response's session.
    #[must_use]
    pub fn principal(&self) -> Option<Principal> {
        self.session.as_ref().map(|s| s.read().principal().clone())
    }
}

/// Builds [`ServiceAccessResponse`]s for one protocol family.
///
/// The registry consults factories in order and the first supporting
/// factory wins. Factories also own two grant-time policy knobs the
/// orchestrator consults: [`idempotent_grant`](Self::idempotent_grant)
/// and nothing else — protocol bytes are out of scope here.
pub trait ServiceAccessResponseFactory: Send + Sync {
    /// Factory name, for logs and fatal lookup errors.
    fn name(&self) -> &str;

    /// Whether this factory encodes for a grant request.
    fn supports_grant(&self, request: &ServiceAccessRequest) -> bool;

    /// Whether this factory encodes for a validation request.
    fn supports_validation(&self, request: &TokenServiceAccessRequest) -> bool;

    /// Whether this factory encodes for an already minted access.
    fn supports_access(&self, access: &Access) -> bool;

    /// When `true`, granting the same (service, principal) pair twice
    /// reuses an unconsumed access instead of minting a new token. The
    /// default mints fresh, one-shot-unique tokens.
    fn idempotent_grant(&self) -> bool {
        false
    }

    /// A successful grant.
    fn grant_response(
        &self,
        session: SessionHandle,
        access: Access,
        authentication: Option<AuthenticationResponse>,
        remaining_accesses: Vec<Access>,
    ) -> ServiceAccessResponse {
        ServiceAccessResponse {
            outcome: AccessOutcome::Granted,
            protocol: access.protocol(),
            session: Some(session),
            access: Some(access),
            authentication,
            remaining_accesses,
        }
    }

    /// A successful validation.
    fn validation_response(&self, session: SessionHandle, access: Access) -> ServiceAccessResponse {
        ServiceAccessResponse {
            outcome: AccessOutcome::Validated,
            protocol: access.protocol(),
            session: Some(session),
            access: Some(access),
            authentication: None,
            remaining_accesses: Vec::new(),
        }
    }

    /// Any failure shape: the outcome plus whatever context was
    /// established before the failure.
    fn failure_response(
        &self,
        protocol: Protocol,
        outcome: AccessOutcome,
        session: Option<SessionHandle>,
        authentication: Option<AuthenticationResponse>,
    ) -> ServiceAccessResponse {
        ServiceAccessResponse {
            outcome,
            protocol,
            session,
            access: None,
            authentication,
            remaining_accesses: Vec::new(),
        }
    }
}

/// Factory for the CAS protocol family (CAS1 plain text, CAS2 XML).
#[derive(Debug, Default)]
pub struct CasResponseFactory;

impl ServiceAccessResponseFactory for CasResponseFactory {
    fn name(&self) -> &str {
        "cas"
    }

    fn supports_grant(&self, request: &ServiceAccessRequest) -> bool {
        matches!(request.protocol(), Protocol::Cas1 | Protocol::Cas2)
    }

    fn supports_validation(&self, request: &TokenServiceAccessRequest) -> bool {
        matches!(request.protocol(), Protocol::Cas1 | Protocol::Cas2)
    }

    fn supports_access(&self, access: &Access) -> bool {
        matches!(access.protocol(), Protocol::Cas1 | Protocol::Cas2)
    }
}

/// Factory for SAML 1.1 assertion responses.
#[derive(Debug, Default)]
pub struct SamlResponseFactory;

impl ServiceAccessResponseFactory for SamlResponseFactory {
    fn name(&self) -> &str {
        "saml11"
    }

    fn supports_grant(&self, request: &ServiceAccessRequest) -> bool {
        request.protocol() == Protocol::Saml11
    }

    fn supports_validation(&self, request: &TokenServiceAccessRequest) -> bool {
        request.protocol() == Protocol::Saml11
    }

    fn supports_access(&self, access: &Access) -> bool {
        access.protocol() == Protocol::Saml11
    }
}

/// Ordered factory lookup. First match wins; no match is a wiring bug.
pub struct ResponseFactoryRegistry {
    factories: Vec<Arc<dyn ServiceAccessResponseFactory>>,
}

impl ResponseFactoryRegistry {
    /// Builds a registry. At least one factory is required.
    ///
    /// # Panics
    ///
    /// Panics on an empty factory list — the authority cannot answer
    /// anything without factories, so this is a configuration bug
    /// caught at startup.
    #[must_use]
    pub fn new(factories: Vec<Arc<dyn ServiceAccessResponseFactory>>) -> Self {
        assert!(
            !factories.is_empty(),
            "at least one ServiceAccessResponseFactory must be configured"
        );
        Self { factories }
    }

    /// The stock registry: CAS first, SAML second.
    #[must_use]
    pub fn stock() -> Self {
        Self::new(vec![
            Arc::new(CasResponseFactory),
            Arc::new(SamlResponseFactory),
        ])
    }

    /// Factory for a grant request.
    ///
    /// # Panics
    ///
    /// Panics when no factory supports the request (configuration bug;
    /// crash-only).
    #[must_use]
    pub fn for_grant(&self, request: &ServiceAccessRequest) -> &dyn ServiceAccessResponseFactory {
        self.factories
            .iter()
            .find(|f| f.supports_grant(request))
            .map(AsRef::as_ref)
            .unwrap_or_else(|| {
                panic!(
                    "no ServiceAccessResponseFactory configured for grant protocol {:?}",
                    request.protocol()
                )
            })
    }

    /// Factory for a validation request.
    ///
    /// # Panics
    ///
    /// Panics when no factory supports the request.
    #[must_use]
    pub fn for_validation(
        &self,
        request: &TokenServiceAccessRequest,
    ) -> &dyn ServiceAccessResponseFactory {
        self.factories
            .iter()
            .find(|f| f.supports_validation(request))
            .map(AsRef::as_ref)
            .unwrap_or_else(|| {
                panic!(
                    "no ServiceAccessResponseFactory configured for validation protocol {:?}",
                    request.protocol()
                )
            })
    }

    /// Factory for an existing access.
    ///
    /// # Panics
    ///
    /// Panics when no factory supports the access.
    #[must_use]
    pub fn for_access(&self, access: &Access) -> &dyn ServiceAccessResponseFactory {
        self.factories
            .iter()
            .find(|f| f.supports_access(access))
            .map(AsRef::as_ref)
            .unwrap_or_else(|| {
                panic!(
                    "no ServiceAccessResponseFactory configured for access protocol {:?}",
                    access.protocol()
                )
            })
    }
}

impl Default for ResponseFactoryRegistry {
    fn default() -> Self {
        Self::stock()
    }
}

/// Helper shared by the orchestrator's two proxied-vs-thrown branches:
/// proxied requests get an in-band failure, everything else an error.
pub(crate) fn proxied_or_err(
    proxied: bool,
    factory: &dyn ServiceAccessResponseFactory,
    protocol: Protocol,
    outcome: AccessOutcome,
    err: AuthorityError,
) -> Result<ServiceAccessResponse, AuthorityError> {
    if proxied {
        Ok(factory.failure_response(protocol, outcome, None, None))
    } else {
        Err(err)
    }
}
