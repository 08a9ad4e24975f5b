//! The central authentication service orchestrator (C7).
//!
//! `Authority` composes the authentication manager, the session store,
//! the services registry, the response-factory registry and the plugin
//! chains into the four public operations: `login`, `logout` (by
//! session or by principal), `validate` and `grant_access`.
//!
//! # Cancellation
//!
//! Every await happens *before* state is mutated; each operation's
//! mutation and its store update sit in one synchronous block. A caller
//! dropping the future mid-operation can therefore never strand a
//! consumed token or an unpersisted delegated session.

use crate::cascade::destroy_session_tree;
use crate::response::proxied_or_err;
use crate::{
    AccessOutcome, AuthenticationResponsePlugin, AuthorityError, AuthorityObserver, LoginRequest,
    LoginResponse, LogoutResponse, PreAuthenticationPlugin, ResponseFactoryRegistry,
    ServiceAccessResponse, ServicesManager,
};
use aegis_auth::{AuthenticationManager, AuthenticationRequest};
use aegis_session::{
    AccessExpirationPolicy, AccessValidationError, ExpirationPolicy, LogoutNotifier,
    ServiceAccessRequest, SessionHandle, SessionStorage, TokenServiceAccessRequest,
};
use aegis_types::SessionId;
use std::sync::Arc;
use std::time::Duration;

/// The single-sign-on authority.
///
/// Thread safe; front-ends share one instance behind an `Arc` and call
/// it from every request handler. Build one with
/// [`Authority::builder`](crate::AuthorityBuilder).
pub struct Authority {
    pub(crate) authentication: AuthenticationManager,
    pub(crate) storage: Arc<dyn SessionStorage>,
    pub(crate) services: Arc<dyn ServicesManager>,
    pub(crate) factories: ResponseFactoryRegistry,
    pub(crate) pre_auth_plugins: Vec<Arc<dyn PreAuthenticationPlugin>>,
    pub(crate) response_plugins: Vec<Arc<dyn AuthenticationResponsePlugin>>,
    pub(crate) observers: Vec<Arc<dyn AuthorityObserver>>,
    pub(crate) notifier: Arc<dyn LogoutNotifier>,
    pub(crate) session_policy: Arc<dyn ExpirationPolicy>,
    pub(crate) access_policy: Arc<dyn AccessExpirationPolicy>,
    pub(crate) sweep_interval: Duration,
}

impl Authority {
    /// Starts building an authority.
    #[must_use]
    pub fn builder() -> crate::AuthorityBuilder {
        crate::AuthorityBuilder::new()
    }

    /// The session store, for administrative front-ends.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    /// A sweeper wired to this authority's store, policy and notifier.
    #[must_use]
    pub fn sweeper(&self) -> crate::ExpirationSweeper {
        crate::ExpirationSweeper::new(
            self.storage.clone(),
            self.session_policy.clone(),
            self.notifier.clone(),
            self.sweep_interval,
        )
    }

    /// Authenticates credentials and, on success, establishes a session.
    ///
    /// Pre-authentication plugins run first, in order; the first one
    /// returning a response short-circuits everything. Response plugins
    /// then see every authentication outcome and cannot veto.
    ///
    /// # Errors
    ///
    /// Only [`AuthorityError::Storage`]; authentication failure is a
    /// response with no session.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthorityError> {
        for plugin in &self.pre_auth_plugins {
            if let Some(response) = plugin.continue_with_authentication(request).await {
                tracing::debug!("pre-authentication plugin short-circuited the login");
                self.notify_login(&response);
                return Ok(response);
            }
        }

        let auth_request =
            AuthenticationRequest::new(request.credentials().to_vec(), request.is_long_term());
        let auth_response = self.authentication.authenticate(&auth_request).await;

        for plugin in &self.response_plugins {
            plugin.handle(request, &auth_response).await;
        }

        let response = if auth_response.succeeded() {
            let session = self.storage.create_session(&auth_response)?;
            tracing::info!(session = %session.read().id(), "login succeeded");
            LoginResponse::granted(session, auth_response)
        } else {
            tracing::info!(failures = auth_response.failures().len(), "login denied");
            LoginResponse::denied(auth_response)
        };
        self.notify_login(&response);
        Ok(response)
    }

    /// Destroys one session and, transitively, its delegated children.
    ///
    /// Unknown ids yield an empty response; logout is idempotent.
    ///
    /// # Errors
    ///
    /// Only [`AuthorityError::Storage`].
    pub fn logout_session(&self, id: &SessionId) -> Result<LogoutResponse, AuthorityError> {
        let destroyed =
            destroy_session_tree(self.storage.as_ref(), self.notifier.as_ref(), id)?;
        let response = LogoutResponse::new(destroyed);
        tracing::info!(session = %id, destroyed = response.sessions().len(), "logout");
        self.notify_logout(&response);
        Ok(response)
    }

    /// Administrative logout: destroys every session of a principal.
    ///
    /// Not atomic across sessions — each destroy is independent, and a
    /// failure mid-way leaves earlier destroys done.
    ///
    /// # Errors
    ///
    /// Only [`AuthorityError::Storage`].
    pub fn logout_principal(&self, principal_id: &str) -> Result<LogoutResponse, AuthorityError> {
        let sessions = self.storage.find_sessions_by_principal(principal_id)?;
        let mut destroyed = Vec::new();
        for session in sessions {
            let id = *session.read().id();
            destroyed.extend(destroy_session_tree(
                self.storage.as_ref(),
                self.notifier.as_ref(),
                &id,
            )?);
        }
        let response = LogoutResponse::new(destroyed);
        tracing::info!(principal = principal_id, destroyed = response.sessions().len(),
            "administrative logout");
        self.notify_logout(&response);
        Ok(response)
    }

    /// Validates a previously issued token, optionally minting a
    /// delegated session when delegation credentials accompany it.
    ///
    /// All business failures are in-band: the relying party always gets
    /// a well-formed response.
    ///
    /// # Errors
    ///
    /// Only [`AuthorityError::Storage`].
    pub async fn validate(
        &self,
        request: &TokenServiceAccessRequest,
    ) -> Result<ServiceAccessResponse, AuthorityError> {
        let response = self.validate_inner(request).await?;
        for observer in &self.observers {
            observer.on_validate(request.token(), &response);
        }
        Ok(response)
    }

    async fn validate_inner(
        &self,
        request: &TokenServiceAccessRequest,
    ) -> Result<ServiceAccessResponse, AuthorityError> {
        if !request.is_valid() {
            tracing::debug!(token = %request.token(), "validation request not shape-valid");
            let factory = self.factories.for_validation(request);
            return Ok(factory.failure_response(
                request.protocol(),
                AccessOutcome::InvalidRequest,
                None,
                None,
            ));
        }

        let Some(session) = self.storage.find_session_by_access_id(request.token())? else {
            tracing::debug!(token = %request.token(), "no stored session bears the token");
            let factory = self.factories.for_validation(request);
            return Ok(factory.failure_response(
                request.protocol(),
                AccessOutcome::TokenNotFound,
                None,
                None,
            ));
        };

        // Delegation first; its failure must not consume the primary
        // validation.
        if !request.credentials().is_empty() {
            self.maybe_delegate(&session, request).await?;
        }

        let (outcome, access) = {
            let mut locked = session.write();
            let session_invalid = locked.is_invalidated();
            let session_expired = self.session_policy.is_expired(&locked);
            let (outcome, access) = match locked.get_access_mut(request.token()) {
                None => (AccessOutcome::TokenNotFound, None),
                Some(access) => {
                    let outcome = if session_invalid {
                        AccessOutcome::SessionInvalidated
                    } else if session_expired || self.access_policy.is_expired(access) {
                        AccessOutcome::TokenExpired
                    } else {
                        match access.validate(request) {
                            Ok(()) => AccessOutcome::Validated,
                            Err(AccessValidationError::TokenUsed) => AccessOutcome::TokenUsed,
                            Err(AccessValidationError::ResourceMismatch { .. }) => {
                                AccessOutcome::ResourceMismatch
                            }
                        }
                    };
                    (outcome, Some(access.clone()))
                }
            };
            if outcome == AccessOutcome::Validated {
                locked.touch();
            }
            let snapshot = locked.clone();
            drop(locked);
            // Persist even on failure outcomes: a consumed use must not
            // reappear because the response was never emitted.
            self.storage.update_session(&snapshot)?;
            (outcome, access)
        };

        tracing::debug!(token = %request.token(), outcome = ?outcome, "token validation");

        let response = match (&outcome, &access) {
            (AccessOutcome::Validated, Some(access)) => self
                .factories
                .for_access(access)
                .validation_response(session, access.clone()),
            _ => {
                let factory = self.factories.for_validation(request);
                factory.failure_response(request.protocol(), outcome, Some(session), None)
            }
        };
        Ok(response)
    }

    /// Authenticates delegation credentials and, on success, mints and
    /// persists a delegated session anchored on the presented token.
    async fn maybe_delegate(
        &self,
        session: &SessionHandle,
        request: &TokenServiceAccessRequest,
    ) -> Result<(), AuthorityError> {
        let auth_request = AuthenticationRequest::new(request.credentials().to_vec(), false);
        let auth_response = self.authentication.authenticate(&auth_request).await;
        if !auth_response.succeeded() {
            tracing::debug!(token = %request.token(),
                "delegation authentication failed; primary validation continues");
            return Ok(());
        }

        let delegated = session.write().delegate(request.token(), &auth_response);
        match delegated {
            Ok(child) => {
                self.storage.update_session(&child)?;
                let snapshot = session.read().clone();
                self.storage.update_session(&snapshot)?;
                tracing::info!(parent_access = %request.token(), child = %child.id(),
                    "delegated session persisted");
            }
            Err(err) => {
                tracing::debug!(error = %err,
                    "delegation rejected; primary validation continues");
            }
        }
        Ok(())
    }

    /// Mints an access token for a registered service against an
    /// existing session, optionally forcing re-authentication first.
    ///
    /// # Errors
    ///
    /// Non-proxied failures surface as
    /// [`AuthorityError::UnauthorizedService`],
    /// [`AuthorityError::SessionNotFound`] or
    /// [`AuthorityError::SessionInvalidated`]; proxied requests receive
    /// the equivalent in-band response instead. Store failures are
    /// always [`AuthorityError::Storage`].
    pub async fn grant_access(
        &self,
        request: &ServiceAccessRequest,
    ) -> Result<ServiceAccessResponse, AuthorityError> {
        let response = self.grant_access_inner(request).await?;
        for observer in &self.observers {
            observer.on_grant(request.service_id(), &response);
        }
        Ok(response)
    }

    async fn grant_access_inner(
        &self,
        request: &ServiceAccessRequest,
    ) -> Result<ServiceAccessResponse, AuthorityError> {
        if !self.services.matches_existing_service(request) {
            return Err(AuthorityError::UnauthorizedService {
                service_id: request.service_id().to_string(),
            });
        }

        let factory = self.factories.for_grant(request);

        if !request.is_valid() {
            return Ok(factory.failure_response(
                request.protocol(),
                AccessOutcome::InvalidRequest,
                None,
                None,
            ));
        }

        // A request naming no session falls through to the not-found
        // branch, exactly like one naming a session the store lost.
        let session = match request.session_id() {
            Some(id) => self.storage.find_session_by_session_id(id)?,
            None => None,
        };
        let Some(session) = session else {
            return proxied_or_err(
                request.is_proxied(),
                factory,
                request.protocol(),
                AccessOutcome::SessionNotFound,
                AuthorityError::SessionNotFound {
                    id: request.session_id().copied(),
                },
            );
        };
        let session_id = *session.read().id();

        if !session.read().is_valid(self.session_policy.as_ref()) {
            return proxied_or_err(
                request.is_proxied(),
                factory,
                request.protocol(),
                AccessOutcome::SessionInvalidated,
                AuthorityError::SessionInvalidated { id: session_id },
            );
        }

        let mut remaining = Vec::new();
        let mut auth_response = None;
        let active_session: SessionHandle;

        if request.is_force_authentication() {
            let auth_request = AuthenticationRequest::new(
                request.credentials().to_vec(),
                request.is_long_term(),
            );
            let response = self.authentication.authenticate(&auth_request).await;

            if !response.succeeded() {
                return Ok(factory.failure_response(
                    request.protocol(),
                    AccessOutcome::AuthenticationFailed,
                    Some(session),
                    Some(response),
                ));
            }

            let same_principal = {
                let locked = session.read();
                response
                    .principal()
                    .is_some_and(|p| p.same_identity(locked.principal()))
            };

            if same_principal {
                let snapshot = {
                    let mut locked = session.write();
                    locked.add_authentications(response.authentications());
                    locked.clone()
                };
                self.storage.update_session(&snapshot)?;
                active_session = session;
            } else {
                let destroyed = destroy_session_tree(
                    self.storage.as_ref(),
                    self.notifier.as_ref(),
                    &session_id,
                )?;
                remaining = LogoutResponse::new(destroyed).remaining_accesses();
                active_session = self.storage.create_session(&response)?;
                tracing::info!(old = %session_id, new = %active_session.read().id(),
                    "forced re-authentication switched principal");
            }
            auth_response = Some(response);
        } else {
            active_session = session;
        }

        let (access, snapshot) = {
            let mut locked = active_session.write();
            let reused = factory
                .idempotent_grant()
                .then(|| locked.find_reusable_access(request.service_id()).cloned())
                .flatten();
            let access = match reused {
                Some(access) => access,
                None => match locked.grant(request) {
                    Ok(access) => access,
                    Err(err) => {
                        // The session was invalidated between the
                        // validity check and the grant.
                        tracing::debug!(error = %err, "grant lost a race with invalidation");
                        let id = *locked.id();
                        drop(locked);
                        return proxied_or_err(
                            request.is_proxied(),
                            factory,
                            request.protocol(),
                            AccessOutcome::SessionInvalidated,
                            AuthorityError::SessionInvalidated { id },
                        );
                    }
                },
            };
            (access, locked.clone())
        };
        self.storage.update_session(&snapshot)?;

        Ok(self.factories.for_access(&access).grant_response(
            active_session,
            access,
            auth_response,
            remaining,
        ))
    }

    fn notify_login(&self, response: &LoginResponse) {
        for observer in &self.observers {
            observer.on_login(response);
        }
    }

    fn notify_logout(&self, response: &LogoutResponse) {
        for observer in &self.observers {
            observer.on_logout(response);
        }
    }
}
