//! The authentication pipeline (first-match handler composition).

use crate::{
    Authentication, AuthenticationHandler, AuthenticationRequest, AuthenticationResponse,
    Credential, ErrorKind,
};
use aegis_types::{AttributeMap, Principal};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on a single handler invocation.
pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(5);

/// Composes an ordered list of [`AuthenticationHandler`]s into the C1
/// contract.
///
/// # Policy
///
/// - For each credential, the **first** handler whose `supports` returns
///   `true` is invoked; later handlers never see it.
/// - Every credential must authenticate for the response to succeed.
/// - Failures are recorded per handler and do not short-circuit: a
///   request with three credentials reports all three outcomes.
/// - A credential no handler supports fails with
///   [`ErrorKind::Unsupported`] under the credential's mechanism tag.
/// - Each handler call is bounded by the configured timeout; an elapsed
///   call is recorded as [`ErrorKind::Timeout`].
///
/// The principal is taken from the first successful credential; a later
/// credential resolving a *different* identity marks the whole request
/// failed (one request, one identity).
pub struct AuthenticationManager {
    handlers: Vec<Arc<dyn AuthenticationHandler>>,
    handler_timeout: Duration,
}

impl AuthenticationManager {
    /// Creates a manager over the given handlers, consulted in order.
    #[must_use]
    pub fn new(handlers: Vec<Arc<dyn AuthenticationHandler>>) -> Self {
        Self {
            handlers,
            handler_timeout: DEFAULT_HANDLER_TIMEOUT,
        }
    }

    /// Overrides the per-handler timeout.
    #[must_use]
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Runs the pipeline.
    pub async fn authenticate(&self, request: &AuthenticationRequest) -> AuthenticationResponse {
        if request.credentials().is_empty() {
            tracing::debug!("authentication request carried no credentials");
            let mut failures = HashMap::new();
            failures.insert("request".to_string(), ErrorKind::InvalidCredentials);
            return AuthenticationResponse::failure(failures);
        }

        let mut principal: Option<Principal> = None;
        let mut authentications: Vec<Authentication> = Vec::new();
        let mut failures: HashMap<String, ErrorKind> = HashMap::new();
        let mut attributes = AttributeMap::new();

        for credential in request.credentials() {
            match self.resolve(credential).await {
                Resolution::Success { handler, resolved } => {
                    if let Some(existing) = &principal {
                        if !existing.same_identity(&resolved) {
                            tracing::warn!(
                                first = existing.id(),
                                second = resolved.id(),
                                "credentials in one request resolved different identities"
                            );
                            failures.insert(handler, ErrorKind::InvalidCredentials);
                            continue;
                        }
                    }
                    attributes.extend(resolved.attributes().clone());
                    authentications.push(Authentication::now(resolved.clone(), handler));
                    principal.get_or_insert(resolved);
                }
                Resolution::Failure { handler, kind } => {
                    failures.insert(handler, kind);
                }
            }
        }

        let all_succeeded = failures.is_empty() && authentications.len() == request.credentials().len();
        match (all_succeeded, principal) {
            (true, Some(principal)) => {
                tracing::debug!(principal = principal.id(), "authentication succeeded");
                AuthenticationResponse::success(
                    principal,
                    authentications,
                    attributes,
                    request.is_long_term(),
                )
            }
            (_, _) => {
                tracing::debug!(failures = failures.len(), "authentication failed");
                AuthenticationResponse::failure(failures)
            }
        }
    }

    /// Finds the first supporting handler and runs it under the timeout.
    async fn resolve(&self, credential: &Credential) -> Resolution {
        let Some(handler) = self.handlers.iter().find(|h| h.supports(credential)) else {
            return Resolution::Failure {
                handler: credential.mechanism().to_string(),
                kind: ErrorKind::Unsupported,
            };
        };

        let name = handler.name().to_string();
        match tokio::time::timeout(self.handler_timeout, handler.authenticate(credential)).await {
            Ok(Ok(principal)) => Resolution::Success {
                handler: name,
                resolved: principal,
            },
            Ok(Err(err)) => {
                tracing::debug!(handler = %name, error = %err, "handler rejected credential");
                Resolution::Failure {
                    handler: name,
                    kind: err.kind(),
                }
            }
            Err(_elapsed) => {
                tracing::warn!(handler = %name, timeout = ?self.handler_timeout, "handler timed out");
                Resolution::Failure {
                    handler: name,
                    kind: ErrorKind::Timeout,
                }
            }
        }
    }
}

enum Resolution {
    Success { handler: String, resolved: Principal },
    Failure { handler: String, kind: ErrorKind },
}
