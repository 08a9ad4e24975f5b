//! Service-endpoint credential handler.
//!
//! When a relying service authenticates itself (to obtain delegated
//! sessions) it presents its callback URL. This handler checks the
//! scheme and then asks an [`EndpointValidator`] to confirm the
//! endpoint answers; the TLS handshake the validator performs is the
//! actual authentication. The core owns no sockets — the validator
//! implementation does.

use crate::{AuthenticationError, AuthenticationHandler, Credential};
use aegis_types::Principal;
use async_trait::async_trait;
use std::sync::Arc;

/// Confirms that a callback endpoint is reachable and answers sanely.
#[async_trait]
pub trait EndpointValidator: Send + Sync {
    /// Returns `true` if the endpoint at `url` responded acceptably.
    async fn is_valid_endpoint(&self, url: &str) -> bool;
}

/// Authenticates [`Credential::Url`] by probing the named endpoint.
///
/// The resolved principal's id is the URL itself: for service
/// credentials the callback URL *is* the identity.
pub struct UrlEndpointHandler {
    validator: Arc<dyn EndpointValidator>,
    require_secure: bool,
}

impl UrlEndpointHandler {
    /// Creates a handler requiring `https` endpoints.
    #[must_use]
    pub fn new(validator: Arc<dyn EndpointValidator>) -> Self {
        Self {
            validator,
            require_secure: true,
        }
    }

    /// Allows plain `http` endpoints. Intended for test rigs; production
    /// deployments keep the secure default.
    #[must_use]
    pub fn allow_insecure(mut self) -> Self {
        self.require_secure = false;
        self
    }
}

#[async_trait]
impl AuthenticationHandler for UrlEndpointHandler {
    fn name(&self) -> &str {
        "url-endpoint"
    }

    fn supports(&self, credential: &Credential) -> bool {
        matches!(credential, Credential::Url { .. })
    }

    async fn authenticate(
        &self,
        credential: &Credential,
    ) -> Result<Principal, AuthenticationError> {
        let Credential::Url { url } = credential else {
            return Err(AuthenticationError::InvalidCredentials);
        };

        if self.require_secure && !url.starts_with("https://") {
            tracing::debug!(%url, "endpoint rejected: not https");
            return Err(AuthenticationError::InvalidCredentials);
        }

        if self.validator.is_valid_endpoint(url).await {
            Ok(Principal::new(url.clone()))
        } else {
            tracing::debug!(%url, "endpoint did not answer acceptably");
            Err(AuthenticationError::InvalidCredentials)
        }
    }
}
