//! The input to the authentication pipeline.

use crate::Credential;
use serde::{Deserialize, Serialize};

/// A request to resolve credentials into a principal.
///
/// Built by the orchestrator from a login request or from delegation
/// credentials during token validation. The credential list must be
/// non-empty; [`AuthenticationManager`](crate::AuthenticationManager)
/// fails an empty request without consulting any handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationRequest {
    credentials: Vec<Credential>,
    long_term: bool,
}

impl AuthenticationRequest {
    /// Creates a request for the given credentials.
    #[must_use]
    pub fn new(credentials: Vec<Credential>, long_term: bool) -> Self {
        Self {
            credentials,
            long_term,
        }
    }

    /// The credentials to authenticate, in presentation order.
    #[must_use]
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Whether the caller asked for a long-term ("remember-me") session.
    #[must_use]
    pub fn is_long_term(&self) -> bool {
        self.long_term
    }
}
