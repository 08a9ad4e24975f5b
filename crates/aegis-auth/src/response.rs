//! The outcome of the authentication pipeline.

use crate::{Authentication, ErrorKind};
use aegis_types::{AttributeMap, Principal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The result of running an [`AuthenticationRequest`](crate::AuthenticationRequest)
/// through the manager.
///
/// Success and failure are not exclusive worlds: a request with several
/// credentials can succeed overall while individual handlers recorded
/// failures. `succeeded()` is the authoritative bit — it is true only
/// when *every* credential authenticated and a principal was resolved.
///
/// # Shape
///
/// | Field | On success | On failure |
/// |-------|-----------|------------|
/// | `principal` | resolved identity | `None` |
/// | `authentications` | one per credential | empty |
/// | `failures` | possibly empty | at least one entry |
/// | `attributes` | merged handler attributes | empty |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    succeeded: bool,
    principal: Option<Principal>,
    authentications: Vec<Authentication>,
    failures: HashMap<String, ErrorKind>,
    attributes: AttributeMap,
    long_term: bool,
}

impl AuthenticationResponse {
    /// Builds a successful response.
    #[must_use]
    pub fn success(
        principal: Principal,
        authentications: Vec<Authentication>,
        attributes: AttributeMap,
        long_term: bool,
    ) -> Self {
        Self {
            succeeded: true,
            principal: Some(principal),
            authentications,
            failures: HashMap::new(),
            attributes,
            long_term,
        }
    }

    /// Builds a failed response carrying the per-handler failure map.
    #[must_use]
    pub fn failure(failures: HashMap<String, ErrorKind>) -> Self {
        Self {
            succeeded: false,
            principal: None,
            authentications: Vec::new(),
            failures,
            attributes: AttributeMap::new(),
            long_term: false,
        }
    }

    /// Attaches partial failures to a successful response (some
    /// optional credential failed while the required ones passed).
    #[must_use]
    pub fn with_failures(mut self, failures: HashMap<String, ErrorKind>) -> Self {
        self.failures = failures;
        self
    }

    /// Whether every credential authenticated.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// The resolved identity; `None` unless [`succeeded`](Self::succeeded).
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// One record per successfully authenticated credential.
    #[must_use]
    pub fn authentications(&self) -> &[Authentication] {
        &self.authentications
    }

    /// Failures keyed by handler name (or credential mechanism when no
    /// handler supported it).
    #[must_use]
    pub fn failures(&self) -> &HashMap<String, ErrorKind> {
        &self.failures
    }

    /// Attributes merged across all handlers.
    #[must_use]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Whether the originating request asked for a long-term session.
    #[must_use]
    pub fn is_long_term(&self) -> bool {
        self.long_term
    }
}
