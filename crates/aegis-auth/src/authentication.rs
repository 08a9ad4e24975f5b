//! The record of one completed authentication.

use aegis_types::{AttributeMap, Principal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successful authentication event.
///
/// A session accumulates these over its lifetime: the initial login adds
/// one per successful credential, and every forced re-authentication of
/// the same principal appends more. The list is append-only; nothing
/// ever rewrites history.
///
/// # Example
///
/// ```
/// use aegis_auth::Authentication;
/// use aegis_types::Principal;
///
/// let auth = Authentication::now(Principal::new("alice"), "user-password");
/// assert_eq!(auth.principal().id(), "alice");
/// assert_eq!(auth.method(), "user-password");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    principal: Principal,
    instant: DateTime<Utc>,
    method: String,
    attributes: AttributeMap,
}

impl Authentication {
    /// Records an authentication happening now, with no extra attributes.
    #[must_use]
    pub fn now(principal: Principal, method: impl Into<String>) -> Self {
        Self::at(principal, method, Utc::now())
    }

    /// Records an authentication at an explicit instant.
    #[must_use]
    pub fn at(principal: Principal, method: impl Into<String>, instant: DateTime<Utc>) -> Self {
        Self {
            principal,
            instant,
            method: method.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Attaches authentication-level attributes (e.g. the LoA the
    /// handler asserted).
    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// The identity this event authenticated.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// When the authentication completed.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The mechanism tag (usually the handler name).
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Attributes scoped to this authentication event.
    #[must_use]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_principal_and_method() {
        let auth = Authentication::now(Principal::new("alice"), "user-password");
        assert_eq!(auth.principal().id(), "alice");
        assert_eq!(auth.method(), "user-password");
        assert!(auth.attributes().is_empty());
    }

    #[test]
    fn explicit_instant_is_kept() {
        let when = "2025-06-01T12:00:00Z".parse().expect("valid rfc3339");
        let auth = Authentication::at(Principal::new("alice"), "x509", when);
        assert_eq!(auth.instant(), when);
    }

    #[test]
    fn serde_round_trip() {
        let auth = Authentication::now(Principal::new("alice"), "user-password");
        let json = serde_json::to_string(&auth).expect("serialize");
        let back: Authentication = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, auth);
    }
}
