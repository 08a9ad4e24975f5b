//! Principal (authenticated identity) types.
//!
//! A [`Principal`] is what the authentication pipeline resolves
//! credentials into: an opaque identity plus the attributes the identity
//! source released. It carries no permission logic — what a principal
//! may do is decided by the services registry and the session layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Multi-valued attributes released by an identity source.
///
/// CAS attribute release is inherently multi-valued (a person has many
/// group memberships, several mail aliases), hence `Vec<String>` values.
pub type AttributeMap = HashMap<String, Vec<String>>;

/// The authenticated identity.
///
/// # Immutability
///
/// A principal is immutable once minted by an authentication handler.
/// Re-authentication produces a *new* `Principal`; the session layer
/// compares ids to decide whether the identity changed. Fields are
/// private to keep it that way.
///
/// # Identity Semantics
///
/// `id` is opaque and globally unique per identity source (a username,
/// an X.509 subject DN, a callback URL for service credentials). Two
/// principals are the same identity exactly when their ids are equal;
/// [`same_identity`](Self::same_identity) exists so call sites don't
/// accidentally compare attribute noise.
///
/// # Example
///
/// ```
/// use aegis_types::Principal;
///
/// let alice = Principal::new("alice")
///     .with_attribute("mail", ["alice@example.org"]);
///
/// assert_eq!(alice.id(), "alice");
/// assert_eq!(
///     alice.attribute("mail"),
///     Some(&vec!["alice@example.org".to_string()])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque identity, unique per identity source.
    id: String,
    /// Attributes released at authentication time.
    attributes: AttributeMap,
}

impl Principal {
    /// Creates a principal with no attributes.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Creates a principal with a pre-built attribute map.
    #[must_use]
    pub fn with_attributes(id: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Builder-style attribute addition, for construction sites and tests.
    ///
    /// # Example
    ///
    /// ```
    /// use aegis_types::Principal;
    ///
    /// let p = Principal::new("bob")
    ///     .with_attribute("memberOf", ["staff", "admins"]);
    /// assert_eq!(p.attribute("memberOf").map(Vec::len), Some(2));
    /// ```
    #[must_use]
    pub fn with_attribute<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// The opaque identity string.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// All released attributes.
    #[must_use]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// The values of one attribute, if released.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Vec<String>> {
        self.attributes.get(name)
    }

    /// Returns `true` if `other` names the same identity, ignoring
    /// attributes.
    #[must_use]
    pub fn same_identity(&self, other: &Principal) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.id)
    }
}
