//! Identifier types for Aegis.
//!
//! Session and access identifiers are the bearer secrets of the whole
//! protocol: whoever presents one is treated as its owner. Both are
//! UUID v4 (122 random bits), newtyped so a session id can never be
//! passed where an access token is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a [`Session`](https://docs.rs/aegis-session) — the
/// ticket-granting ticket of classic CAS deployments.
///
/// # Unguessability
///
/// Ids are minted from `Uuid::new_v4()`. They are never derived from
/// principal names or timestamps, so holding one session id gives no
/// information about any other.
///
/// # Why No Default?
///
/// **DO NOT implement `Default` for `SessionId`.**
///
/// A session id that was not minted by the session store refers to
/// nothing. Always obtain one from a created session.
///
/// # Example
///
/// ```
/// use aegis_types::SessionId;
///
/// let a = SessionId::new();
/// let b = SessionId::new();
///
/// assert_ne!(a, b);
/// assert!(a.to_string().starts_with("ses:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

#[allow(clippy::new_without_default)] // Default intentionally not implemented - see module docs
impl SessionId {
    /// Mints a new random session id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ses:{}", self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, "ses:").map(Self)
    }
}

/// Identifier for an [`Access`](https://docs.rs/aegis-session) — a
/// service ticket or proxy-granting token.
///
/// Access ids are what relying parties hand back to the authority for
/// validation, so they share the unguessability rules of [`SessionId`].
/// The store indexes by access id; uniqueness across all live sessions
/// follows from the 122 bits of randomness.
///
/// # Example
///
/// ```
/// use aegis_types::AccessId;
///
/// let token = AccessId::new();
/// assert!(token.to_string().starts_with("acc:"));
///
/// let parsed: AccessId = token.to_string().parse().expect("round-trip");
/// assert_eq!(parsed, token);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessId(Uuid);

#[allow(clippy::new_without_default)] // Default intentionally not implemented - tokens are minted by Session::grant
impl AccessId {
    /// Mints a new random access token id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for AccessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "acc:{}", self.0)
    }
}

impl std::str::FromStr for AccessId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, "acc:").map(Self)
    }
}

/// Error returned when parsing a [`SessionId`] or [`AccessId`] from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    input: String,
}

impl ParseIdError {
    /// The text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "not a valid id: {:?}", self.input)
    }
}

impl std::error::Error for ParseIdError {}

/// Accepts either the prefixed display form or a bare UUID.
fn parse_prefixed(s: &str, prefix: &str) -> Result<Uuid, ParseIdError> {
    let bare = s.strip_prefix(prefix).unwrap_or(s);
    Uuid::parse_str(bare).map_err(|_| ParseIdError {
        input: s.to_string(),
    })
}
