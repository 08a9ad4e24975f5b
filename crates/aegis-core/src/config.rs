//! Authority configuration.
//!
//! All fields have compile-time defaults so an empty TOML file (or no
//! file at all) yields a working authority.

use aegis_session::{
    AccessExpirationPolicy, AccessHardTtl, ExpirationPolicy, HardTtl, LongTermAware, SlidingTtl,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable knobs of the authority core.
///
/// # Serialization
///
/// Serializes to TOML; every field is optional in the file thanks to
/// `#[serde(default)]`.
///
/// # Example
///
/// ```
/// use aegis_core::AuthorityConfig;
///
/// let config = AuthorityConfig::default();
/// assert_eq!(config.access_ttl_secs, 10);
///
/// let parsed = AuthorityConfig::from_toml("session_ttl_secs = 60").expect("parse");
/// assert_eq!(parsed.session_ttl_secs, 60);
/// assert_eq!(parsed.access_ttl_secs, 10); // untouched fields keep defaults
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    /// Session lifetime in seconds (standard sessions).
    pub session_ttl_secs: u64,

    /// Session lifetime in seconds for long-term ("remember-me")
    /// sessions.
    pub long_term_session_ttl_secs: u64,

    /// When `true`, the standard TTL slides with activity instead of
    /// counting from creation.
    pub sliding_expiration: bool,

    /// Access-token lifetime in seconds. Service tickets are meant to
    /// be validated immediately; keep this small.
    pub access_ttl_secs: u64,

    /// Per-credential-handler timeout in milliseconds.
    pub handler_timeout_ms: u64,

    /// Interval between expiry sweeps, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 8 * 60 * 60,
            long_term_session_ttl_secs: 14 * 24 * 60 * 60,
            sliding_expiration: true,
            access_ttl_secs: 10,
            handler_timeout_ms: 5_000,
            sweep_interval_secs: 60,
        }
    }
}

impl AuthorityConfig {
    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not parse.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// The session expiration policy this config describes: a
    /// long-term-aware combination of the standard and remember-me
    /// TTLs.
    #[must_use]
    pub fn session_policy(&self) -> Box<dyn ExpirationPolicy> {
        let standard: Box<dyn ExpirationPolicy> = if self.sliding_expiration {
            Box::new(SlidingTtl::new(Duration::from_secs(self.session_ttl_secs)))
        } else {
            Box::new(HardTtl::new(Duration::from_secs(self.session_ttl_secs)))
        };
        let long_term: Box<dyn ExpirationPolicy> = Box::new(HardTtl::new(Duration::from_secs(
            self.long_term_session_ttl_secs,
        )));
        Box::new(LongTermAware::new(standard, long_term))
    }

    /// The access expiration policy this config describes.
    #[must_use]
    pub fn access_policy(&self) -> Box<dyn AccessExpirationPolicy> {
        Box::new(AccessHardTtl::new(Duration::from_secs(self.access_ttl_secs)))
    }

    /// The credential-handler timeout as a duration.
    #[must_use]
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms)
    }

    /// The sweep interval as a duration.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AuthorityConfig::default();
        assert!(config.session_ttl_secs < config.long_term_session_ttl_secs);
        assert!(config.access_ttl_secs <= 60);
        assert!(config.handler_timeout_ms >= 1000);
    }

    #[test]
    fn toml_round_trip() {
        let config = AuthorityConfig {
            session_ttl_secs: 1234,
            sliding_expiration: false,
            ..Default::default()
        };
        let rendered = config.to_toml().expect("serialize");
        let parsed = AuthorityConfig::from_toml(&rendered).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let parsed = AuthorityConfig::from_toml("").expect("parse empty");
        assert_eq!(parsed, AuthorityConfig::default());
    }

    #[test]
    fn partial_toml_overrides_one_field() {
        let parsed = AuthorityConfig::from_toml("sweep_interval_secs = 5").expect("parse");
        assert_eq!(parsed.sweep_interval_secs, 5);
        assert_eq!(
            parsed.session_ttl_secs,
            AuthorityConfig::default().session_ttl_secs
        );
    }
}
