//! Expiration policies: pure predicates over session and access state.
//!
//! Policies are consulted inside [`Session::is_valid`](crate::Session::is_valid)
//! and by the background sweep; they never mutate anything. Destruction
//! of an expired session is always a store operation, elsewhere.

use crate::{Access, Session};
use std::time::Duration;

/// Decides whether a session has expired.
pub trait ExpirationPolicy: Send + Sync {
    /// Pure predicate; `true` means the session should be treated as
    /// dead and swept.
    fn is_expired(&self, session: &Session) -> bool;
}

/// Decides whether an access token has expired.
pub trait AccessExpirationPolicy: Send + Sync {
    /// Pure predicate over the access.
    fn is_expired(&self, access: &Access) -> bool;
}

/// Hard TTL since creation, regardless of activity.
#[derive(Debug, Clone, Copy)]
pub struct HardTtl {
    ttl: Duration,
}

impl HardTtl {
    /// A policy expiring sessions `ttl` after creation.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl ExpirationPolicy for HardTtl {
    fn is_expired(&self, session: &Session) -> bool {
        session.created().elapsed() > self.ttl
    }
}

/// Sliding TTL since last activity.
#[derive(Debug, Clone, Copy)]
pub struct SlidingTtl {
    ttl: Duration,
}

impl SlidingTtl {
    /// A policy expiring sessions `ttl` after their last use.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl ExpirationPolicy for SlidingTtl {
    fn is_expired(&self, session: &Session) -> bool {
        session.last_used().elapsed() > self.ttl
    }
}

/// Picks a different policy for long-term ("remember-me") sessions.
///
/// Remember-me is a single boolean on the session; this policy is the
/// only place it changes behavior.
pub struct LongTermAware {
    standard: Box<dyn ExpirationPolicy>,
    long_term: Box<dyn ExpirationPolicy>,
}

impl LongTermAware {
    /// Combines a standard policy with a long-term one.
    #[must_use]
    pub fn new(standard: Box<dyn ExpirationPolicy>, long_term: Box<dyn ExpirationPolicy>) -> Self {
        Self {
            standard,
            long_term,
        }
    }
}

impl ExpirationPolicy for LongTermAware {
    fn is_expired(&self, session: &Session) -> bool {
        if session.is_long_term() {
            self.long_term.is_expired(session)
        } else {
            self.standard.is_expired(session)
        }
    }
}

/// Never expires anything. For tests and delegated-trust setups where
/// lifetime is bounded elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverExpires;

impl ExpirationPolicy for NeverExpires {
    fn is_expired(&self, _session: &Session) -> bool {
        false
    }
}

impl AccessExpirationPolicy for NeverExpires {
    fn is_expired(&self, _access: &Access) -> bool {
        false
    }
}

/// Hard TTL for access tokens. Service tickets are conventionally valid
/// for seconds, not minutes.
#[derive(Debug, Clone, Copy)]
pub struct AccessHardTtl {
    ttl: Duration,
}

impl AccessHardTtl {
    /// A policy expiring accesses `ttl` after minting.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl AccessExpirationPolicy for AccessHardTtl {
    fn is_expired(&self, access: &Access) -> bool {
        access.created().elapsed() > self.ttl
    }
}
