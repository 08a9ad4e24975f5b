//! The access token: a service-scoped, validatable capability.

use crate::{
    AccessValidationError, LogoutNotifier, Protocol, ServiceAccessRequest,
    TokenServiceAccessRequest,
};
use aegis_types::{AccessId, SessionId};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How many validations an access survives, and what validation does to
/// its state.
///
/// | Policy | Validation | Stored? |
/// |--------|------------|---------|
/// | `SelfValidating` | no state change; the token is complete at issuance and never looked up | no |
/// | `BoundedUses(n)` | decrements a counter; consumed at zero | yes |
/// | `LogoutOnly` | no state change; the access exists for logout cascades and delegation | yes |
///
/// The classic ticket kinds map onto this table: a service ticket is
/// `BoundedUses(1)`, a proxy-granting token is `LogoutOnly`, a SAML
/// assertion is `SelfValidating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsagePolicy {
    /// Carries its own proof; the authority is never asked again.
    SelfValidating,
    /// Valid for a fixed number of validations.
    BoundedUses(u32),
    /// Never consumed by validation; lives until logout.
    LogoutOnly,
}

/// A token granting one relying service access on behalf of a session.
///
/// An access is owned by exactly one session (it lives inside the
/// session's access map) and refers back to it by id only — ownership
/// cycles are expressed as store indices, never as references.
#[derive(Debug, Clone)]
pub struct Access {
    id: AccessId,
    resource_id: String,
    session_id: SessionId,
    protocol: Protocol,
    policy: UsagePolicy,
    remaining_uses: u32,
    used: bool,
    local_session_destroyed: bool,
    created: Instant,
}

impl Access {
    /// Mints a fresh access for `request`, owned by `session_id`.
    ///
    /// Only [`Session::grant`](crate::Session::grant) calls this.
    pub(crate) fn mint(session_id: SessionId, request: &ServiceAccessRequest) -> Self {
        let policy = request.usage_policy();
        let remaining_uses = match policy {
            UsagePolicy::BoundedUses(n) => n,
            UsagePolicy::SelfValidating | UsagePolicy::LogoutOnly => 0,
        };
        Self {
            id: AccessId::new(),
            resource_id: request.service_id().to_string(),
            session_id,
            protocol: request.protocol(),
            policy,
            remaining_uses,
            used: false,
            local_session_destroyed: false,
            created: Instant::now(),
        }
    }

    /// The token value handed to the relying party.
    #[must_use]
    pub fn id(&self) -> &AccessId {
        &self.id
    }

    /// The service URI this access was granted to.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// The session that granted this access.
    #[must_use]
    pub fn owning_session(&self) -> &SessionId {
        &self.session_id
    }

    /// Protocol family for response encoding.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// The usage policy this access was minted under.
    #[must_use]
    pub fn usage_policy(&self) -> UsagePolicy {
        self.policy
    }

    /// When the access was minted.
    #[must_use]
    pub fn created(&self) -> Instant {
        self.created
    }

    /// Whether the access has been consumed.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Whether the relying party confirmed destroying its local session.
    #[must_use]
    pub fn is_local_session_destroyed(&self) -> bool {
        self.local_session_destroyed
    }

    /// Whether the store must index this access by token.
    ///
    /// Self-validating tokens are complete at issuance: they support
    /// neither later validation nor logout callbacks, so indexing them
    /// would only grow the store.
    #[must_use]
    pub fn requires_storage(&self) -> bool {
        !matches!(self.policy, UsagePolicy::SelfValidating)
    }

    /// An access is fully consumed once it is used and its relying
    /// party's local session is gone; the store drops its token index
    /// entry on the next update.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.used && self.local_session_destroyed
    }

    /// Validates a presented token against this access.
    ///
    /// State changes follow the [`UsagePolicy`] table; the resource
    /// match is enforced first — a token is only ever valid for the
    /// service it was granted to.
    ///
    /// # Errors
    ///
    /// [`AccessValidationError::ResourceMismatch`] on a service
    /// mismatch, [`AccessValidationError::TokenUsed`] on a consumed
    /// bounded-use token.
    pub fn validate(
        &mut self,
        request: &TokenServiceAccessRequest,
    ) -> Result<(), AccessValidationError> {
        if request.service_id() != self.resource_id {
            return Err(AccessValidationError::ResourceMismatch {
                granted: self.resource_id.clone(),
                presented: request.service_id().to_string(),
            });
        }

        match self.policy {
            UsagePolicy::SelfValidating | UsagePolicy::LogoutOnly => Ok(()),
            UsagePolicy::BoundedUses(_) => {
                if self.used {
                    return Err(AccessValidationError::TokenUsed);
                }
                self.remaining_uses = self.remaining_uses.saturating_sub(1);
                if self.remaining_uses == 0 {
                    self.used = true;
                }
                Ok(())
            }
        }
    }

    /// Best-effort single logout for this access.
    ///
    /// Asks the notifier to destroy the relying party's local session
    /// and records the outcome. Idempotent: once destroyed, later calls
    /// return `true` without notifying again.
    pub fn invalidate(&mut self, notifier: &dyn LogoutNotifier) -> bool {
        if self.local_session_destroyed {
            return true;
        }
        let destroyed = notifier.notify(&self.resource_id, &self.id);
        if destroyed {
            self.local_session_destroyed = true;
        } else {
            tracing::debug!(access = %self.id, resource = %self.resource_id,
                "relying party logout not confirmed");
        }
        destroyed
    }
}
