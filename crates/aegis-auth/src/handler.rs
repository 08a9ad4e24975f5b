//! The credential handler seam.

use crate::{AuthenticationError, Credential};
use aegis_types::Principal;
use async_trait::async_trait;

/// Authenticates one kind of credential against one identity source.
///
/// Handlers are consulted in registration order by the
/// [`AuthenticationManager`](crate::AuthenticationManager): for each
/// credential, the first handler whose [`supports`](Self::supports)
/// returns `true` is invoked, and no other handler sees that credential.
///
/// # Purity
///
/// Handlers resolve identity and nothing else. They must not touch
/// session state; the session layer has no representation here at all,
/// by construction.
///
/// # Blocking & Timeouts
///
/// `authenticate` may perform network I/O (LDAP bind, endpoint check).
/// The manager wraps every call in the configured timeout, so a handler
/// that hangs costs one bounded wait, not a stuck login.
#[async_trait]
pub trait AuthenticationHandler: Send + Sync {
    /// Stable name used in failure maps, logs and `Authentication::method`.
    fn name(&self) -> &str;

    /// Whether this handler knows how to examine the credential.
    ///
    /// Must be cheap and side-effect free; it runs for every credential
    /// on every request.
    fn supports(&self, credential: &Credential) -> bool;

    /// Resolves the credential to a principal.
    ///
    /// # Errors
    ///
    /// [`AuthenticationError::InvalidCredentials`] when the credential
    /// is understood and wrong; [`AuthenticationError::Unavailable`]
    /// when the identity source cannot answer.
    async fn authenticate(&self, credential: &Credential)
        -> Result<Principal, AuthenticationError>;
}
