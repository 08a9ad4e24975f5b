//! Audit observer hooks.
//!
//! The authority invokes observers at the boundary of each of the four
//! operations. Observers replace the audit/profiling annotations of
//! classic CAS deployments with an explicit seam; default bodies are
//! no-ops so implementations override only what they record.

use crate::{LoginResponse, LogoutResponse, ServiceAccessResponse};
use aegis_types::AccessId;

/// Receives one callback per completed authority operation.
///
/// Observers run synchronously on the request path after the operation
/// committed; keep them cheap and never let them touch session state.
pub trait AuthorityObserver: Send + Sync {
    /// A login attempt finished (granted or denied).
    fn on_login(&self, _response: &LoginResponse) {}

    /// A logout finished (possibly destroying nothing).
    fn on_logout(&self, _response: &LogoutResponse) {}

    /// A grant request finished.
    fn on_grant(&self, _service_id: &str, _response: &ServiceAccessResponse) {}

    /// A token validation finished.
    fn on_validate(&self, _token: &AccessId, _response: &ServiceAccessResponse) {}
}
