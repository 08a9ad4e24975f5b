//! Single-logout notification seam.

use aegis_types::AccessId;

/// Tells a relying party to destroy the local session it built from a
/// validated token.
///
/// Called during invalidation cascades, once per access. The call is
/// **best-effort**: the core never retries, and a `false` return simply
/// leaves the access marked as still logged in. Implementations own any
/// sockets involved and must bound how long they wait — a cascade holds
/// session locks while notifying.
pub trait LogoutNotifier: Send + Sync {
    /// Attempts the back-channel logout call for one access.
    ///
    /// Returns `true` if the relying party confirmed the local session
    /// was destroyed.
    fn notify(&self, resource_id: &str, access_id: &AccessId) -> bool;
}

/// A notifier that never reaches out.
///
/// Returns `false` — nothing was destroyed — so logout responses list
/// every access as still logged in. This is the correct default for
/// deployments without back-channel single logout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogoutNotifier;

impl LogoutNotifier for NoopLogoutNotifier {
    fn notify(&self, _resource_id: &str, _access_id: &AccessId) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_reports_nothing_destroyed() {
        let n = NoopLogoutNotifier;
        assert!(!n.notify("https://app.example", &AccessId::new()));
    }
}
