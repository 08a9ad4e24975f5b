//! The services registry (C5).
//!
//! A service may use the authority only if its URI matches a registered
//! pattern. The registry is consulted before anything else in
//! `grant_access`; an unmatched service is rejected outright.

use aegis_session::ServiceAccessRequest;
use parking_lot::RwLock;

/// Decides whether a target service is permitted to use the authority.
pub trait ServicesManager: Send + Sync {
    /// `true` if the request's service matches a registered service.
    fn matches_existing_service(&self, request: &ServiceAccessRequest) -> bool;
}

/// One registered service: an exact URI or a trailing-`*` prefix.
///
/// # Example
///
/// ```
/// use aegis_core::ServicePattern;
///
/// let exact = ServicePattern::new("https://app.example/login");
/// assert!(exact.matches("https://app.example/login"));
/// assert!(!exact.matches("https://app.example/login/extra"));
///
/// let prefix = ServicePattern::new("https://app.example/*");
/// assert!(prefix.matches("https://app.example/login"));
/// assert!(!prefix.matches("https://evil.example/"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePattern {
    pattern: String,
}

impl ServicePattern {
    /// Registers a pattern. A trailing `*` makes it a prefix match;
    /// anything else matches exactly.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Whether `service_id` is covered by this pattern.
    #[must_use]
    pub fn matches(&self, service_id: &str) -> bool {
        match self.pattern.strip_suffix('*') {
            Some(prefix) => service_id.starts_with(prefix),
            None => service_id == self.pattern,
        }
    }
}

/// In-memory pattern registry. Deny-all until patterns are registered.
#[derive(Debug, Default)]
pub struct DefaultServicesManager {
    patterns: RwLock<Vec<ServicePattern>>,
}

impl DefaultServicesManager {
    /// An empty (deny-all) registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with_pattern(self, pattern: impl Into<String>) -> Self {
        self.register(pattern);
        self
    }

    /// Registers a pattern at runtime.
    pub fn register(&self, pattern: impl Into<String>) {
        self.patterns.write().push(ServicePattern::new(pattern));
    }

    /// Number of registered patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    /// Whether the registry is empty (deny-all).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }
}

impl ServicesManager for DefaultServicesManager {
    fn matches_existing_service(&self, request: &ServiceAccessRequest) -> bool {
        let matched = self
            .patterns
            .read()
            .iter()
            .any(|p| p.matches(request.service_id()));
        if !matched {
            tracing::debug!(service = request.service_id(), "service not registered");
        }
        matched
    }
}

/// Admits every service. For test rigs and closed networks.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllServices;

impl ServicesManager for AllowAllServices {
    fn matches_existing_service(&self, _request: &ServiceAccessRequest) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_types::SessionId;

    fn request(service: &str) -> ServiceAccessRequest {
        ServiceAccessRequest::new(SessionId::new(), service)
    }

    #[test]
    fn empty_registry_denies_everything() {
        let manager = DefaultServicesManager::new();
        assert!(manager.is_empty());
        assert!(!manager.matches_existing_service(&request("https://app.example/login")));
    }

    #[test]
    fn exact_pattern_matches_exactly() {
        let manager = DefaultServicesManager::new().with_pattern("https://app.example/login");
        assert!(manager.matches_existing_service(&request("https://app.example/login")));
        assert!(!manager.matches_existing_service(&request("https://app.example/login2")));
    }

    #[test]
    fn prefix_pattern_matches_subpaths() {
        let manager = DefaultServicesManager::new().with_pattern("https://app.example/*");
        assert!(manager.matches_existing_service(&request("https://app.example/login")));
        assert!(manager.matches_existing_service(&request("https://app.example/deep/path")));
        assert!(!manager.matches_existing_service(&request("https://evil.example/")));
    }

    #[test]
    fn runtime_registration_takes_effect() {
        let manager = DefaultServicesManager::new();
        assert!(!manager.matches_existing_service(&request("https://late.example")));
        manager.register("https://late.example");
        assert!(manager.matches_existing_service(&request("https://late.example")));
    }

    #[test]
    fn allow_all_matches_anything() {
        assert!(AllowAllServices.matches_existing_service(&request("https://whatever.example")));
    }
}
