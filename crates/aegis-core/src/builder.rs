//! Authority assembly.

use crate::{
    Authority, AuthorityConfig, AuthorityObserver, AuthenticationResponsePlugin,
    DefaultServicesManager, DefaultSessionStorage, PreAuthenticationPlugin,
    ResponseFactoryRegistry, ServiceAccessResponseFactory, ServicesManager,
};
use aegis_auth::{AuthenticationHandler, AuthenticationManager};
use aegis_session::{LogoutNotifier, NoopLogoutNotifier, SessionStorage};
use std::sync::Arc;

/// Builds an [`Authority`] from its collaborators.
///
/// Everything has a working default except credential handlers — an
/// authority that cannot authenticate anyone is a wiring bug worth
/// keeping loud, so at least one handler (or a pre-auth plugin that
/// answers every login) must be supplied by the deployment.
///
/// # Example
///
/// ```
/// use aegis_core::Authority;
/// use aegis_auth::testing::FixedPasswordHandler;
/// use std::sync::Arc;
///
/// let authority = Authority::builder()
///     .with_handler(Arc::new(FixedPasswordHandler::new("alice", "secret")))
///     .allow_service("https://app.example/*")
///     .build();
/// let _ = authority.storage();
/// ```
#[derive(Default)]
pub struct AuthorityBuilder {
    config: AuthorityConfig,
    handlers: Vec<Arc<dyn AuthenticationHandler>>,
    storage: Option<Arc<dyn SessionStorage>>,
    services: Option<Arc<dyn ServicesManager>>,
    service_patterns: Vec<String>,
    factories: Vec<Arc<dyn ServiceAccessResponseFactory>>,
    pre_auth_plugins: Vec<Arc<dyn PreAuthenticationPlugin>>,
    response_plugins: Vec<Arc<dyn AuthenticationResponsePlugin>>,
    observers: Vec<Arc<dyn AuthorityObserver>>,
    notifier: Option<Arc<dyn LogoutNotifier>>,
}

impl AuthorityBuilder {
    /// An empty builder with default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AuthorityConfig) -> Self {
        self.config = config;
        self
    }

    /// Appends a credential handler (consulted in registration order).
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn AuthenticationHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Supplies a session store. Default: [`DefaultSessionStorage`].
    #[must_use]
    pub fn with_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Supplies a services manager, replacing pattern registration.
    #[must_use]
    pub fn with_services(mut self, services: Arc<dyn ServicesManager>) -> Self {
        self.services = Some(services);
        self
    }

    /// Registers a service pattern with the default services manager.
    #[must_use]
    pub fn allow_service(mut self, pattern: impl Into<String>) -> Self {
        self.service_patterns.push(pattern.into());
        self
    }

    /// Appends a response factory (consulted in registration order).
    /// Default when none are given: the stock CAS + SAML registry.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn ServiceAccessResponseFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Appends a pre-authentication plugin.
    #[must_use]
    pub fn with_pre_auth_plugin(mut self, plugin: Arc<dyn PreAuthenticationPlugin>) -> Self {
        self.pre_auth_plugins.push(plugin);
        self
    }

    /// Appends an authentication-response plugin.
    #[must_use]
    pub fn with_response_plugin(mut self, plugin: Arc<dyn AuthenticationResponsePlugin>) -> Self {
        self.response_plugins.push(plugin);
        self
    }

    /// Appends an audit observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn AuthorityObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Supplies the single-logout notifier. Default: noop.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn LogoutNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Assembles the authority.
    #[must_use]
    pub fn build(self) -> Authority {
        let services = self.services.unwrap_or_else(|| {
            let manager = DefaultServicesManager::new();
            for pattern in &self.service_patterns {
                manager.register(pattern.clone());
            }
            Arc::new(manager)
        });

        let factories = if self.factories.is_empty() {
            ResponseFactoryRegistry::stock()
        } else {
            ResponseFactoryRegistry::new(self.factories)
        };

        Authority {
            authentication: AuthenticationManager::new(self.handlers)
                .with_handler_timeout(self.config.handler_timeout()),
            storage: self
                .storage
                .unwrap_or_else(|| Arc::new(DefaultSessionStorage::new())),
            services,
            factories,
            pre_auth_plugins: self.pre_auth_plugins,
            response_plugins: self.response_plugins,
            observers: self.observers,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(NoopLogoutNotifier)),
            session_policy: Arc::from(self.config.session_policy()),
            access_policy: Arc::from(self.config.access_policy()),
            sweep_interval: self.config.sweep_interval(),
        }
    }
}
