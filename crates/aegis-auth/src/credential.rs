//! Credential variants accepted by the authentication pipeline.

use serde::{Deserialize, Serialize};

/// A credential presented for authentication.
///
/// The set of mechanisms is closed at this layer; each handler declares
/// which variants it [`supports`](crate::AuthenticationHandler::supports).
///
/// | Variant | Presented by | Typical handler |
/// |---------|--------------|-----------------|
/// | `UserPassword` | Human at the login form | directory / password file |
/// | `Url` | A relying service during delegation | HTTPS endpoint check |
///
/// # Secrets in Debug Output
///
/// The `Debug` impl redacts the password so request logging cannot leak
/// it.
///
/// # Example
///
/// ```
/// use aegis_auth::Credential;
///
/// let cred = Credential::user_password("alice", "secret");
/// assert_eq!(cred.mechanism(), "user-password");
/// assert!(!format!("{cred:?}").contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credential {
    /// Interactive username/password pair.
    UserPassword {
        /// Login name as typed.
        username: String,
        /// Cleartext password; lives only for the duration of the call.
        password: String,
    },

    /// A callback URL identifying a relying service, used when a service
    /// authenticates itself to obtain delegated sessions.
    Url {
        /// The service's callback endpoint.
        url: String,
    },
}

impl Credential {
    /// Creates a username/password credential.
    #[must_use]
    pub fn user_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::UserPassword {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a service-URL credential.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    /// A short tag naming the mechanism, used in failure maps and logs.
    #[must_use]
    pub fn mechanism(&self) -> &'static str {
        match self {
            Self::UserPassword { .. } => "user-password",
            Self::Url { .. } => "url",
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserPassword { username, .. } => f
                .debug_struct("UserPassword")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Url { url } => f.debug_struct("Url").field("url", url).finish(),
        }
    }
}
