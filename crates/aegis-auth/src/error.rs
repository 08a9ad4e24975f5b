//! Authentication failure reporting.
//!
//! Failures never cross the orchestrator boundary as `Err`: they travel
//! in-band inside [`AuthenticationResponse::failures`](crate::AuthenticationResponse),
//! keyed by handler name, so a login attempt with three credentials can
//! report which mechanisms failed and why while the others succeed.

use thiserror::Error;

/// Why a single handler rejected a single credential.
///
/// This is the in-band taxonomy; the coarse kind travels in the
/// response, the full error stays at the handler boundary for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The credential was understood and rejected.
    InvalidCredentials,
    /// No configured handler supports this credential variant.
    Unsupported,
    /// The handler did not answer within the configured bound.
    Timeout,
    /// The backing identity source could not be reached.
    Unavailable,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::InvalidCredentials => "invalid-credentials",
            Self::Unsupported => "unsupported",
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
        };
        f.write_str(tag)
    }
}

/// Error returned by an [`AuthenticationHandler`](crate::AuthenticationHandler).
#[derive(Debug, Clone, Error)]
pub enum AuthenticationError {
    /// The credential was examined and rejected.
    #[error("credentials rejected")]
    InvalidCredentials,

    /// The identity source is unreachable or misbehaving.
    #[error("identity source unavailable: {reason}")]
    Unavailable {
        /// Handler-supplied detail, for logs only.
        reason: String,
    },
}

impl AuthenticationError {
    /// Maps the full error onto the in-band [`ErrorKind`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
        }
    }
}
