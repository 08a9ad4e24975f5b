//! Canned handlers for tests.
//!
//! Kept in the crate (not behind `cfg(test)`) so downstream crates can
//! wire an authority without a real identity source.

use crate::{AuthenticationError, AuthenticationHandler, Credential};
use aegis_types::Principal;
use async_trait::async_trait;
use std::time::Duration;

/// Accepts exactly one username/password pair.
///
/// The resolved principal carries a `mail` attribute so attribute
/// release is visible in tests.
pub struct FixedPasswordHandler {
    username: String,
    password: String,
}

impl FixedPasswordHandler {
    /// Creates a handler accepting `username`/`password`.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl AuthenticationHandler for FixedPasswordHandler {
    fn name(&self) -> &str {
        "password-file"
    }

    fn supports(&self, credential: &Credential) -> bool {
        matches!(credential, Credential::UserPassword { .. })
    }

    async fn authenticate(
        &self,
        credential: &Credential,
    ) -> Result<Principal, AuthenticationError> {
        let Credential::UserPassword { username, password } = credential else {
            return Err(AuthenticationError::InvalidCredentials);
        };
        if *username == self.username && *password == self.password {
            Ok(Principal::new(username.clone())
                .with_attribute("mail", [format!("{username}@example.org")]))
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }
}

/// A small in-memory user directory.
///
/// Unlike [`FixedPasswordHandler`] this accepts several accounts, which
/// matters for forced re-authentication tests where a second principal
/// logs in over an existing session.
#[derive(Default)]
pub struct StaticDirectoryHandler {
    users: std::collections::HashMap<String, String>,
}

impl StaticDirectoryHandler {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account.
    #[must_use]
    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }
}

#[async_trait]
impl AuthenticationHandler for StaticDirectoryHandler {
    fn name(&self) -> &str {
        "static-directory"
    }

    fn supports(&self, credential: &Credential) -> bool {
        matches!(credential, Credential::UserPassword { .. })
    }

    async fn authenticate(
        &self,
        credential: &Credential,
    ) -> Result<Principal, AuthenticationError> {
        let Credential::UserPassword { username, password } = credential else {
            return Err(AuthenticationError::InvalidCredentials);
        };
        match self.users.get(username) {
            Some(expected) if expected == password => Ok(Principal::new(username.clone())),
            _ => Err(AuthenticationError::InvalidCredentials),
        }
    }
}

/// Supports every credential and rejects every credential.
pub struct RejectAllHandler;

#[async_trait]
impl AuthenticationHandler for RejectAllHandler {
    fn name(&self) -> &str {
        "reject-all"
    }

    fn supports(&self, _credential: &Credential) -> bool {
        true
    }

    async fn authenticate(
        &self,
        _credential: &Credential,
    ) -> Result<Principal, AuthenticationError> {
        Err(AuthenticationError::InvalidCredentials)
    }
}

/// Sleeps past any reasonable timeout, for exercising the bound.
pub struct SlowHandler {
    delay: Duration,
}

impl SlowHandler {
    /// Creates a handler that sleeps for `delay` before answering.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl AuthenticationHandler for SlowHandler {
    fn name(&self) -> &str {
        "slow"
    }

    fn supports(&self, _credential: &Credential) -> bool {
        true
    }

    async fn authenticate(
        &self,
        _credential: &Credential,
    ) -> Result<Principal, AuthenticationError> {
        tokio::time::sleep(self.delay).await;
        Ok(Principal::new("too-late"))
    }
}
