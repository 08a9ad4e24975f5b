//! Credential model and authentication pipeline for Aegis.
//!
//! This crate is the C1 layer of the authority: it turns presented
//! credentials into a [`Principal`](aegis_types::Principal) with
//! attributes, without ever touching session state.
//!
//! # Pipeline Shape
//!
//! ```text
//! AuthenticationRequest (credentials, long_term)
//!          │
//!          ▼
//! AuthenticationManager ── for each credential:
//!          │                 first handler with supports() == true
//!          │                 runs under the configured timeout
//!          ▼
//! AuthenticationResponse (principal?, authentications, failures)
//! ```
//!
//! Failures are data, not exceptions: the response carries a map of
//! handler name → [`ErrorKind`] and the orchestrator forwards it
//! in-band. Only the handler boundary itself uses `Result`.
//!
//! # Writing a Handler
//!
//! Implement [`AuthenticationHandler`] for your identity source and
//! register it with the manager. Handlers must be pure with respect to
//! sessions — the type system enforces this by giving them nothing but
//! the credential.

pub mod authentication;
pub mod credential;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod manager;
pub mod request;
pub mod response;
pub mod testing;

pub use authentication::Authentication;
pub use credential::Credential;
pub use endpoint::{EndpointValidator, UrlEndpointHandler};
pub use error::{AuthenticationError, ErrorKind};
pub use handler::AuthenticationHandler;
pub use manager::{AuthenticationManager, DEFAULT_HANDLER_TIMEOUT};
pub use request::AuthenticationRequest;
pub use response::AuthenticationResponse;

// Re-export the identity types handlers produce.
pub use aegis_types::{AttributeMap, Principal};
