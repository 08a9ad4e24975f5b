//! Aegis authority core — the orchestrator and its runtime pieces.
//!
//! This crate composes the lower layers into a working single-sign-on
//! authority:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  front-end (HTTP, out of scope)                              │
//! └──────────────────────────────────────────────────────────────┘
//!        │ login / logout / validate / grant_access
//!        ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Authority (C7)                          ◄── THIS CRATE      │
//! │    ├── pre-auth + response plugin chains                     │
//! │    ├── AuthenticationManager (aegis-auth, C1)                │
//! │    ├── ServicesManager (C5)                                  │
//! │    ├── SessionStorage (aegis-session trait, C4)              │
//! │    │     └── DefaultSessionStorage (in-memory reference)     │
//! │    ├── ResponseFactoryRegistry (C8)                          │
//! │    ├── ExpirationSweeper (C6 driver)                         │
//! │    └── AuthorityObserver hooks (audit seam)                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Error Discipline
//!
//! Authentication and token-validation failures are data, carried
//! inside the response objects, so relying parties always receive a
//! well-formed protocol answer. Only non-proxied `grant_access`
//! failures and store outages surface as [`AuthorityError`]. A missing
//! response factory is a wiring bug and panics at lookup.

pub mod authority;
pub mod builder;
mod cascade;
pub mod config;
pub mod error;
pub mod login;
pub mod logout;
pub mod observer;
pub mod plugin;
pub mod response;
pub mod services;
pub mod storage;
pub mod sweeper;

pub use authority::Authority;
pub use builder::AuthorityBuilder;
pub use config::AuthorityConfig;
pub use error::AuthorityError;
pub use login::{LoginRequest, LoginResponse};
pub use logout::LogoutResponse;
pub use observer::AuthorityObserver;
pub use plugin::{AuthenticationResponsePlugin, PreAuthenticationPlugin};
pub use response::{
    AccessOutcome, CasResponseFactory, ResponseFactoryRegistry, SamlResponseFactory,
    ServiceAccessResponse, ServiceAccessResponseFactory,
};
pub use services::{AllowAllServices, DefaultServicesManager, ServicePattern, ServicesManager};
pub use storage::DefaultSessionStorage;
pub use sweeper::ExpirationSweeper;

// Re-export the request types front-ends hand us.
pub use aegis_session::{Protocol, ServiceAccessRequest, TokenServiceAccessRequest, UsagePolicy};
