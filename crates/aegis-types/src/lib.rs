//! Core value types for Aegis.
//!
//! This crate sits at the bottom of the Aegis dependency graph and holds
//! the types every other layer speaks: opaque identifiers and the
//! authenticated principal.
//!
//! # Crate Architecture
//!
//! ```text
//! aegis-types   (SessionId, AccessId, Principal)   ◄── THIS CRATE
//!     ↑
//! aegis-auth    (Credential, AuthenticationManager)
//!     ↑
//! aegis-session (Session, Access, SessionStorage trait)
//!     ↑
//! aegis-core    (Authority orchestrator, stores, factories)
//! ```
//!
//! # Design Principles
//!
//! - **Identity only** — `Principal` says who authenticated, never what
//!   they may do. Authorization lives in the services registry.
//! - **Ids are capabilities** — session and access ids are bearer
//!   secrets; they are random, prefixed in display form, and never
//!   derivable from one another.

pub mod id;
pub mod principal;

pub use id::{AccessId, ParseIdError, SessionId};
pub use principal::{AttributeMap, Principal};
