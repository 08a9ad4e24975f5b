//! Session and access-token state machine for Aegis.
//!
//! This crate is the C2/C3/C4/C6 layer: the tree of sessions and the
//! service-scoped tokens they mint, plus the storage and expiration
//! seams the orchestrator composes.
//!
//! # The Session Tree
//!
//! ```text
//! Session (login)
//!   ├── Access "https://app.example"    (BoundedUses(1), a service ticket)
//!   ├── Access "https://proxy.example"  (LogoutOnly, anchors delegation)
//!   │       └── Session (delegated)     parent = AccessRef, by id
//!   │             └── Access ...
//!   └── ...
//! ```
//!
//! Ownership is strictly downward: a session owns its accesses by
//! value, a delegated session is reachable only through the store, and
//! every upward or sideways relation is an id. Invalidation therefore
//! cascades by *returning* child ids for the caller to walk, rather
//! than chasing object references.
//!
//! # Concurrency Model
//!
//! The store hands out [`SessionHandle`]s (`Arc<RwLock<Session>>`).
//! The per-session lock serializes mutation of one session; the store's
//! own lock makes each index operation atomic. Neither lock is ever
//! held while acquiring the other in the reverse order.

pub mod access;
pub mod error;
pub mod expiration;
pub mod notify;
pub mod request;
pub mod session;
pub mod storage;

pub use access::{Access, UsagePolicy};
pub use error::{AccessValidationError, SessionError, StorageError};
pub use expiration::{
    AccessExpirationPolicy, AccessHardTtl, ExpirationPolicy, HardTtl, LongTermAware, NeverExpires,
    SlidingTtl,
};
pub use notify::{LogoutNotifier, NoopLogoutNotifier};
pub use request::{Protocol, ServiceAccessRequest, TokenServiceAccessRequest};
pub use session::{AccessRef, Session, SessionHandle};
pub use storage::SessionStorage;
