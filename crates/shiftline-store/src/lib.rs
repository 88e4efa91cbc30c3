//! # Shiftline Store
//!
//! Persistence layer for the Shiftline authentication core.
//!
//! Three narrow store interfaces back the token lifecycle:
//!
//! - [`session::SessionStore`]: one active-session record per issued access
//!   token, with lookup, touch, and delete
//! - [`revocation::RevocationStore`]: blacklisted tokens with their natural
//!   expiry, for revoke-on-logout and forced invalidation
//! - [`users::UserStore`]: read-only user lookup by id or email
//!
//! Production backends are Redis (sessions, revocations) and PostgreSQL
//! (users); [`memory`] provides in-memory implementations for tests and
//! local development. Stores are constructed explicitly at startup and
//! shared as `Arc<dyn Trait>`; every mutation is an atomic per-key
//! operation, safe under concurrent requests for the same token.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod revocation;
pub mod session;
pub mod users;

// Re-export commonly used types at crate root
pub use error::StoreError;
pub use memory::{InMemoryRevocationStore, InMemorySessionStore, InMemoryUserStore};
pub use postgres::{PgUserStore, init_db_pool};
pub use self::redis::{RedisRevocationStore, RedisSessionStore};
pub use revocation::{RevocationEntry, RevocationStore};
pub use session::{SESSION_IDLE_TIMEOUT_SECS, Session, SessionStore};
pub use users::{User, UserStore};
