//! Error type for store operations.
//!
//! Store failures are fatal to the request that hit them: they propagate to
//! the caller as a generic server failure and are never retried locally.

/// Error type for session, revocation, and user store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt store record: {0}")]
    InvalidRecord(String),
}
