//! Revoked-token records and the revocation store interface.
//!
//! A [`RevocationEntry`] marks a token as rejected before its natural
//! expiry. Entries are created on logout or forced invalidation and never
//! mutated; once `expires_at` passes they are semantically absent whether
//! or not physical deletion has happened yet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A blacklisted token and the horizon past which blocking it is pointless.
///
/// `expires_at` is a conservative fixed horizon (one access-token TTL from
/// insertion) rather than the token's true remaining lifetime: the store
/// never decodes tokens to learn their real expiry, and over-retention by a
/// few minutes is harmless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationEntry {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Store of revoked tokens.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Blacklists a token until `expires_at`.
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// True iff the token is currently revoked. Must return `false` for
    /// purged and never-inserted tokens alike.
    async fn contains(&self, token: &str) -> Result<bool, StoreError>;
}
