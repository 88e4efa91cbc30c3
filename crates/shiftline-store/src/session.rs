//! Active-session records and the session store interface.
//!
//! One [`Session`] exists per currently-valid access token. A session is
//! created on login or refresh, its `last_activity_at` slides forward on
//! every authenticated request, and it is deleted on logout, refresh
//! rotation, or idle-timeout eviction. The session store owns these records
//! exclusively; no other component mutates them.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Maximum inactivity gap tolerated before a session is invalidated.
///
/// Idle expiry is evaluated lazily at authentication time, not by a
/// background sweep: an idle session is only discovered (and then revoked
/// and deleted) the next time someone presents its token.
pub const SESSION_IDLE_TIMEOUT_SECS: i64 = 30 * 60;

/// Server-side record binding a live access token to a user and an
/// idle-activity clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The access token this session is keyed by.
    pub access_token: String,
    pub user_id: Uuid,
    /// The refresh token issued alongside the access token.
    pub refresh_token: String,
    /// Slides forward on every authenticated request.
    pub last_activity_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Builds a fresh session with both activity clocks set to now.
    pub fn new(user_id: Uuid, access_token: String, refresh_token: String) -> Self {
        let now = Utc::now();
        Self {
            access_token,
            user_id,
            refresh_token,
            last_activity_at: now,
            created_at: now,
        }
    }

    /// True iff the idle window has elapsed: `now - last_activity_at`
    /// exceeds [`SESSION_IDLE_TIMEOUT_SECS`].
    pub fn is_idle_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.last_activity_at > Duration::seconds(SESSION_IDLE_TIMEOUT_SECS)
    }
}

/// Store of active sessions, keyed by access token.
///
/// At most one live session exists per access-token string; the caller
/// guarantees key uniqueness through token uniqueness (tokens embed a
/// unique expiry and signature).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts unconditionally.
    async fn create(&self, session: Session) -> Result<(), StoreError>;

    async fn get(&self, access_token: &str) -> Result<Option<Session>, StoreError>;

    /// Sets `last_activity_at` to now. No-op if the session is absent.
    async fn touch(&self, access_token: &str) -> Result<(), StoreError>;

    /// Idempotent.
    async fn delete_by_token(&self, access_token: &str) -> Result<(), StoreError>;
}
