//! Redis-backed session and revocation stores.
//!
//! Sessions live in one Redis hash per access token so that `touch` is a
//! single-field `HSET` rather than a read-modify-write of the whole record.
//! Revocations are plain keys with a server-side TTL, so physical purge
//! coincides with logical absence.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::StoreError;
use crate::revocation::RevocationStore;
use crate::session::{Session, SessionStore};

/// Prefix for all keys to avoid collisions with other Redis users.
const KEY_PREFIX: &str = "shiftline";

fn session_key(access_token: &str) -> String {
    format!("{}:session:{}", KEY_PREFIX, access_token)
}

fn revocation_key(token: &str) -> String {
    format!("{}:revoked:{}", KEY_PREFIX, token)
}

/// Session store backed by Redis hashes.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    /// Physical eviction horizon for session keys. Logical validity is
    /// still enforced by the authentication pipeline; this only bounds how
    /// long dead records linger.
    ttl: Duration,
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl RedisSessionStore {
    /// Connects to Redis.
    ///
    /// `ttl` should comfortably exceed the access-token TTL plus the idle
    /// timeout so no live session is ever physically evicted.
    pub async fn new(redis_url: &str, ttl: Duration) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn, ttl })
    }
}

fn parse_session(key: &str, fields: HashMap<String, String>) -> Result<Session, StoreError> {
    let get = |name: &str| {
        fields
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::InvalidRecord(format!("{}: missing field {}", key, name)))
    };

    let user_id = Uuid::parse_str(&get("user_id")?)
        .map_err(|e| StoreError::InvalidRecord(format!("{}: bad user_id: {}", key, e)))?;
    let parse_ts = |name: &str| -> Result<DateTime<Utc>, StoreError> {
        get(name)?
            .parse::<DateTime<Utc>>()
            .map_err(|e| StoreError::InvalidRecord(format!("{}: bad {}: {}", key, name, e)))
    };

    Ok(Session {
        access_token: get("access_token")?,
        user_id,
        refresh_token: get("refresh_token")?,
        last_activity_at: parse_ts("last_activity_at")?,
        created_at: parse_ts("created_at")?,
    })
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    #[instrument(skip(self, session), fields(store.operation = "HSET"))]
    async fn create(&self, session: Session) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = session_key(&session.access_token);

        let fields = [
            ("access_token", session.access_token.clone()),
            ("user_id", session.user_id.to_string()),
            ("refresh_token", session.refresh_token.clone()),
            ("last_activity_at", session.last_activity_at.to_rfc3339()),
            ("created_at", session.created_at.to_rfc3339()),
        ];

        // One MULTI/EXEC round trip: the key must never exist without its
        // physical TTL.
        let _: () = redis::pipe()
            .atomic()
            .hset_multiple(&key, &fields)
            .ignore()
            .expire(&key, self.ttl.as_secs() as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;

        debug!(session.user_id = %session.user_id, "Session created");

        Ok(())
    }

    #[instrument(skip(self, access_token), fields(store.operation = "HGETALL"))]
    async fn get(&self, access_token: &str) -> Result<Option<Session>, StoreError> {
        let mut conn = self.conn.clone();
        let key = session_key(access_token);

        let fields: HashMap<String, String> = conn.hgetall(&key).await?;
        if fields.is_empty() {
            return Ok(None);
        }

        parse_session(&key, fields).map(Some)
    }

    #[instrument(skip(self, access_token), fields(store.operation = "HSET"))]
    async fn touch(&self, access_token: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        // Guarded server-side so a touch racing a delete cannot resurrect
        // the session as a stray partial hash.
        let script = Script::new(
            r#"
            if redis.call('EXISTS', KEYS[1]) == 1 then
                redis.call('HSET', KEYS[1], 'last_activity_at', ARGV[1])
            end
            return 0
            "#,
        );

        let _: () = script
            .key(session_key(access_token))
            .arg(Utc::now().to_rfc3339())
            .invoke_async(&mut conn)
            .await?;

        Ok(())
    }

    #[instrument(skip(self, access_token), fields(store.operation = "DEL"))]
    async fn delete_by_token(&self, access_token: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(session_key(access_token)).await?;

        debug!("Session deleted");

        Ok(())
    }
}

/// Revocation store backed by Redis keys with server-side TTL.
#[derive(Clone)]
pub struct RedisRevocationStore {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisRevocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRevocationStore").finish_non_exhaustive()
    }
}

impl RedisRevocationStore {
    pub async fn new(redis_url: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    #[instrument(skip(self, token), fields(store.operation = "SETEX"))]
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        let ttl = (expires_at - Utc::now()).num_seconds();
        if ttl <= 0 {
            // Already past the horizon; nothing left to block.
            return Ok(());
        }

        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(
            revocation_key(token),
            Utc::now().to_rfc3339(),
            ttl as u64,
        )
        .await?;

        debug!(ttl_secs = ttl, "Token revoked");

        Ok(())
    }

    #[instrument(skip(self, token), fields(store.operation = "EXISTS"))]
    async fn contains(&self, token: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let exists: bool = conn.exists(revocation_key(token)).await?;
        Ok(exists)
    }
}
