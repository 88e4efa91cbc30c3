//! In-memory store implementations.
//!
//! Used by the test suite and for running the service locally without
//! Redis/Postgres. Semantics match the production backends: atomic per-key
//! mutation, idempotent delete, and logical absence of revocation entries
//! past their expiry whether or not they have been physically purged.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::revocation::{RevocationEntry, RevocationStore};
use crate::session::{Session, SessionStore};
use crate::users::{User, UserStore};

/// Session store over a guarded hash map.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: Session) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .insert(session.access_token.clone(), session);
        Ok(())
    }

    async fn get(&self, access_token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().await.get(access_token).cloned())
    }

    async fn touch(&self, access_token: &str) -> Result<(), StoreError> {
        if let Some(session) = self.sessions.write().await.get_mut(access_token) {
            session.last_activity_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_by_token(&self, access_token: &str) -> Result<(), StoreError> {
        self.sessions.write().await.remove(access_token);
        Ok(())
    }
}

/// Revocation store over a guarded hash map.
///
/// Expired entries are logically absent immediately and physically pruned
/// opportunistically on insert.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    entries: RwLock<HashMap<String, RevocationEntry>>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);

        if expires_at <= now {
            return Ok(());
        }

        entries.insert(
            token.to_string(),
            RevocationEntry {
                token: token.to_string(),
                expires_at,
                created_at: now,
            },
        );
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, StoreError> {
        let now = Utc::now();
        Ok(self
            .entries
            .read()
            .await
            .get(token)
            .is_some_and(|entry| entry.expires_at > now))
    }
}

/// User lookup over a guarded hash map, seeded by tests.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Flips the active flag on an existing user.
    pub async fn set_active(&self, id: Uuid, is_active: bool) {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.is_active = is_active;
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }
}
