//! User records and the read-only user lookup interface.
//!
//! The authentication core never mutates users; it only reads the password
//! hash, role, and active flag. User CRUD lives with the surrounding
//! application, outside this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::StoreError;

/// A user as the authentication core sees it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Salted bcrypt hash; never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role name ("employee", "manager", "admin")
    pub role: String,
    /// Deactivated accounts keep their credentials but cannot authenticate.
    pub is_active: bool,
}

/// Read-only user lookup.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
