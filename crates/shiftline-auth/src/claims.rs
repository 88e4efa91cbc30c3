//! JWT claim structures for authentication tokens.
//!
//! - [`Claims`]: access token claims (subject, role, expiry)
//! - [`RefreshTokenClaims`]: refresh token claims for token rotation
//!
//! Claim sets are immutable once signed; decoding reconstructs them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// # Fields
///
/// - `sub`: user ID (subject)
/// - `role`: role name the user held at issuance
/// - `exp`: token expiration timestamp
/// - `iat`: token issued-at timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// Role name ("employee", "manager", "admin")
    pub role: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// JWT claims for refresh tokens.
///
/// Refresh tokens are long-lived and used solely to obtain a new
/// access/refresh pair without re-authenticating with a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// Role name at issuance
    pub role: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Unique token identifier (JWT ID) to ensure token uniqueness
    pub jti: String,
}
