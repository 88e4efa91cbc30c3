//! # Shiftline Auth
//!
//! Credential primitives for the Shiftline API: JWT claims, the token
//! codec, and password hashing.
//!
//! This crate provides:
//!
//! - [`claims`]: claim structures for access and refresh tokens
//! - [`jwt`]: token creation and verification, with a typed decode error
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Token Types
//!
//! - **Access token** ([`Claims`]): short-lived bearer credential
//!   authenticating individual requests
//! - **Refresh token** ([`RefreshTokenClaims`]): long-lived credential used
//!   solely to mint a new access/refresh pair
//!
//! Both are HS256 JWTs signed with a single process-wide secret from
//! [`shiftline_config::JwtConfig`].
//!
//! # Example
//!
//! ```ignore
//! use shiftline_auth::{create_access_token, decode_access_token};
//! use shiftline_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "employee", &config)?;
//! let claims = decode_access_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;
pub mod password;

// Re-export commonly used types at crate root
pub use claims::{Claims, RefreshTokenClaims};
pub use jwt::{
    TokenError, create_access_token, create_refresh_token, decode_access_token,
    decode_refresh_token,
};
pub use password::{hash_password, verify_password};
