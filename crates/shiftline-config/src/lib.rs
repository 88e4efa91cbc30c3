//! Configuration for the Shiftline API.
//!
//! Configuration is loaded once at startup from environment variables and
//! passed explicitly to the components that need it; there is no ambient
//! global configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret for access and refresh tokens
//! - `JWT_ACCESS_EXPIRY`: access token lifetime in seconds (default 1800)
//! - `JWT_REFRESH_EXPIRY`: refresh token lifetime in seconds (default 604800)

pub mod jwt;

pub use jwt::JwtConfig;
