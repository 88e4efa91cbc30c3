//! Middleware and extractors for request processing.
//!
//! # Authentication Flow
//!
//! 1. Client sends a request with an `Authorization: Bearer <token>` header
//! 2. The [`auth::AuthUser`] extractor strips the bearer prefix and runs the
//!    authentication pipeline (decode, revocation check, session check,
//!    idle-window check, touch, user lookup, active check)
//! 3. The handler executes only if every check passes

pub mod auth;
