//! JWT creation and verification.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret from
//! [`JwtConfig`]. Decoding is side-effect free and reports failures through
//! [`TokenError`]; callers in the authentication pipeline collapse every
//! variant into the same generic authentication failure so the client never
//! learns which check failed.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use shiftline_config::JwtConfig;
use shiftline_core::AppError;

use crate::claims::{Claims, RefreshTokenClaims};

/// Reasons a token fails to decode.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature invalid or token structurally broken.
    #[error("token signature is invalid or malformed")]
    MalformedSignature,

    /// Token past its `exp` claim.
    #[error("token has expired")]
    Expired,

    /// Claim set lacks a usable subject.
    #[error("token is missing a subject claim")]
    MissingSubject,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            // Claim-shape mismatches surface as JSON errors from serde.
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::MissingSubject,
            _ => TokenError::MalformedSignature,
        }
    }
}

/// Creates a short-lived access token for the given user.
///
/// Sets `exp = now + access_token_expiry` and signs with the process-wide
/// secret.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Creates a long-lived refresh token for the given user.
///
/// The embedded `jti` makes every refresh token unique even when two are
/// minted within the same second.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_refresh_token(
    user_id: Uuid,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.refresh_token_expiry as usize;

    let claims = RefreshTokenClaims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create refresh token: {}", e)))
}

/// Verifies an access token's signature and expiry and returns its claims.
///
/// # Errors
///
/// - [`TokenError::Expired`] if `exp` has passed
/// - [`TokenError::MissingSubject`] if the claim set has no usable subject
/// - [`TokenError::MalformedSignature`] for any other failure
pub fn decode_access_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)?;

    if claims.sub.is_empty() {
        return Err(TokenError::MissingSubject);
    }

    Ok(claims)
}

/// Verifies a refresh token and returns its claims.
///
/// Same failure taxonomy as [`decode_access_token`].
pub fn decode_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, TokenError> {
    let claims = decode::<RefreshTokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)?;

    if claims.sub.is_empty() {
        return Err(TokenError::MissingSubject);
    }

    Ok(claims)
}
