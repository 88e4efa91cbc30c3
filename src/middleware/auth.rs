use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use shiftline_core::AppError;
use shiftline_store::User;

use crate::modules::auth::service::AuthService;
use crate::state::AppState;

/// Extractor that runs the full authentication pipeline and provides the
/// verified user plus the raw bearer token (logout needs the latter).
///
/// Extraction fails with 401 for anything wrong with the credential and 403
/// for a deactivated account; handlers using this extractor never see an
/// unauthenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl AuthUser {
    pub fn user_id(&self) -> uuid::Uuid {
        self.user.id
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    /// Check if the user holds a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.user.role == role
    }

    /// Check if the user holds any of the specified roles
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|r| self.has_role(r))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let user = AuthService::authenticate(state, token).await?;

        Ok(AuthUser {
            user,
            token: token.to_string(),
        })
    }
}
