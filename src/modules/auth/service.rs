use chrono::{Duration, Utc};
use tracing::{instrument, warn};
use uuid::Uuid;

use shiftline_auth::{
    create_access_token, create_refresh_token, decode_access_token, decode_refresh_token,
    verify_password,
};
use shiftline_core::AppError;
use shiftline_store::{Session, User};

use super::model::{LoginRequest, RefreshTokenRequest, TokenResponse};
use crate::state::AppState;

/// One answer for every authentication failure on the pipeline, so the
/// response never reveals which check failed.
const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

/// One answer for every login failure: wrong email, wrong password, and
/// deactivated account are indistinguishable to the caller.
const LOGIN_FAILED_MESSAGE: &str = "Incorrect email or password";

pub struct AuthService;

impl AuthService {
    /// Verifies credentials and mints a fresh access/refresh pair with a
    /// session keyed by the access token.
    #[instrument(skip_all)]
    pub async fn login(state: &AppState, dto: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = state.users.find_by_email(&dto.email).await?;

        let user = match user {
            Some(user) if verify_password(&dto.password, &user.password_hash) && user.is_active => {
                user
            }
            _ => return Err(AppError::unauthorized(LOGIN_FAILED_MESSAGE)),
        };

        let access_token = create_access_token(user.id, &user.role, &state.jwt_config)?;
        let refresh_token = create_refresh_token(user.id, &user.role, &state.jwt_config)?;

        state
            .sessions
            .create(Session::new(
                user.id,
                access_token.clone(),
                refresh_token.clone(),
            ))
            .await?;

        Ok(TokenResponse::bearer(access_token, refresh_token))
    }

    /// Resolves a bearer token to its user, or fails.
    ///
    /// The checks run in a fixed order, each short-circuiting: decode,
    /// revocation list, session presence, idle window, then user lookup and
    /// active flag. Revocation comes before the session lookup so a
    /// logged-out token fails fast even while its session record still
    /// exists. A decodable token without a session is invalid: the session
    /// record, not the token's own expiry, is the source of truth for
    /// liveness.
    #[instrument(skip_all)]
    pub async fn authenticate(state: &AppState, token: &str) -> Result<User, AppError> {
        let claims = decode_access_token(token, &state.jwt_config)
            .map_err(|_| AppError::unauthorized(CREDENTIALS_MESSAGE))?;

        if state.revocations.contains(token).await? {
            return Err(AppError::unauthorized(CREDENTIALS_MESSAGE));
        }

        let Some(session) = state.sessions.get(token).await? else {
            return Err(AppError::unauthorized(CREDENTIALS_MESSAGE));
        };

        if session.is_idle_expired(Utc::now()) {
            Self::evict_idle_session(state, token).await;
            return Err(AppError::unauthorized(CREDENTIALS_MESSAGE));
        }

        state.sessions.touch(token).await?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(CREDENTIALS_MESSAGE))?;

        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized(CREDENTIALS_MESSAGE))?;

        if !user.is_active {
            return Err(AppError::forbidden("Inactive user"));
        }

        Ok(user)
    }

    /// Revokes and deletes an idle-expired session. Failures of either
    /// write are logged; the caller still returns its authentication
    /// failure.
    async fn evict_idle_session(state: &AppState, token: &str) {
        let horizon = Utc::now() + Duration::seconds(state.jwt_config.access_token_expiry);

        if let Err(e) = state.revocations.add(token, horizon).await {
            warn!(error = %e, "Failed to revoke idle-expired token");
        }
        if let Err(e) = state.sessions.delete_by_token(token).await {
            warn!(error = %e, "Failed to delete idle-expired session");
        }
    }

    /// Rotates a refresh token into a new access/refresh pair.
    ///
    /// The old access token stops authenticating the moment its session is
    /// deleted, even though it may still decode. Refresh token validity is
    /// independent of access-token idle expiry.
    #[instrument(skip_all)]
    pub async fn refresh(
        state: &AppState,
        dto: RefreshTokenRequest,
    ) -> Result<TokenResponse, AppError> {
        let claims = decode_refresh_token(&dto.refresh_token, &state.jwt_config)
            .map_err(|_| AppError::unauthorized(CREDENTIALS_MESSAGE))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(CREDENTIALS_MESSAGE))?;

        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized(CREDENTIALS_MESSAGE))?;

        if !user.is_active {
            return Err(AppError::unauthorized(CREDENTIALS_MESSAGE));
        }

        let access_token = create_access_token(user.id, &user.role, &state.jwt_config)?;
        let refresh_token = create_refresh_token(user.id, &user.role, &state.jwt_config)?;

        match &dto.access_token {
            Some(old_access_token) => {
                state.sessions.delete_by_token(old_access_token).await?;
            }
            None => {
                // Client lost the access token it was issued with; the old
                // session expires on its own, but record the anomaly.
                warn!(user_id = %user.id, "Refresh without prior access token, skipping session cleanup");
            }
        }

        state
            .sessions
            .create(Session::new(
                user.id,
                access_token.clone(),
                refresh_token.clone(),
            ))
            .await?;

        Ok(TokenResponse::bearer(access_token, refresh_token))
    }

    /// Blacklists an access token for one access-token TTL from now — a
    /// conservative horizon that outlives any window in which the token
    /// could still be cryptographically valid. The session record is left
    /// to the pipeline's revocation check, which runs before the session
    /// lookup.
    #[instrument(skip_all)]
    pub async fn logout(state: &AppState, token: &str) -> Result<(), AppError> {
        let expires_at = Utc::now() + Duration::seconds(state.jwt_config.access_token_expiry);
        state.revocations.add(token, expires_at).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use shiftline_auth::hash_password;
    use shiftline_config::JwtConfig;
    use shiftline_store::{
        InMemoryRevocationStore, InMemorySessionStore, InMemoryUserStore,
        SESSION_IDLE_TIMEOUT_SECS,
    };
    use std::sync::Arc;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 1800,
            refresh_token_expiry: 604800,
        }
    }

    fn test_state() -> AppState {
        AppState {
            users: Arc::new(InMemoryUserStore::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
            revocations: Arc::new(InMemoryRevocationStore::new()),
            jwt_config: test_jwt_config(),
        }
    }

    /// Builds a state plus a seeded user, keeping a concrete handle on the
    /// user store so tests can flip the active flag.
    async fn state_with_user(
        email: &str,
        password: &str,
        is_active: bool,
    ) -> (AppState, Arc<InMemoryUserStore>, User) {
        let users = Arc::new(InMemoryUserStore::new());
        let state = AppState {
            users: users.clone(),
            sessions: Arc::new(InMemorySessionStore::new()),
            revocations: Arc::new(InMemoryRevocationStore::new()),
            jwt_config: test_jwt_config(),
        };
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: "employee".to_string(),
            is_active,
        };
        users.insert(user.clone()).await;
        (state, users, user)
    }

    fn login_dto(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_then_authenticate_returns_user() {
        let (state, _, user) = state_with_user("a@x.com", "Secret123!", true).await;

        let tokens = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();
        assert_eq!(tokens.token_type, "bearer");

        let authed = AuthService::authenticate(&state, &tokens.access_token)
            .await
            .unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_generic_and_creates_no_session() {
        let (state, _, _) = state_with_user("a@x.com", "Secret123!", true).await;

        let err = AuthService::login(&state, login_dto("a@x.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), LOGIN_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_login_unknown_email_matches_wrong_password_response() {
        let (state, _, _) = state_with_user("a@x.com", "Secret123!", true).await;

        let wrong_password = AuthService::login(&state, login_dto("a@x.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = AuthService::login(&state, login_dto("b@x.com", "Secret123!"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.status, unknown_email.status);
        assert_eq!(
            wrong_password.error.to_string(),
            unknown_email.error.to_string()
        );
    }

    #[tokio::test]
    async fn test_login_deactivated_user_matches_wrong_password_response() {
        let (state, _, _) = state_with_user("a@x.com", "Secret123!", false).await;

        let err = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap_err();

        // No distinguishing signal for a deactivated account.
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), LOGIN_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_authenticate_garbage_token() {
        let state = test_state();
        let err = AuthService::authenticate(&state, "not-a-token")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authenticate_decodable_but_sessionless_token_fails() {
        let (state, _, user) = state_with_user("a@x.com", "Secret123!", true).await;

        // Valid signature, no session record: must not authenticate.
        let token = create_access_token(user.id, &user.role, &state.jwt_config).unwrap();
        let err = AuthService::authenticate(&state, &token).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_then_authenticate_fails() {
        let (state, _, _) = state_with_user("a@x.com", "Secret123!", true).await;

        let tokens = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();
        AuthService::logout(&state, &tokens.access_token)
            .await
            .unwrap();

        let err = AuthService::authenticate(&state, &tokens.access_token)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        // The session record still exists; revocation alone must reject it.
        assert!(
            state
                .sessions
                .get(&tokens.access_token)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_refresh_rotates_pair_and_invalidates_old_access_token() {
        let (state, _, user) = state_with_user("a@x.com", "Secret123!", true).await;

        let old = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();

        let new = AuthService::refresh(
            &state,
            RefreshTokenRequest {
                refresh_token: old.refresh_token.clone(),
                access_token: Some(old.access_token.clone()),
            },
        )
        .await
        .unwrap();

        assert_ne!(new.access_token, old.access_token);
        assert_ne!(new.refresh_token, old.refresh_token);

        let err = AuthService::authenticate(&state, &old.access_token)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let authed = AuthService::authenticate(&state, &new.access_token)
            .await
            .unwrap();
        assert_eq!(authed.id, user.id);
    }

    #[tokio::test]
    async fn test_refresh_without_old_access_token_still_succeeds() {
        let (state, _, _) = state_with_user("a@x.com", "Secret123!", true).await;

        let old = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();

        let new = AuthService::refresh(
            &state,
            RefreshTokenRequest {
                refresh_token: old.refresh_token,
                access_token: None,
            },
        )
        .await
        .unwrap();

        assert!(
            AuthService::authenticate(&state, &new.access_token)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_refresh_with_garbage_refresh_token_fails() {
        let state = test_state();
        let err = AuthService::refresh(
            &state,
            RefreshTokenRequest {
                refresh_token: "garbage".to_string(),
                access_token: None,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_deactivated_user_fails_generically() {
        let (state, users, user) = state_with_user("a@x.com", "Secret123!", true).await;

        let tokens = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();
        users.set_active(user.id, false).await;

        let err = AuthService::refresh(
            &state,
            RefreshTokenRequest {
                refresh_token: tokens.refresh_token,
                access_token: Some(tokens.access_token),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_idle_expired_session_is_evicted_and_stays_dead() {
        let (state, _, _) = state_with_user("a@x.com", "Secret123!", true).await;

        let tokens = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();

        // Simulate 31 minutes of silence by backdating the activity clock.
        let mut session = state
            .sessions
            .get(&tokens.access_token)
            .await
            .unwrap()
            .unwrap();
        session.last_activity_at = Utc::now() - Duration::seconds(SESSION_IDLE_TIMEOUT_SECS + 60);
        state.sessions.create(session).await.unwrap();

        let err = AuthService::authenticate(&state, &tokens.access_token)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        // Eviction happened exactly once: session gone, token revoked.
        assert!(
            state
                .sessions
                .get(&tokens.access_token)
                .await
                .unwrap()
                .is_none()
        );
        assert!(state.revocations.contains(&tokens.access_token).await.unwrap());

        // A second presentation fails identically, now via the blacklist.
        let err = AuthService::authenticate(&state, &tokens.access_token)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.error.to_string(), CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn test_refresh_survives_access_token_idle_expiry() {
        let (state, _, _) = state_with_user("a@x.com", "Secret123!", true).await;

        let tokens = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();

        let mut session = state
            .sessions
            .get(&tokens.access_token)
            .await
            .unwrap()
            .unwrap();
        session.last_activity_at = Utc::now() - Duration::seconds(SESSION_IDLE_TIMEOUT_SECS + 60);
        state.sessions.create(session).await.unwrap();

        // Idle-expire the access token.
        assert!(
            AuthService::authenticate(&state, &tokens.access_token)
                .await
                .is_err()
        );

        // The refresh token is still within its own TTL and keeps working.
        let new = AuthService::refresh(
            &state,
            RefreshTokenRequest {
                refresh_token: tokens.refresh_token,
                access_token: Some(tokens.access_token),
            },
        )
        .await
        .unwrap();

        assert!(
            AuthService::authenticate(&state, &new.access_token)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_authenticate_touch_slides_idle_window() {
        let (state, _, _) = state_with_user("a@x.com", "Secret123!", true).await;

        let tokens = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();

        // Nearly idle, then one request arrives.
        let mut session = state
            .sessions
            .get(&tokens.access_token)
            .await
            .unwrap()
            .unwrap();
        session.last_activity_at = Utc::now() - Duration::seconds(SESSION_IDLE_TIMEOUT_SECS - 60);
        state.sessions.create(session).await.unwrap();

        AuthService::authenticate(&state, &tokens.access_token)
            .await
            .unwrap();

        let refreshed = state
            .sessions
            .get(&tokens.access_token)
            .await
            .unwrap()
            .unwrap();
        assert!(Utc::now() - refreshed.last_activity_at < Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_authenticate_deactivated_user_is_forbidden() {
        let (state, users, user) = state_with_user("a@x.com", "Secret123!", true).await;

        let tokens = AuthService::login(&state, login_dto("a@x.com", "Secret123!"))
            .await
            .unwrap();
        users.set_active(user.id, false).await;

        // Valid credential, disabled account: 403, distinct from 401.
        let err = AuthService::authenticate(&state, &tokens.access_token)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
