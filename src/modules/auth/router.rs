use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{get_me, login_user, logout, refresh_token};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
        .route("/me", get(get_me))
}
