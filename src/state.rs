use std::sync::Arc;
use std::time::Duration;

use shiftline_config::JwtConfig;
use shiftline_store::{
    PgUserStore, RedisRevocationStore, RedisSessionStore, RevocationStore,
    SESSION_IDLE_TIMEOUT_SECS, SessionStore, UserStore, init_db_pool,
};

/// Shared application state: explicitly constructed store handles plus the
/// token configuration, cloned into every request handler. No ambient
/// globals.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub revocations: Arc<dyn RevocationStore>,
    pub jwt_config: JwtConfig,
}

pub async fn init_app_state() -> AppState {
    let jwt_config = JwtConfig::from_env();
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    // Physical eviction horizon for session keys: a session can never be
    // logically live past its token's lifetime plus the idle window.
    let session_ttl =
        Duration::from_secs((jwt_config.access_token_expiry + SESSION_IDLE_TIMEOUT_SECS) as u64);

    let sessions = RedisSessionStore::new(&redis_url, session_ttl)
        .await
        .expect("Failed to connect to Redis");
    let revocations = RedisRevocationStore::new(&redis_url)
        .await
        .expect("Failed to connect to Redis");
    let users = PgUserStore::new(init_db_pool().await);

    AppState {
        users: Arc::new(users),
        sessions: Arc::new(sessions),
        revocations: Arc::new(revocations),
        jwt_config,
    }
}
