use crate::auth::{PasswordHasher, TokenIssuer};
use crate::config::ServerConfig;
use crate::security::rate_limiter::RateLimiter;
use board_store::BoardStore;
use std::sync::Arc;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BoardStore>,
    pub tokens: TokenIssuer,
    pub passwords: PasswordHasher,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn BoardStore>) -> Self {
        let tokens = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
        let passwords = PasswordHasher::new(config.auth.password_rounds);
        let rate_limiter = Arc::new(RateLimiter::new(
            config.security.rate_limit_max_requests,
            config.security.rate_limit_window(),
        ));

        Self {
            store,
            tokens,
            passwords,
            rate_limiter,
            config: Arc::new(config),
        }
    }
}
