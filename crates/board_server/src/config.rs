//! Server configuration types and defaults.
//!
//! This module contains the settings the board server needs at startup: where
//! to listen, which origin the browser client runs on, request limits, and the
//! security and authentication parameters.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Configuration structure for the board server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The socket address to bind the server to
    pub bind_address: SocketAddr,

    /// Origin of the browser client, allowed by CORS with credentials
    pub frontend_url: String,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,

    /// Security configuration settings
    pub security: SecurityConfig,

    /// Token and password settings
    pub auth: AuthConfig,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Enable rate limiting
    pub enable_rate_limiting: bool,

    /// Length of one rate limit window in seconds
    pub rate_limit_window_secs: u64,

    /// Requests allowed per IP within one window
    pub rate_limit_max_requests: u32,
}

/// Authentication configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    pub token_ttl_secs: u64,

    /// PBKDF2 iteration count for new password hashes
    pub password_rounds: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("password_rounds", &self.password_rounds)
            .finish()
    }
}

impl SecurityConfig {
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            frontend_url: "http://localhost:5173".to_string(),
            max_body_bytes: 10 * 1024 * 1024, // 10MB
            security: SecurityConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_rate_limiting: true,
            rate_limit_window_secs: 15 * 60,
            rate_limit_max_requests: 100,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_ttl_secs: 7 * 24 * 60 * 60, // 7 days
            password_rounds: 100_000,
        }
    }
}
