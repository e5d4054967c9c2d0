//! Configuration management for the Parley server.
//!
//! This module handles loading, environment overrides, validation, and
//! conversion of the TOML configuration file.

use board_server::{AuthConfig, SecurityConfig, ServerConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_password_rounds() -> u32 {
    100_000
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener and client settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Rate limiting settings
    #[serde(default)]
    pub security: SecuritySettings,
    /// Token and password settings
    #[serde(default)]
    pub auth: AuthSettings,
    /// Persistence settings
    #[serde(default)]
    pub storage: StorageSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Network address to bind the server to (e.g., "127.0.0.1:3000")
    pub bind_address: String,
    /// Origin of the browser client
    pub frontend_url: String,
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySettings {
    pub enable_rate_limiting: bool,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max_requests: u32,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Secret used to sign access tokens
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub token_ttl_secs: u64,
    #[serde(default = "default_password_rounds")]
    pub password_rounds: u32,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("password_rounds", &self.password_rounds)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// JSON snapshot the board is loaded from at startup and written to at
    /// shutdown. Without one the board lives in memory only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<String>,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        let server = ServerConfig::default();
        Self {
            bind_address: server.bind_address.to_string(),
            frontend_url: server.frontend_url,
            max_body_bytes: server.max_body_bytes,
        }
    }
}

impl Default for SecuritySettings {
    fn default() -> Self {
        let security = SecurityConfig::default();
        Self {
            enable_rate_limiting: security.enable_rate_limiting,
            rate_limit_window_secs: security.rate_limit_window_secs,
            rate_limit_max_requests: security.rate_limit_max_requests,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        let auth = AuthConfig::default();
        Self {
            jwt_secret: auth.jwt_secret,
            token_ttl_secs: auth.token_ttl_secs,
            password_rounds: auth.password_rounds,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Parses a token lifetime such as `7d`, `12h`, `30m`, `45s` or plain seconds.
pub fn parse_duration_secs(raw: &str) -> Result<u64, String> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&raw[..i], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };
    let value: u64 = digits
        .parse()
        .map_err(|_| format!("Invalid duration: {raw:?}"))?;
    let scale = match unit {
        'd' => 24 * 60 * 60,
        'h' => 60 * 60,
        'm' => 60,
        's' => 1,
        _ => return Err(format!("Invalid duration unit in {raw:?}")),
    };
    value
        .checked_mul(scale)
        .ok_or_else(|| format!("Duration out of range: {raw:?}"))
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let mut default_config = AppConfig::default();
            default_config.storage.snapshot_path = Some("parley_data.json".to_string());
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), String> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Recognized variables: `JWT_SECRET`, `JWT_EXPIRE`, `PORT`, `FRONTEND_URL`,
    /// `RATE_LIMIT_WINDOW_MS` and `RATE_LIMIT_MAX_REQUESTS`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }

        if let Some(expire) = lookup("JWT_EXPIRE") {
            self.auth.token_ttl_secs = parse_duration_secs(&expire)?;
        }

        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| format!("Invalid PORT: {port}"))?;
            let mut address: SocketAddr = self
                .server
                .bind_address
                .parse()
                .map_err(|_| format!("Invalid bind address: {}", self.server.bind_address))?;
            address.set_port(port);
            self.server.bind_address = address.to_string();
        }

        if let Some(url) = lookup("FRONTEND_URL") {
            self.server.frontend_url = url;
        }

        if let Some(window) = lookup("RATE_LIMIT_WINDOW_MS") {
            let millis: u64 = window
                .trim()
                .parse()
                .map_err(|_| format!("Invalid RATE_LIMIT_WINDOW_MS: {window}"))?;
            self.security.rate_limit_window_secs = millis.div_ceil(1000);
        }

        if let Some(max) = lookup("RATE_LIMIT_MAX_REQUESTS") {
            self.security.rate_limit_max_requests = max
                .trim()
                .parse()
                .map_err(|_| format!("Invalid RATE_LIMIT_MAX_REQUESTS: {max}"))?;
        }

        Ok(())
    }

    /// The snapshot file, if persistence is configured.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.storage
            .snapshot_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Converts the application configuration to a board server configuration.
    pub fn to_server_config(&self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        Ok(ServerConfig {
            bind_address: self.server.bind_address.parse()?,
            frontend_url: self.server.frontend_url.clone(),
            max_body_bytes: self.server.max_body_bytes,
            security: SecurityConfig {
                enable_rate_limiting: self.security.enable_rate_limiting,
                rate_limit_window_secs: self.security.rate_limit_window_secs,
                rate_limit_max_requests: self.security.rate_limit_max_requests,
            },
            auth: AuthConfig {
                jwt_secret: self.auth.jwt_secret.clone(),
                token_ttl_secs: self.auth.token_ttl_secs,
                password_rounds: self.auth.password_rounds,
            },
        })
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            return Err(format!("Invalid bind address: {}", &self.server.bind_address));
        }

        if self.server.frontend_url.trim().is_empty() {
            return Err("Frontend URL cannot be empty".to_string());
        }

        if self.server.max_body_bytes == 0 {
            return Err("server.max_body_bytes must be greater than 0".to_string());
        }

        if self.security.rate_limit_window_secs == 0 {
            return Err("security.rate_limit_window_secs must be greater than 0".to_string());
        }

        if self.security.rate_limit_max_requests == 0 {
            return Err("security.rate_limit_max_requests must be greater than 0".to_string());
        }

        if self.auth.jwt_secret.is_empty() {
            return Err("auth.jwt_secret cannot be empty".to_string());
        }

        if self.auth.token_ttl_secs == 0 {
            return Err("auth.token_ttl_secs must be greater than 0".to_string());
        }

        if self.auth.password_rounds == 0 {
            return Err("auth.password_rounds must be greater than 0".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::{NamedTempFile, TempDir};
    use tokio::fs;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
        assert_eq!(config.server.frontend_url, "http://localhost:5173");
        assert_eq!(config.server.max_body_bytes, 10 * 1024 * 1024);
        assert!(config.security.enable_rate_limiting);
        assert_eq!(config.security.rate_limit_window_secs, 900);
        assert_eq!(config.security.rate_limit_max_requests, 100);
        assert_eq!(config.auth.token_ttl_secs, 7 * 24 * 60 * 60);
        assert!(config.snapshot_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
        assert_eq!(config.snapshot_path(), Some(PathBuf::from("parley_data.json")));
        assert!(path.exists());

        // The written file loads back to the same settings.
        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded.server.bind_address, config.server.bind_address);
        assert_eq!(reloaded.storage.snapshot_path, config.storage.snapshot_path);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[server]
bind_address = "0.0.0.0:8080"
frontend_url = "https://board.example.com"

[security]
enable_rate_limiting = false
rate_limit_window_secs = 60
rate_limit_max_requests = 5

[auth]
jwt_secret = "s3cret"
token_ttl_secs = 3600

[storage]
snapshot_path = "/var/lib/parley/board.json"

[logging]
level = "debug"
json_format = true
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.frontend_url, "https://board.example.com");
        assert_eq!(config.server.max_body_bytes, 10 * 1024 * 1024);
        assert!(!config.security.enable_rate_limiting);
        assert_eq!(config.security.rate_limit_max_requests, 5);
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.password_rounds, 100_000);
        assert_eq!(
            config.snapshot_path(),
            Some(PathBuf::from("/var/lib/parley/board.json"))
        );
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = toml::from_str("[logging]\nlevel = \"warn\"\njson_format = false\n").unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.server.bind_address, "127.0.0.1:3000");
        assert!(config.storage.snapshot_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env(&[
                ("JWT_SECRET", "from-env"),
                ("JWT_EXPIRE", "12h"),
                ("PORT", "5000"),
                ("FRONTEND_URL", "https://app.example.com"),
                ("RATE_LIMIT_WINDOW_MS", "60000"),
                ("RATE_LIMIT_MAX_REQUESTS", "20"),
            ]))
            .unwrap();

        assert_eq!(config.auth.jwt_secret, "from-env");
        assert_eq!(config.auth.token_ttl_secs, 12 * 60 * 60);
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert_eq!(config.server.frontend_url, "https://app.example.com");
        assert_eq!(config.security.rate_limit_window_secs, 60);
        assert_eq!(config.security.rate_limit_max_requests, 20);
    }

    #[test]
    fn test_invalid_env_overrides() {
        let mut config = AppConfig::default();
        assert!(config.apply_overrides(env(&[("PORT", "http")])).is_err());
        assert!(config.apply_overrides(env(&[("JWT_EXPIRE", "7w")])).is_err());
        assert!(config
            .apply_overrides(env(&[("RATE_LIMIT_MAX_REQUESTS", "-1")]))
            .is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_secs("7d"), Ok(604_800));
        assert_eq!(parse_duration_secs("2h"), Ok(7_200));
        assert_eq!(parse_duration_secs("30m"), Ok(1_800));
        assert_eq!(parse_duration_secs("45s"), Ok(45));
        assert_eq!(parse_duration_secs("90"), Ok(90));
        assert!(parse_duration_secs("").is_err());
        assert!(parse_duration_secs("d").is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.server.bind_address = "invalid".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.auth.jwt_secret.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.security.rate_limit_max_requests = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        for level in ["trace", "debug", "info", "warn", "error"] {
            let mut config = AppConfig::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_to_server_config_conversion() {
        let mut config = AppConfig::default();
        config.server.bind_address = "0.0.0.0:4000".to_string();
        config.auth.password_rounds = 1_000;

        let server = config.to_server_config().unwrap();
        assert_eq!(server.bind_address.port(), 4000);
        assert_eq!(server.auth.password_rounds, 1_000);
        assert_eq!(server.security.rate_limit_max_requests, 100);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = AppConfig::default();
        assert!(!format!("{config:?}").contains("change-me-in-production"));
    }
}
