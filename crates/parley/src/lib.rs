//! # Parley - Main Entry Point
//!
//! A threaded discussion board: users sign up, read posts, and discuss them in
//! nested comment threads with per-reader upvotes. This crate handles CLI
//! parsing, configuration loading, logging and the application lifecycle
//! around the `board_server` API.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration, creating config.toml if needed
//! parley
//!
//! # Start a fresh board with demo users and a discussion
//! parley --seed --data demo.json
//!
//! # Override specific settings
//! parley --config production.toml --bind 0.0.0.0:3000 --log-level debug --json-logs
//! ```
//!
//! ## Configuration
//!
//! Settings come from a TOML file (default: `config.toml`), then the
//! environment (`JWT_SECRET`, `JWT_EXPIRE`, `PORT`, `FRONTEND_URL`,
//! `RATE_LIMIT_WINDOW_MS`, `RATE_LIMIT_MAX_REQUESTS`), then the command line.
//!
//! ## Signal Handling
//!
//! SIGINT and SIGTERM stop the listener, let in-flight requests finish and
//! save the board snapshot. A second signal exits immediately.

use tracing::error;

mod app;
mod cli;
mod config;
mod logging;
mod seed;
mod signals;

pub use app::{load_config, Application};
pub use cli::CliArgs;
pub use config::{
    parse_duration_secs, AppConfig, AuthSettings, LoggingSettings, SecuritySettings, ServerSettings,
    StorageSettings,
};
pub use seed::{seed_demo_data, seed_if_empty, DEMO_PASSWORD};

/// Runs Parley with the process arguments.
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Logging is configured from the file, so it cannot report failures here.
    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration from {}: {e}", args.config_path.display());
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(config, args.seed).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_store::BoardStore;
    use tempfile::TempDir;

    fn args_for(dir: &TempDir, extra: &[&str]) -> CliArgs {
        let config_path = dir.path().join("config.toml");
        let mut args = vec!["parley".to_string(), "--config".to_string(), config_path.display().to_string()];
        args.extend(extra.iter().map(|s| s.to_string()));
        CliArgs::try_parse_from(args).unwrap()
    }

    #[tokio::test]
    async fn test_cli_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("board.json");
        let args = args_for(
            &dir,
            &["--bind", "0.0.0.0:9000", "-l", "warn", "--data", &data.display().to_string()],
        );

        let config = load_config(&args).await.unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.snapshot_path(), Some(data));
        assert!(args.config_path.exists());
    }

    #[tokio::test]
    async fn test_invalid_override_is_rejected() {
        let dir = TempDir::new().unwrap();
        let args = args_for(&dir, &["--log-level", "loud"]);
        assert!(load_config(&args).await.is_err());
    }

    #[tokio::test]
    async fn test_seeded_board_survives_restart() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("board.json");
        let mut config = AppConfig::default();
        config.storage.snapshot_path = Some(data.display().to_string());
        config.auth.password_rounds = 1;

        let app = Application::new(config.clone(), true).await.unwrap();
        let seeded = app.store().stats().await;
        assert_eq!(seeded.users, 4);
        assert_eq!(seeded.posts, 1);
        app.persist().await.unwrap();
        assert!(data.exists());

        // Seeding is skipped once the snapshot has users.
        let restarted = Application::new(config, true).await.unwrap();
        assert_eq!(restarted.store().stats().await, seeded);
    }

    #[tokio::test]
    async fn test_unseeded_memory_board_is_empty() {
        let app = Application::new(AppConfig::default(), false).await.unwrap();
        assert!(app.store().is_empty());
        assert!(app.persist().await.is_ok());
    }
}
