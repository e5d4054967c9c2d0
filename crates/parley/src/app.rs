//! Main application logic and lifecycle management.
//!
//! This module contains the `Application` struct that loads the board,
//! serves it until a shutdown signal arrives and saves it again on the way out.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    logging::display_banner,
    seed::seed_if_empty,
    signals::{exit_on_second_signal, shutdown_on_signal},
};
use board_server::auth::PasswordHasher;
use board_server::{BoardServer, ShutdownState};
use board_store::{BoardStore, MemoryStore, StoreError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::{interval, timeout, Duration};
use tracing::{error, info, warn};

/// How long in-flight requests get to finish after a shutdown signal.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Loads the configuration file and applies environment and CLI overrides.
///
/// Precedence, lowest first: defaults, the file, the environment, the
/// command line.
pub async fn load_config(args: &CliArgs) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut config = AppConfig::load_from_file(&args.config_path).await?;

    config
        .apply_env_overrides()
        .map_err(|e| format!("Invalid environment override: {e}"))?;

    if let Some(bind_address) = &args.bind_address {
        config.server.bind_address = bind_address.clone();
    }

    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }

    if args.json_logs {
        config.logging.json_format = true;
    }

    if let Some(data_path) = &args.data_path {
        config.storage.snapshot_path = Some(data_path.to_string_lossy().to_string());
    }

    config
        .validate()
        .map_err(|e| format!("Configuration validation failed: {e}"))?;
    Ok(config)
}

/// The running board: configuration, store and API server.
pub struct Application {
    /// Loaded application configuration
    config: AppConfig,
    /// The board's documents, shared with the server
    store: Arc<MemoryStore>,
    server: Arc<BoardServer>,
    snapshot_path: Option<PathBuf>,
}

impl Application {
    /// Loads the board and prepares the server.
    ///
    /// The store is read from the configured snapshot when there is one.
    /// With `seed` set, an empty store receives the demo data.
    pub async fn new(config: AppConfig, seed: bool) -> Result<Self, Box<dyn std::error::Error>> {
        display_banner();

        let snapshot_path = config.snapshot_path();
        let store = match &snapshot_path {
            Some(path) => {
                info!("📂 Loading board from {}", path.display());
                MemoryStore::load_snapshot(path).await?
            }
            None => {
                warn!("No snapshot path configured - the board will not survive a restart");
                MemoryStore::new()
            }
        };
        let store = Arc::new(store);

        let server_config = config.to_server_config()?;
        if seed {
            let passwords = PasswordHasher::new(server_config.auth.password_rounds);
            seed_if_empty(store.as_ref(), passwords).await?;
        }

        let server = Arc::new(BoardServer::new(server_config, store.clone()));

        Ok(Self {
            config,
            store,
            server,
            snapshot_path,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Serves the board until a termination signal, then drains requests and
    /// saves the snapshot.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting Parley");
        self.log_configuration_summary();

        let stats = self.store.stats().await;
        info!(
            "📊 Board loaded: {} users | {} posts | {} comments",
            stats.users, stats.posts, stats.comments
        );

        let shutdown_state = ShutdownState::new();
        let mut server_handle = {
            let server = self.server.clone();
            let shutdown_state = shutdown_state.clone();
            tokio::spawn(async move { server.start_with_shutdown_state(shutdown_state).await })
        };

        let monitoring_handle = {
            let store = self.store.clone();
            tokio::spawn(async move {
                let mut ticker = interval(Duration::from_secs(60));
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let stats = store.stats().await;
                    info!(
                        "📊 Board Health - {} users | {} posts | {} comments",
                        stats.users, stats.posts, stats.comments
                    );
                }
            })
        };

        info!("✅ Parley is now running on {}", self.config.server.bind_address);
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        tokio::select! {
            signal = shutdown_on_signal(&shutdown_state) => signal?,
            finished = &mut server_handle => {
                // The server only stops on its own when it failed to start.
                monitoring_handle.abort();
                finished??;
                return Err("Server stopped unexpectedly".into());
            }
        }

        exit_on_second_signal();
        monitoring_handle.abort();

        info!("⏳ Waiting for in-flight requests to finish...");
        match timeout(DRAIN_TIMEOUT, server_handle).await {
            Ok(Ok(Ok(()))) => info!("✅ Server stopped gracefully"),
            Ok(Ok(Err(e))) => error!("❌ Server error during shutdown: {}", e),
            Ok(Err(e)) => error!("❌ Server task failed: {}", e),
            Err(_) => warn!("⏰ Requests still in flight after {:?}, saving anyway", DRAIN_TIMEOUT),
        }

        self.persist().await?;

        let stats = self.store.stats().await;
        info!("📊 Final Statistics:");
        info!("  - Users: {}", stats.users);
        info!("  - Posts: {}", stats.posts);
        info!("  - Comments: {}", stats.comments);
        info!("👋 Parley shutdown complete");

        Ok(())
    }

    /// Writes the board to the configured snapshot, if any.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        self.store.save_snapshot(path).await?;
        info!("💾 Saved board to {}", path.display());
        Ok(())
    }

    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  🌐 Bind address: {}", self.config.server.bind_address);
        info!("  🖥️ Frontend origin: {}", self.config.server.frontend_url);
        if self.config.security.enable_rate_limiting {
            info!(
                "  🚦 Rate limit: {} requests per {}s",
                self.config.security.rate_limit_max_requests, self.config.security.rate_limit_window_secs
            );
        } else {
            info!("  🚦 Rate limit: disabled");
        }
        info!("  🔑 Token lifetime: {}s", self.config.auth.token_ttl_secs);
        match &self.snapshot_path {
            Some(path) => info!("  💾 Snapshot: {}", path.display()),
            None => info!("  💾 Snapshot: none (in-memory only)"),
        }
    }
}
