//! Core board server implementation.
//!
//! This module contains the `BoardServer` struct, which binds the listener,
//! serves the API router and coordinates graceful shutdown.

use crate::{
    config::ServerConfig, error::ServerError, server::routes::build_router, shutdown::ShutdownState,
    state::AppState,
};
use axum::Router;
use board_store::BoardStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

/// The board API server.
///
/// Owns the shared [`AppState`] handed to every handler. The store is shared
/// with the caller so it can be persisted once the server has stopped.
pub struct BoardServer {
    /// Server configuration settings
    config: ServerConfig,

    /// State shared with every request handler
    state: AppState,

    /// Shutdown coordination used by [`Self::start`] and [`Self::shutdown`]
    shutdown_state: ShutdownState,
}

impl BoardServer {
    /// Creates a new board server over `store`.
    pub fn new(config: ServerConfig, store: Arc<dyn BoardStore>) -> Self {
        let state = AppState::new(config.clone(), store);
        Self {
            config,
            state,
            shutdown_state: ShutdownState::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The fully layered router, without a listener.
    pub fn router(&self) -> Result<Router, ServerError> {
        build_router(self.state.clone())
    }

    /// Starts the server and runs until [`Self::shutdown`] is called.
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown_state(self.shutdown_state.clone()).await
    }

    /// Starts the server and runs until `shutdown_state` is initiated.
    ///
    /// Once shutdown is initiated the listener closes, in-flight requests are
    /// allowed to finish, and `shutdown_state` is marked complete.
    pub async fn start_with_shutdown_state(&self, shutdown_state: ShutdownState) -> Result<(), ServerError> {
        let router = self.router()?;

        info!("🚀 Starting board server on {}", self.config.bind_address);
        let listener = TcpListener::bind(self.config.bind_address)
            .await
            .map_err(|e| ServerError::Network(format!("Failed to bind {}: {}", self.config.bind_address, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Network(e.to_string()))?;
        info!("🌐 Listening on http://{}", local_addr);

        if self.config.security.enable_rate_limiting {
            self.spawn_rate_limit_cleanup(shutdown_state.clone());
        }

        // A shutdown through `Self::shutdown` also stops an externally driven server.
        let internal = self.shutdown_state.clone();
        let external = shutdown_state.clone();
        let shutdown_signal = async move {
            tokio::select! {
                _ = internal.wait_for_shutdown() => {}
                _ = external.wait_for_shutdown() => {}
            }
            info!("🧹 Draining in-flight requests...");
        };

        let result = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await;

        if let Err(e) = result {
            error!("Server error: {}", e);
            return Err(ServerError::Network(e.to_string()));
        }

        shutdown_state.complete_shutdown();
        info!("Server stopped");
        Ok(())
    }

    /// Initiates server shutdown.
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        info!("🛑 Shutting down server...");
        self.shutdown_state.initiate_shutdown();
        Ok(())
    }

    /// Periodically forgets rate limit buckets whose window has run out.
    fn spawn_rate_limit_cleanup(&self, shutdown_state: ShutdownState) {
        let limiter = self.state.rate_limiter.clone();
        let period = self.config.security.rate_limit_window().max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        limiter.cleanup_old_entries();
                        debug!(
                            "Rate limiter cleanup: {} IPs tracked, {} requests blocked so far",
                            limiter.tracked_ips(),
                            limiter.get_blocked_count()
                        );
                    }
                    _ = shutdown_state.wait_for_shutdown() => break,
                }
            }
        });
    }
}
