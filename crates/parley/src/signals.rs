//! Signal handling for graceful server shutdown.
//!
//! A first SIGINT or SIGTERM (Ctrl+C on Windows) starts a graceful shutdown:
//! the listener closes, in-flight requests finish and the board is saved.
//! A second one exits immediately.

use board_server::ShutdownState;
use tokio::signal;
use tracing::{info, warn};

/// Resolves once a termination signal arrives.
pub async fn wait_for_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(windows)]
    signal::ctrl_c().await?;

    Ok(())
}

/// Waits for a termination signal, then initiates `shutdown`.
pub async fn shutdown_on_signal(shutdown: &ShutdownState) -> std::io::Result<()> {
    wait_for_signal().await?;
    info!("📡 Received shutdown signal - initiating graceful shutdown");
    shutdown.initiate_shutdown();
    Ok(())
}

/// Exits the process on the next termination signal, skipping cleanup.
pub fn exit_on_second_signal() {
    tokio::spawn(async {
        if let Err(e) = wait_for_signal().await {
            warn!("Failed to listen for a second shutdown signal: {e}");
            return;
        }

        warn!("Shutdown signal received again! Exiting without saving.");
        std::process::exit(1);
    });
}
