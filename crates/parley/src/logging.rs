//! Logging setup.
//!
//! Human-readable output by default, one JSON object per line when
//! `json_format` is set. `RUST_LOG` overrides the configured level.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter for the configured level; request spans from `tower_http` follow it.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},tower_http={level}")))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn setup_logging(
    config: &LoggingSettings,
    json_format: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry().with(env_filter(&config.level));

    if json_format || config.json_format {
        registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(true))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().compact().with_target(false))
            .try_init()?;
    }

    info!("🔧 Logging initialized with level: {}", config.level);
    Ok(())
}

/// Displays the startup banner.
pub fn display_banner() {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("┌──────────────────────────────────────────┐");
    info!("│  💬 Parley v{:<29}│", version);
    info!("│  Threaded discussions, ten replies deep  │");
    info!("└──────────────────────────────────────────┘");
}
