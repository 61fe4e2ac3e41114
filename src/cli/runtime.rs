use std::path::PathBuf;

use anyhow::{Context, Result};
use overlay_pilot::config::{self, LoadedConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let loaded = config::load(config_path.map(PathBuf::as_path))
        .await
        .context("Failed to load configuration")?;

    if loaded.from_file {
        info!("Loaded configuration from: {}", loaded.path.display());
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            loaded.path.display()
        );
    }
    Ok(loaded)
}
