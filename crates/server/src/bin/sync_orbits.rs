//! One-shot job copying the latest Space-Track orbital elements into flown
//! payloads. Intended to run from a scheduler.
//!
//! Configuration is read from the file named by `LAUNCHLOG_CONFIG` when set,
//! otherwise from `LAUNCHLOG_`-prefixed environment variables only.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};

use launchlog_core::{
    load_config, load_config_from_env, validate_config, Config, LaunchStore, OrbitError,
    OrbitReconciler, OrbitSource, SpaceTrackClient, SqliteLaunchStore,
};
use launchlog_server::init_logging;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn load() -> Result<Config> {
    let config = match std::env::var_os("LAUNCHLOG_CONFIG").map(PathBuf::from) {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_from_env().context("Failed to load config from environment")?,
    };
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

async fn run() -> Result<()> {
    init_logging();

    let config = load()?;
    let space_track = config
        .space_track
        .clone()
        .context("Missing [space_track] configuration")?;

    let store: Arc<dyn LaunchStore> = Arc::new(
        SqliteLaunchStore::open_existing(&config.database.path)
            .context("Failed to open launch store")?,
    );
    info!("Opened launch store at {:?}", config.database.path);

    let source: Arc<dyn OrbitSource> = Arc::new(
        SpaceTrackClient::new(space_track).context("Failed to create Space-Track client")?,
    );

    let reconciler = OrbitReconciler::new(store, source);
    let report = reconciler.run().await.map_err(|e| match e {
        OrbitError::Fetch(_) => anyhow::Error::new(e).context("Space-Track session broken"),
        other => anyhow::Error::new(other).context("Orbit reconciliation failed"),
    })?;

    info!(
        processed = report.processed,
        updated = report.updated,
        missed = report.missed,
        invalid = report.invalid,
        "Orbit sync complete"
    );
    Ok(())
}
