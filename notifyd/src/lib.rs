//! Desktop notification daemon: storage, policy and bubble management behind
//! an HTTP + WebSocket interface.

pub mod app;
pub mod config;
pub mod events;
pub mod server;
pub mod service;
pub mod shutdown;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use notify_db::Database;

use config::{AppConfig, SettingsManager};

/// Determine the data directory for the daemon.
/// Priority: NOTIFYD_DATA_DIR env var > ~/.notifyd
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("NOTIFYD_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".notifyd")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Open the database, migrate settings and load the runtime config.
pub fn init_foundation() -> Result<(Database, AppConfig, PathBuf), anyhow::Error> {
    load_dotenv();

    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;
    let db_path = dir.join("notifications.db");

    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let sm = SettingsManager::new(db.clone());

    // One-time import of settings given as environment variables
    if let Err(e) = sm.migrate_from_env() {
        tracing::error!("Failed to migrate from env: {e}");
    }

    sm.initialize_defaults()?;

    let config = AppConfig::load(&sm, &dir)?;

    if let Ok(status) = sm.check_status() {
        for warning in &status.warnings {
            tracing::warn!("{warning}");
        }
    }

    if let Err(e) = std::fs::create_dir_all(&config.icon_cache_dir) {
        tracing::warn!(
            "Failed to create icon cache {}: {e}",
            config.icon_cache_dir.display()
        );
    }

    tracing::info!(
        port = config.server_port,
        builtin = config.builtin_bubbles,
        "Settings loaded"
    );
    Ok((db, config, dir))
}
