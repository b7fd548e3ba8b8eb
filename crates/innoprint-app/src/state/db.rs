//! # Database State
//!
//! Opens the `Database` described by the configuration.
//!
//! ## Thread Safety
//! The `Database` handle from `innoprint-db` wraps a `SqlitePool`, which is
//! thread-safe and cheap to clone. Commands borrow it directly; no extra
//! locking is needed.

use std::path::PathBuf;
use tracing::info;

use innoprint_db::{Database, DbConfig};

use super::config::{AppConfig, ConfigError, DatabaseSettings};
use crate::error::ApiResult;

/// File name used inside the platform data directory.
pub const DATABASE_FILE: &str = "innoprint.db";

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.innoprint.innoprint/innoprint.db`
/// - **Windows**: `%APPDATA%\innoprint\innoprint\data\innoprint.db`
/// - **Linux**: `~/.local/share/innoprint/innoprint.db`
///
/// An explicit `database.path` (or `INNOPRINT_DB_PATH`) wins.
pub fn database_path(settings: &DatabaseSettings) -> Result<PathBuf, ConfigError> {
    if let Some(path) = &settings.path {
        return Ok(path.clone());
    }

    let proj_dirs = directories::ProjectDirs::from("com", "innoprint", "innoprint")
        .ok_or(ConfigError::NoDataDir)?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join(DATABASE_FILE))
}

/// Connects to the configured database and applies pending migrations.
pub async fn open_database(config: &AppConfig) -> ApiResult<Database> {
    let path = database_path(&config.database)?;
    info!(?path, "Database path determined");

    let db_config = DbConfig::new(path).max_connections(config.database.max_connections);
    let db = Database::new(db_config).await?;

    let status = db.status().await?;
    info!(
        schema_version = ?status.schema.schema_version,
        models = status.models,
        addresses = status.addresses,
        "Database connected and migrations applied"
    );
    Ok(db)
}
