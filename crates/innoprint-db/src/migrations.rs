//! # Schema Migrations
//!
//! The SQL files under `migrations/sqlite/` at the workspace root are
//! embedded at compile time and applied every time a [`Database`] opens.
//!
//! ```text
//! Database::new ──► apply() ──► _sqlx_migrations records each version
//!                                     │
//! Database::status ──► status() ◄─────┘  available vs applied
//! ```
//!
//! New schema changes go in a new `NNN_description.sql` file. Applied files
//! are never edited; sqlx rejects a checksum mismatch on the next open.
//!
//! [`Database`]: crate::pool::Database

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far the open database's schema is from the embedded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migrations compiled into this binary.
    pub available: usize,
    /// Migrations recorded as applied in the database.
    pub applied: usize,
    /// Highest applied version, `None` on a fresh file.
    pub schema_version: Option<i64>,
}

impl MigrationStatus {
    /// Embedded versions the database has not applied yet.
    pub fn pending(&self) -> usize {
        self.available.saturating_sub(self.applied)
    }

    pub fn is_pending(&self) -> bool {
        self.pending() > 0
    }
}

/// Applies every embedded migration the database has not seen yet.
pub async fn apply(pool: &SqlitePool) -> DbResult<()> {
    debug!(available = MIGRATOR.migrations.len(), "Applying migrations");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}

/// Reads the applied versions from `_sqlx_migrations`.
pub async fn status(pool: &SqlitePool) -> DbResult<MigrationStatus> {
    let versions: Vec<i64> = sqlx::query_scalar(
        "SELECT version FROM _sqlx_migrations WHERE success = 1 ORDER BY version",
    )
    .fetch_all(pool)
    .await?;

    Ok(MigrationStatus {
        available: MIGRATOR.migrations.len(),
        applied: versions.len(),
        schema_version: versions.last().copied(),
    })
}
