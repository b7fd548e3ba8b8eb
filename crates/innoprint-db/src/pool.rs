//! # Database Handle
//!
//! Opens the storefront's SQLite store and hands out repositories.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path)  │  DbConfig::in_memory()                          │
//! │            │                     │                                      │
//! │            ▼                     ▼                                      │
//! │  Database::new ── WAL file, N connections │ one shared connection      │
//! │            │                                                            │
//! │            ├── foreign keys on, busy timeout for concurrent writers     │
//! │            └── migrations::apply                                        │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  db.addresses() / db.models()   repositories sharing the pool          │
//! │  db.status()                    schema version and row counts          │
//! │  db.close()                     every later query fails                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Address default-setting runs inside write transactions. Two sessions
//! doing it at once serialize on SQLite's write lock, so file databases
//! wait up to `busy_timeout` for the lock instead of failing with
//! `SQLITE_BUSY`.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations::{self, MigrationStatus};
use crate::repository::address::AddressRepository;
use crate::repository::model::ModelRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// A database file, created on first open.
    File(PathBuf),
    /// A private in-memory database that lives as long as the pool.
    Memory,
}

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/innoprint.db").max_connections(5);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Pool size for file databases. In-memory stores always use one
    /// connection, since each connection would otherwise see its own empty
    /// database.
    pub max_connections: u32,

    /// How long a writer waits for another writer's transaction.
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Configuration for a database file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Configuration for an isolated in-memory database (tests).
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    fn pool_size(&self) -> u32 {
        match self.location {
            DbLocation::File(_) => self.max_connections.max(1),
            DbLocation::Memory => 1,
        }
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal),
            DbLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };

        Ok(options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(self.busy_timeout))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Point-in-time view of the store, for the CLI and start-up logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbStatus {
    pub schema: MigrationStatus,
    pub models: i64,
    pub addresses: i64,
}

/// Main database handle providing repository access.
///
/// Cheap to clone: every clone shares the same pool.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./innoprint.db")).await?;
/// let addresses = db.addresses().list_for_user("uid-1").await?;
/// let model = db.models().get_by_id("model-uuid").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store and brings its schema up to date.
    ///
    /// ## Errors
    /// - `ConnectionFailed` when the file cannot be opened or created
    /// - `MigrationFailed` when an embedded migration does not apply
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = ?config.location, "Opening database");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size())
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        migrations::apply(&pool).await?;

        info!(max_connections = config.pool_size(), "Database ready");
        Ok(Database { pool })
    }

    /// For queries no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the address repository (the per-user address store).
    pub fn addresses(&self) -> AddressRepository {
        AddressRepository::new(self.pool.clone())
    }

    /// Returns the model (catalogue) repository.
    pub fn models(&self) -> ModelRepository {
        ModelRepository::new(self.pool.clone())
    }

    /// Schema version plus model and address row counts.
    pub async fn status(&self) -> DbResult<DbStatus> {
        let schema = migrations::status(&self.pool).await?;
        let models = self.models().count().await?;
        let addresses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_addresses")
            .fetch_one(&self.pool)
            .await?;

        Ok(DbStatus {
            schema,
            models,
            addresses,
        })
    }

    /// Closes the pool. Every repository call afterwards fails with
    /// `ConnectionFailed`.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Whether a trivial query still succeeds.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use innoprint_core::NewAddress;

    fn temp_db_path() -> PathBuf {
        std::env::temp_dir().join(format!("innoprint-pool-{}.db", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        assert!(!db.is_closed());
    }

    #[test]
    fn test_in_memory_ignores_pool_size() {
        let config = DbConfig::in_memory().max_connections(8);
        assert_eq!(config.pool_size(), 1);

        let config = DbConfig::new("/tmp/x.db").max_connections(0);
        assert_eq!(config.pool_size(), 1);
        assert_eq!(DbConfig::new("/tmp/x.db").pool_size(), 5);
    }

    #[tokio::test]
    async fn test_status_reports_schema_and_rows() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let home = NewAddress {
            name: "Home".to_string(),
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip_code: "560001".to_string(),
            country: "India".to_string(),
            is_default: true,
        };
        db.addresses().save(&home.into_address("u1")).await.unwrap();

        let status = db.status().await.unwrap();
        assert!(!status.schema.is_pending());
        assert_eq!(status.models, 0);
        assert_eq!(status.addresses, 1);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let path = temp_db_path();

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        crate::seed::seed_catalogue(&db).await.unwrap();
        db.close().await;

        let reopened = Database::new(DbConfig::new(&path)).await.unwrap();
        let status = reopened.status().await.unwrap();
        assert_eq!(status.models, crate::seed::STARTER_MODEL_COUNT as i64);
        assert_eq!(status.schema.schema_version, Some(1));
        reopened.close().await;

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn test_closed_database_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(db.is_closed());
        assert!(!db.health_check().await);
        assert!(matches!(
            db.status().await,
            Err(DbError::ConnectionFailed(_))
        ));
    }
}
