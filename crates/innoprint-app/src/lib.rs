//! # Innoprint App
//!
//! Session state and command handlers for the Innoprint storefront, plus the
//! `innoprint` command-line tool built on top of them.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Innoprint App                                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Frontend / CLI                              │   │
//! │  │   catalogue · model page · checkout · profile · upload          │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │ async fn calls                          │
//! │                               ▼                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Command Handlers                            │   │
//! │  │   pricing · catalogue · address · checkout · upload             │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │                                         │
//! │  ┌────────────────────────────┴────────────────────────────────────┐   │
//! │  │                        App State                                │   │
//! │  │   AppConfig · Database · PricingEngine · Session(AddressBook)   │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │                                         │
//! │  ┌────────────────────────────┴────────────────────────────────────┐   │
//! │  │         innoprint-core          │          innoprint-db          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use innoprint_core::pricing::PricingEngine;
use innoprint_db::Database;

use error::ApiResult;
use state::{open_database, AppConfig, Session};

/// Everything a storefront front end holds for its lifetime.
pub struct App {
    pub config: AppConfig,
    pub db: Database,
    pub pricing: PricingEngine,
    pub session: Session,
}

impl App {
    /// Loads configuration, opens the database and builds the pricing engine.
    pub async fn open(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let config = AppConfig::load(config_path)?;
        Self::with_config(config).await
    }

    pub async fn with_config(config: AppConfig) -> ApiResult<Self> {
        let db = open_database(&config).await?;
        let pricing = PricingEngine::new(config.catalog.clone());
        let session = Session::new(&db);

        info!(store = %config.store.name, "State initialized");
        Ok(App {
            config,
            db,
            pricing,
            session,
        })
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=innoprint=trace` - Show trace for innoprint crates only
/// - Default: INFO level
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// Calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,innoprint=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
