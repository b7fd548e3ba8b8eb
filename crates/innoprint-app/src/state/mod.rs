//! # State Module
//!
//! Application and session state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────────────┐  ┌──────────────────┐      │
//! │  │  AppConfig   │  │      Database        │  │     Session      │      │
//! │  │              │  │                      │  │                  │      │
//! │  │  store       │  │  SqlitePool          │  │  Identity        │      │
//! │  │  checkout    │  │  (innoprint-db)      │  │  AddressBook     │      │
//! │  │  catalog     │  │                      │  │  (per user)      │      │
//! │  └──────────────┘  └──────────────────────┘  └──────────────────┘      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • AppConfig: read-only after load                                     │
//! │  • Database: internal connection pool (thread-safe)                    │
//! │  • Session: RwLock'd cache, async Mutex serializing store calls        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod addresses;
mod config;
mod db;
mod session;

pub use addresses::{AddressBook, AddressSnapshot, LoadPhase};
pub use config::{
    AppConfig, CheckoutSettings, ConfigError, ConfigResult, DatabaseSettings, StoreSettings,
    UploadSettings, CONFIG_PATH_ENV,
};
pub use db::{database_path, open_database, DATABASE_FILE};
pub use session::Session;
