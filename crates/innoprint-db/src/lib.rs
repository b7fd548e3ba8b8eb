//! # innoprint-db: Database Layer for Innoprint
//!
//! This crate provides database access for the Innoprint storefront.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Innoprint Data Flow                              │
//! │                                                                         │
//! │  App command (save_address, list_catalogue)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   innoprint-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (address.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ AddressRepo   │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ ModelRepo     │    │              │  │   │
//! │  │   │ Management    │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/innoprint/innoprint.db                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded schema migrations and their status
//! - [`error`] - Database error types
//! - [`repository`] - Address store and model records
//! - [`seed`] - Starter catalogue for empty databases
//!
//! ## Usage
//!
//! ```rust,ignore
//! use innoprint_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/innoprint.db")).await?;
//!
//! let saved = db.addresses().list_for_user("uid-1").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, DbLocation, DbStatus};

// Repository re-exports for convenience
pub use repository::address::AddressRepository;
pub use repository::model::ModelRepository;
