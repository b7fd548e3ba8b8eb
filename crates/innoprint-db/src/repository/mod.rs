//! # Repository Module
//!
//! Database repository implementations for Innoprint.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  App command                                                           │
//! │       │                                                                 │
//! │       │  db.addresses().save(&address)                                 │
//! │       ▼                                                                 │
//! │  AddressRepository                                                     │
//! │  ├── save(&self, address)          (upsert, clears other defaults)     │
//! │  ├── list_for_user(&self, user_id)                                     │
//! │  ├── set_default(&self, id, user_id)                                   │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`address::AddressRepository`] - Per-user saved delivery addresses
//! - [`model::ModelRepository`] - Catalogue and uploaded model records

pub mod address;
pub mod model;
