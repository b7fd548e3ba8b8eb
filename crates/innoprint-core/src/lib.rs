//! # innoprint-core: Pure Business Logic for Innoprint
//!
//! This crate holds everything the print storefront decides without talking
//! to the outside world: how much a print costs, how long it takes, what a
//! valid address or upload looks like, and how the catalogue is browsed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Innoprint Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Storefront (UI)                          │   │
//! │  │  Catalogue ──► Model ──► Print Opts ──► Delivery ──► Payment    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 innoprint-app (commands, session)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ innoprint-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐  │   │
//! │  │   │ catalog │ │ pricing │ │ checkout │ │catalogue │ │upload │  │   │
//! │  │   │ options │ │ engine  │ │ summary  │ │  browse  │ │ rules │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └───────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 innoprint-db (Database Layer)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Model, Address, Category, TaxRate)
//! - [`money`] - Money type with integer arithmetic in minor units
//! - [`catalog`] - Injectable material/quality/size/color option tables
//! - [`pricing`] - Price and print-time estimation
//! - [`checkout`] - Checkout summary, payment hand-off, order references
//! - [`catalogue`] - Catalogue filtering and sorting
//! - [`upload`] - Model file and publish-form rules
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation
//!
//! ## Example Usage
//!
//! ```rust
//! use innoprint_core::catalog::OptionCatalog;
//! use innoprint_core::pricing::{PricingEngine, PrintRequest};
//!
//! let engine = PricingEngine::new(OptionCatalog::default());
//! let request = PrintRequest {
//!     supports: false,
//!     ..PrintRequest::default()
//! };
//!
//! let result = engine.quote_base(800.0, 8.0, &request).unwrap();
//! assert_eq!(result.total.major(), 800);
//! assert_eq!(result.print_hours, 8);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod catalogue;
pub mod checkout;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod upload;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest number of copies a single print order may request.
pub const MIN_QUANTITY: u32 = 1;

/// Largest number of copies a single print order may request.
pub const MAX_QUANTITY: u32 = 100;

/// Lowest infill percentage the printers accept.
pub const MIN_INFILL: u32 = 10;

/// Highest infill percentage (solid print).
pub const MAX_INFILL: u32 = 100;

/// Infill percentage that the base price and base print time assume.
///
/// Every percentage point away from this shifts price by 1% and print time
/// by 0.5%.
pub const BASELINE_INFILL: u32 = 20;

/// Price surcharge applied when support structures are generated.
pub const SUPPORTS_PRICE_MULTIPLIER: f64 = 1.10;

/// Print-time surcharge applied when support structures are generated.
pub const SUPPORTS_TIME_MULTIPLIER: f64 = 1.15;

/// Largest model file accepted by either upload flow (50 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
