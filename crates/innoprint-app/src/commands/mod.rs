//! # Commands Module
//!
//! Every operation a storefront UI can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── catalogue.rs  ◄─── Browse, model detail, download counter
//! ├── pricing.rs    ◄─── Print options and quotes
//! ├── address.rs    ◄─── Saved addresses and delivery selection
//! ├── checkout.rs   ◄─── Summary, payment hand-off, confirmation
//! └── upload.rs     ◄─── Quick print and catalogue publish
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs database
//! list_catalogue(&db, &query).await?;
//!
//! // Only needs the session
//! set_default_address(&session, "address-id").await?;
//!
//! // Needs database, pricing and session
//! create_payment(&db, &pricing, &config, &session, &request).await?;
//! ```
//!
//! Every fallible command returns `Result<T, ApiError>`.

pub mod address;
pub mod catalogue;
pub mod checkout;
pub mod pricing;
pub mod upload;
