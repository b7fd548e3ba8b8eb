//! # Application Configuration
//!
//! Store, checkout, database, upload and option-catalog settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INNOPRINT_DB_PATH=/var/lib/innoprint/innoprint.db                  │
//! │     INNOPRINT_TAX_RATE=18                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $INNOPRINT_CONFIG, or                                              │
//! │     ~/.config/innoprint/config.toml (Linux)                            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Innoprint"
//! currency_code = "INR"
//! currency_symbol = "₹"
//!
//! [checkout]
//! tax_rate_bps = 1800   # 18% GST
//! shipping = 100        # flat, whole currency units
//!
//! [database]
//! path = "./innoprint.db"
//! max_connections = 5
//!
//! [uploads]
//! base_price = 800.0
//! base_print_time = 8.0
//!
//! [[catalog.materials]]
//! id = "pla"
//! name = "PLA"
//! price_multiplier = 1.0
//! ```
//!
//! A `[catalog]` section replaces the built-in option tables as a whole.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use innoprint_core::catalog::OptionCatalog;
use innoprint_core::money::MINOR_PER_MAJOR;
use innoprint_core::upload::UploadDefaults;
use innoprint_core::validation::validate_tax_rate_bps;
use innoprint_core::{Money, TaxRate, ValidationError, MAX_UPLOAD_BYTES};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "INNOPRINT_CONFIG";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine the application data directory")]
    NoDataDir,
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Storefront identity and currency display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Shown in the payment widget.
    pub name: String,

    /// ISO 4217 code handed to the payment widget.
    pub currency_code: String,

    pub currency_symbol: String,

    /// Digits shown after the decimal point: 0 (whole units) or 2.
    pub currency_decimals: u8,
}

/// Minor-unit digits `Money` carries.
const MINOR_DIGITS: u8 = MINOR_PER_MAJOR.ilog10() as u8;

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "Innoprint".to_string(),
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
            currency_decimals: 2,
        }
    }
}

impl StoreSettings {
    /// Formats an amount for display. With `currency_decimals = 0` the
    /// amount is rounded to whole units first.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let store = StoreSettings::default();
    /// assert_eq!(store.format_money(Money::from_major(5365)), "₹5365.00");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        if self.currency_decimals == 0 {
            let rounded = amount.round_to_major();
            let sign = if rounded.is_negative() { "-" } else { "" };
            return format!(
                "{}{}{}",
                sign,
                self.currency_symbol,
                rounded.major().unsigned_abs()
            );
        }

        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.currency_symbol,
            amount.major().unsigned_abs(),
            amount.minor_part()
        )
    }
}

/// Tax and shipping applied on the payment page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutSettings {
    /// Tax rate in basis points. 1800 = 18% GST.
    pub tax_rate_bps: u32,

    /// Flat shipping in whole currency units.
    pub shipping: i64,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            tax_rate_bps: 1800,
            shipping: 100,
        }
    }
}

impl CheckoutSettings {
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    pub fn shipping_money(&self) -> Money {
        Money::from_major(self.shipping)
    }
}

/// Where the SQLite file lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Explicit database file. `None` uses the platform data directory.
    pub path: Option<PathBuf>,

    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: 5,
        }
    }
}

/// Settings for uploaded models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Base price given to uploaded models.
    pub base_price: f64,

    /// Base print time (hours) given to uploaded models.
    pub base_print_time: f64,

    /// Upload size limit. Never above 50 MiB.
    pub max_file_bytes: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        UploadSettings {
            base_price: 800.0,
            base_print_time: 8.0,
            max_file_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadSettings {
    pub fn defaults(&self) -> UploadDefaults {
        UploadDefaults {
            base_price: self.base_price,
            base_print_time: self.base_print_time,
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub uploads: UploadSettings,

    /// Print option tables used by the pricing engine.
    #[serde(default)]
    pub catalog: OptionCatalog,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path`, else `$INNOPRINT_CONFIG`, else the
    ///    platform config directory. A missing file is not an error.
    /// 3. Environment variables
    /// 4. Validation
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let path = config_path
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections keep their defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `INNOPRINT_*` overrides read through `lookup`.
    ///
    /// - `INNOPRINT_DB_PATH`: database file
    /// - `INNOPRINT_STORE_NAME`: store name
    /// - `INNOPRINT_TAX_RATE`: tax rate in percent (e.g. "18")
    /// - `INNOPRINT_SHIPPING`: flat shipping in whole currency units
    ///
    /// Unparseable numbers are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("INNOPRINT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(name) = lookup("INNOPRINT_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(rate) = lookup("INNOPRINT_TAX_RATE") {
            if let Ok(pct) = rate.trim().parse::<f64>() {
                self.checkout.tax_rate_bps = TaxRate::from_percentage(pct).bps();
            }
        }

        if let Some(shipping) = lookup("INNOPRINT_SHIPPING") {
            if let Ok(amount) = shipping.trim().parse::<i64>() {
                self.checkout.shipping = amount;
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ValidationError::required("store.name").into());
        }

        if self.store.currency_decimals != 0 && self.store.currency_decimals != MINOR_DIGITS {
            return Err(ConfigError::Invalid(format!(
                "store.currency_decimals must be 0 or {}",
                MINOR_DIGITS
            )));
        }

        validate_tax_rate_bps(self.checkout.tax_rate_bps)?;

        if self.checkout.shipping < 0 {
            return Err(ConfigError::Invalid(
                "checkout.shipping must not be negative".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if !(self.uploads.base_price > 0.0 && self.uploads.base_print_time > 0.0) {
            return Err(ConfigError::Invalid(
                "uploads.base_price and uploads.base_print_time must be positive".into(),
            ));
        }

        self.catalog.validate()?;

        Ok(())
    }

    /// Upload limit after applying the hard cap.
    pub fn max_upload_bytes(&self) -> u64 {
        self.uploads.max_file_bytes.min(MAX_UPLOAD_BYTES)
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "innoprint", "innoprint")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.checkout.tax_rate_bps, 1800);
        assert_eq!(config.checkout.shipping_money(), Money::from_major(100));
        assert_eq!(config.catalog.materials.len(), 5);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [store]
            name = "Print Hub"

            [checkout]
            shipping = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Print Hub");
        assert_eq!(config.store.currency_code, "INR");
        assert_eq!(config.checkout.shipping, 50);
        assert_eq!(config.checkout.tax_rate_bps, 1800);
    }

    #[test]
    fn test_catalog_section_replaces_tables() {
        let config = AppConfig::from_toml_str(
            r##"
            [[catalog.materials]]
            id = "nylon"
            name = "Nylon"
            price_multiplier = 1.7

            [[catalog.qualities]]
            id = "standard"
            name = "Standard"
            price_multiplier = 1.0
            time_multiplier = 1.0

            [[catalog.sizes]]
            id = "md"
            name = "Medium"
            scale = 1.0
            price_multiplier = 1.0

            [[catalog.colors]]
            id = "black"
            name = "Black"
            hex = "#000000"
            "##,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.catalog.materials.len(), 1);
        assert!(config.catalog.material("nylon").is_ok());
        assert!(config.catalog.material("pla").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("INNOPRINT_DB_PATH", "/tmp/shop.db"),
            ("INNOPRINT_STORE_NAME", "Overridden"),
            ("INNOPRINT_TAX_RATE", "12.5"),
            ("INNOPRINT_SHIPPING", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database.path, Some(PathBuf::from("/tmp/shop.db")));
        assert_eq!(config.store.name, "Overridden");
        assert_eq!(config.checkout.tax_rate_bps, 1250);
        assert_eq!(config.checkout.shipping, 100);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.checkout.tax_rate_bps = 10_001;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.checkout.shipping = -1;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.catalog.materials.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.catalog.sizes[0].price_multiplier = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_upload_limit_is_capped() {
        let mut config = AppConfig::default();
        config.uploads.max_file_bytes = u64::MAX;
        assert_eq!(config.max_upload_bytes(), MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_format_money() {
        let store = StoreSettings::default();
        assert_eq!(store.format_money(Money::from_major(5365)), "₹5365.00");
        assert_eq!(store.format_money(Money::from_minor(-150)), "-₹1.50");
    }

    #[test]
    fn test_format_money_whole_units() {
        let store = StoreSettings {
            currency_decimals: 0,
            ..StoreSettings::default()
        };
        assert_eq!(store.format_money(Money::from_major(5)), "₹5");
        assert_eq!(store.format_money(Money::from_minor(80_350)), "₹804");
        assert_eq!(store.format_money(Money::from_minor(-40)), "₹0");
    }

    #[test]
    fn test_validate_rejects_unsupported_decimals() {
        let mut config = AppConfig::default();
        config.store.currency_decimals = 0;
        assert!(config.validate().is_ok());

        for decimals in [1, 3, 19, u8::MAX] {
            config.store.currency_decimals = decimals;
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load(Some(PathBuf::from("/nonexistent/innoprint.toml")));
        assert!(config.is_ok());
    }
}
