//! # Domain Types
//!
//! Core domain types used throughout Innoprint.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Model       │   │    Address      │   │    Identity     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  uid            │       │
//! │  │  title          │   │  user_id        │   │  email          │       │
//! │  │  base_price     │   │  zip_code       │   │  display_name   │       │
//! │  │  base_print_time│   │  is_default     │   └─────────────────┘       │
//! │  │  category       │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    TaxRate      │   │    Category     │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  bps (u32)      │   │  Art, Figurine, │                              │
//! │  │  1800 = 18%     │   │  Gadget, ...    │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Models and addresses use UUID v4 strings assigned by the store on insert.
//! Callers treat them as opaque.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (GST on printed goods)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Category
// =============================================================================

/// Catalogue category a model is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Art,
    Decoration,
    Figurine,
    Fashion,
    Gadget,
    Home,
    Tool,
    Toy,
    Engineering,
    Other,
}

impl Category {
    /// Every category, in the order the storefront lists them.
    pub const ALL: [Category; 10] = [
        Category::Art,
        Category::Decoration,
        Category::Figurine,
        Category::Fashion,
        Category::Gadget,
        Category::Home,
        Category::Tool,
        Category::Toy,
        Category::Engineering,
        Category::Other,
    ];

    /// Lowercase identifier used in URLs, the database and query strings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Art => "art",
            Category::Decoration => "decoration",
            Category::Figurine => "figurine",
            Category::Fashion => "fashion",
            Category::Gadget => "gadget",
            Category::Home => "home",
            Category::Tool => "tool",
            Category::Toy => "toy",
            Category::Engineering => "engineering",
            Category::Other => "other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses category ids. Plural forms used by filter dropdowns
/// ("figurines", "gadgets", "tools", "toys") are accepted too.
impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let singular = normalized.strip_suffix('s').unwrap_or(&normalized);

        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized || c.as_str() == singular)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: Category::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Model
// =============================================================================

/// A printable 3D model record.
///
/// Listed models appear in the catalogue. Quick-print uploads create
/// unlisted models that are only reachable by id.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Model {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub title: String,

    pub description: String,

    /// Display name of the creator.
    pub creator: String,

    /// User id of the uploader, when the model came from an upload.
    pub owner_id: Option<String>,

    pub category: Category,

    /// Reference to the model file (STL, OBJ, GLB, ...).
    pub file_url: String,

    pub thumbnail_url: Option<String>,

    pub download_count: i64,

    pub print_count: i64,

    /// Reference price in whole currency units before options are applied.
    pub base_price: f64,

    /// Reference print duration in hours before options are applied.
    pub base_print_time: f64,

    /// License id for published models (cc-by, cc0, custom, ...).
    pub license: Option<String>,

    /// Comma-separated tags.
    pub tags: Option<String>,

    pub allow_derivatives: bool,

    pub allow_commercial_use: bool,

    /// Whether the model shows up in catalogue listings.
    pub is_listed: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Tags split on commas, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|t| {
                t.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A model record before the store assigns its id and creation time.
///
/// Counters start at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDraft {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub owner_id: Option<String>,
    pub category: Category,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub base_price: f64,
    pub base_print_time: f64,
    pub license: Option<String>,
    pub tags: Option<String>,
    pub allow_derivatives: bool,
    pub allow_commercial_use: bool,
    pub is_listed: bool,
}

// =============================================================================
// Address
// =============================================================================

/// A saved delivery address.
///
/// ## Invariant
/// For any user at most one address has `is_default == true`. The store
/// enforces it; this type only carries the flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Address {
    /// Store-assigned identifier. `None` until the first save.
    pub id: Option<String>,

    /// Owning user.
    pub user_id: String,

    /// Recipient name.
    pub name: String,

    pub line1: String,

    pub line2: Option<String>,

    pub city: String,

    pub state: String,

    /// Postal code (6-digit PIN).
    pub zip_code: String,

    pub country: String,

    pub is_default: bool,
}

/// Address form input, before it is bound to a user.
///
/// The delivery step and the profile page submit this. Ownership is added
/// from the signed-in identity, never from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewAddress {
    pub name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl NewAddress {
    /// Binds the form to its owner, producing an unsaved `Address`.
    ///
    /// Fields are trimmed and an all-whitespace `line2` becomes `None`.
    pub fn into_address(self, user_id: impl Into<String>) -> Address {
        Address {
            id: None,
            user_id: user_id.into(),
            name: self.name.trim().to_string(),
            line1: self.line1.trim().to_string(),
            line2: self
                .line2
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            country: self.country.trim().to_string(),
            is_default: self.is_default,
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl Identity {
    /// Name to show in the header: display name, else the email's local part.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(18.0).bps(), 1800);
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("art".parse::<Category>().unwrap(), Category::Art);
        assert_eq!("Figurines".parse::<Category>().unwrap(), Category::Figurine);
        assert_eq!(" tools ".parse::<Category>().unwrap(), Category::Tool);
        assert!("furniture".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&Category::Engineering).unwrap();
        assert_eq!(json, "\"engineering\"");
    }

    #[test]
    fn test_new_address_into_address_trims() {
        let form = NewAddress {
            name: " Asha Rao ".to_string(),
            line1: "12 MG Road".to_string(),
            line2: Some("   ".to_string()),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip_code: " 560001 ".to_string(),
            country: "India".to_string(),
            is_default: false,
        };

        let address = form.into_address("user-1");
        assert_eq!(address.id, None);
        assert_eq!(address.user_id, "user-1");
        assert_eq!(address.name, "Asha Rao");
        assert_eq!(address.line2, None);
        assert_eq!(address.zip_code, "560001");
    }

    #[test]
    fn test_identity_label() {
        let mut identity = Identity {
            uid: "u1".to_string(),
            email: "maker@example.com".to_string(),
            display_name: None,
        };
        assert_eq!(identity.label(), "maker");

        identity.display_name = Some("Maker".to_string());
        assert_eq!(identity.label(), "Maker");
    }
}
