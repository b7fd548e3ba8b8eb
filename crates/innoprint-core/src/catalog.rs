//! # Option Catalog
//!
//! Lookup tables for the print options a customer can pick: material,
//! quality, size and color.
//!
//! ## Why a Catalog Object?
//! The pricing engine never names a material or a quality tier. It asks the
//! catalog for the multipliers behind an id. Swapping the catalog (from
//! config, from a test) retargets the engine to a different print shop
//! without touching the pricing math.
//!
//! ```text
//! PrintRequest { material: "petg", quality: "high", size: "lg", ... }
//!        │
//!        ▼  OptionCatalog::resolve
//! PrintOptions { material: {petg, 1.3}, quality: {high, 1.3, 1.5}, ... }
//!        │
//!        ▼  pricing::calculate
//! PricingResult { total, print_hours }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, OptionKind, ValidationError};

// =============================================================================
// Option Types
// =============================================================================

/// A printable material and its price multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialOption {
    pub id: String,
    pub name: String,
    pub price_multiplier: f64,
    #[serde(default)]
    pub description: String,
}

/// A layer-height tier. Finer layers cost more and take longer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QualityOption {
    pub id: String,
    pub name: String,
    pub price_multiplier: f64,
    pub time_multiplier: f64,
    #[serde(default)]
    pub description: String,
}

/// A print scale. `scale` drives print time, `price_multiplier` drives price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SizeOption {
    pub id: String,
    pub name: String,
    pub scale: f64,
    pub price_multiplier: f64,
}

/// A filament color. Colors do not affect price or time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ColorOption {
    pub id: String,
    pub name: String,
    pub hex: String,
}

// =============================================================================
// Catalog
// =============================================================================

/// The full set of option tables.
///
/// The first entry of `materials` and `colors` is the default selection.
/// Quality and size defaults are `standard` and `md` when present,
/// otherwise the first entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionCatalog {
    pub materials: Vec<MaterialOption>,
    pub qualities: Vec<QualityOption>,
    pub sizes: Vec<SizeOption>,
    pub colors: Vec<ColorOption>,
}

fn material(id: &str, name: &str, price: f64, description: &str) -> MaterialOption {
    MaterialOption {
        id: id.to_string(),
        name: name.to_string(),
        price_multiplier: price,
        description: description.to_string(),
    }
}

fn quality(id: &str, name: &str, price: f64, time: f64, description: &str) -> QualityOption {
    QualityOption {
        id: id.to_string(),
        name: name.to_string(),
        price_multiplier: price,
        time_multiplier: time,
        description: description.to_string(),
    }
}

fn size(id: &str, name: &str, scale: f64, price: f64) -> SizeOption {
    SizeOption {
        id: id.to_string(),
        name: name.to_string(),
        scale,
        price_multiplier: price,
    }
}

fn color(id: &str, name: &str, hex: &str) -> ColorOption {
    ColorOption {
        id: id.to_string(),
        name: name.to_string(),
        hex: hex.to_string(),
    }
}

impl Default for OptionCatalog {
    fn default() -> Self {
        OptionCatalog {
            materials: vec![
                material(
                    "pla",
                    "PLA",
                    1.0,
                    "Standard, eco-friendly material. Good for most prints.",
                ),
                material(
                    "abs",
                    "ABS",
                    1.2,
                    "Durable and heat-resistant. Good for functional parts.",
                ),
                material("petg", "PETG", 1.3, "Strong and flexible. Good for mechanical parts."),
                material(
                    "tpu",
                    "TPU",
                    1.5,
                    "Flexible and elastic. Good for parts that need to bend.",
                ),
                material(
                    "resin",
                    "Resin",
                    2.0,
                    "High detail and smooth finish. Good for intricate models.",
                ),
            ],
            qualities: vec![
                quality("draft", "Draft (0.3mm)", 0.8, 0.7, "Faster printing, visible layer lines"),
                quality("standard", "Standard (0.2mm)", 1.0, 1.0, "Balanced quality and speed"),
                quality(
                    "high",
                    "High (0.1mm)",
                    1.3,
                    1.5,
                    "Higher quality, less visible layer lines",
                ),
                quality(
                    "ultra",
                    "Ultra (0.05mm)",
                    1.8,
                    2.2,
                    "Maximum quality, minimal layer lines",
                ),
            ],
            sizes: vec![
                size("xs", "XS (50%)", 0.5, 0.5),
                size("sm", "Small (75%)", 0.75, 0.75),
                size("md", "Medium (100%)", 1.0, 1.0),
                size("lg", "Large (125%)", 1.25, 1.5),
                size("xl", "XL (150%)", 1.5, 2.0),
                size("xxl", "XXL (200%)", 2.0, 3.0),
            ],
            colors: vec![
                color("white", "White", "#FFFFFF"),
                color("black", "Black", "#000000"),
                color("red", "Red", "#FF0000"),
                color("blue", "Blue", "#0000FF"),
                color("green", "Green", "#00FF00"),
                color("yellow", "Yellow", "#FFFF00"),
                color("orange", "Orange", "#FFA500"),
                color("purple", "Purple", "#800080"),
            ],
        }
    }
}

impl OptionCatalog {
    pub fn material(&self, id: &str) -> CoreResult<&MaterialOption> {
        self.materials
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| unknown(OptionKind::Material, id))
    }

    pub fn quality(&self, id: &str) -> CoreResult<&QualityOption> {
        self.qualities
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| unknown(OptionKind::Quality, id))
    }

    pub fn size(&self, id: &str) -> CoreResult<&SizeOption> {
        self.sizes
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| unknown(OptionKind::Size, id))
    }

    pub fn color(&self, id: &str) -> CoreResult<&ColorOption> {
        self.colors
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| unknown(OptionKind::Color, id))
    }

    /// Id of the material preselected on the print options page.
    pub fn default_material_id(&self) -> Option<&str> {
        self.materials.first().map(|m| m.id.as_str())
    }

    pub fn default_color_id(&self) -> Option<&str> {
        self.colors.first().map(|c| c.id.as_str())
    }

    pub fn default_quality_id(&self) -> Option<&str> {
        self.qualities
            .iter()
            .find(|q| q.id == "standard")
            .or_else(|| self.qualities.first())
            .map(|q| q.id.as_str())
    }

    pub fn default_size_id(&self) -> Option<&str> {
        self.sizes
            .iter()
            .find(|s| s.id == "md")
            .or_else(|| self.sizes.first())
            .map(|s| s.id.as_str())
    }

    /// Checks the tables are usable by the pricing engine.
    ///
    /// ## Rules
    /// - No table may be empty
    /// - Ids are unique within a table
    /// - Every multiplier and scale is finite and > 0
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_empty("materials", self.materials.len())?;
        non_empty("qualities", self.qualities.len())?;
        non_empty("sizes", self.sizes.len())?;
        non_empty("colors", self.colors.len())?;

        unique_ids("materials", self.materials.iter().map(|m| m.id.as_str()))?;
        unique_ids("qualities", self.qualities.iter().map(|q| q.id.as_str()))?;
        unique_ids("sizes", self.sizes.iter().map(|s| s.id.as_str()))?;
        unique_ids("colors", self.colors.iter().map(|c| c.id.as_str()))?;

        for m in &self.materials {
            positive(&format!("materials.{}.price_multiplier", m.id), m.price_multiplier)?;
        }
        for q in &self.qualities {
            positive(&format!("qualities.{}.price_multiplier", q.id), q.price_multiplier)?;
            positive(&format!("qualities.{}.time_multiplier", q.id), q.time_multiplier)?;
        }
        for s in &self.sizes {
            positive(&format!("sizes.{}.scale", s.id), s.scale)?;
            positive(&format!("sizes.{}.price_multiplier", s.id), s.price_multiplier)?;
        }

        Ok(())
    }
}

fn unknown(kind: OptionKind, id: &str) -> CoreError {
    CoreError::UnknownOption {
        kind,
        id: id.to_string(),
    }
}

fn non_empty(field: &str, len: usize) -> Result<(), ValidationError> {
    if len == 0 {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

fn unique_ids<'a>(
    field: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::Duplicate {
                field: field.to_string(),
                value: id.to_string(),
            });
        }
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
