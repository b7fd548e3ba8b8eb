//! # Pricing Engine
//!
//! Derives the price and estimated print time of an order from a model's
//! base values and the customer's print options.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price = base_price                                                     │
//! │        × material.price × quality.price × size.price                   │
//! │        × supports (1.10 | 1.00)                                        │
//! │        × (1 + (infill − 20) / 100)                                     │
//! │        × quantity                              → round to whole units  │
//! │                                                                         │
//! │  time  = base_print_time                                                │
//! │        × quality.time × size.scale                                     │
//! │        × supports (1.15 | 1.00)                                        │
//! │        × (1 + (infill − 20) / 200)                                     │
//! │        × quantity                              → round to whole hours  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Infill moves time at half the rate it moves price.
//!
//! ## Purity
//! [`calculate`] has no error channel and no side effects. Out-of-range
//! inputs are clamped, not rejected, so the function is safe to call from
//! anywhere, not only behind the print options form.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{ColorOption, MaterialOption, OptionCatalog, QualityOption, SizeOption};
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::Model;
use crate::{
    BASELINE_INFILL, MAX_INFILL, MAX_QUANTITY, MIN_INFILL, MIN_QUANTITY,
    SUPPORTS_PRICE_MULTIPLIER, SUPPORTS_TIME_MULTIPLIER,
};

// =============================================================================
// Request / Options / Result
// =============================================================================

/// Print options as the storefront submits them: option ids plus the
/// numeric knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PrintRequest {
    pub material: String,
    pub color: String,
    pub quality: String,
    pub size: String,
    pub quantity: u32,
    /// Infill percentage.
    pub infill: u32,
    pub supports: bool,
}

/// The selection the print options page starts from.
impl Default for PrintRequest {
    fn default() -> Self {
        PrintRequest {
            material: "pla".to_string(),
            color: "white".to_string(),
            quality: "standard".to_string(),
            size: "md".to_string(),
            quantity: 1,
            infill: BASELINE_INFILL,
            supports: true,
        }
    }
}

/// A print request with every option id resolved to its catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrintOptions {
    pub material: MaterialOption,
    pub color: ColorOption,
    pub quality: QualityOption,
    pub size: SizeOption,
    pub quantity: u32,
    pub infill: u32,
    pub supports: bool,
}

/// Quoted price and duration for a print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricingResult {
    /// Total price, a whole number of currency units.
    pub total: Money,
    /// Estimated print time in whole hours.
    pub print_hours: u32,
}

// =============================================================================
// Pure Computation
// =============================================================================

fn clamp_quantity(quantity: u32) -> u32 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

fn clamp_infill(infill: u32) -> u32 {
    infill.clamp(MIN_INFILL, MAX_INFILL)
}

/// Negative, NaN and infinite factors collapse to zero.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Per-copy price multiplier for the given options.
pub fn price_multiplier(options: &PrintOptions) -> f64 {
    let infill = clamp_infill(options.infill) as f64;
    let supports = if options.supports {
        SUPPORTS_PRICE_MULTIPLIER
    } else {
        1.0
    };

    non_negative(options.material.price_multiplier)
        * non_negative(options.quality.price_multiplier)
        * non_negative(options.size.price_multiplier)
        * supports
        * (1.0 + (infill - BASELINE_INFILL as f64) / 100.0)
}

/// Per-copy print-time multiplier for the given options.
pub fn time_multiplier(options: &PrintOptions) -> f64 {
    let infill = clamp_infill(options.infill) as f64;
    let supports = if options.supports {
        SUPPORTS_TIME_MULTIPLIER
    } else {
        1.0
    };

    non_negative(options.quality.time_multiplier)
        * non_negative(options.size.scale)
        * supports
        * (1.0 + (infill - BASELINE_INFILL as f64) / 200.0)
}

/// Computes the quote for `base_price` / `base_print_time` under `options`.
///
/// Quantity is clamped to 1-100 and infill to 10-100. Non-positive or
/// non-finite base values quote as zero; totals too large to represent
/// saturate instead of wrapping.
///
/// ## Example
/// ```rust
/// use innoprint_core::catalog::OptionCatalog;
/// use innoprint_core::pricing::{calculate, PrintRequest};
///
/// let catalog = OptionCatalog::default();
/// let request = PrintRequest {
///     quality: "high".to_string(),
///     size: "lg".to_string(),
///     quantity: 2,
///     infill: 50,
///     supports: true,
///     ..PrintRequest::default()
/// };
/// let options = catalog.resolve(&request).unwrap();
///
/// let result = calculate(800.0, 8.0, &options);
/// assert_eq!(result.total.major(), 4462);
/// assert_eq!(result.print_hours, 40);
/// ```
pub fn calculate(base_price: f64, base_print_time: f64, options: &PrintOptions) -> PricingResult {
    let quantity = clamp_quantity(options.quantity) as f64;

    let price = non_negative(base_price) * price_multiplier(options) * quantity;
    let hours = non_negative(base_print_time) * time_multiplier(options) * quantity;

    PricingResult {
        total: Money::from_major(price.round() as i64),
        print_hours: hours.round() as u32,
    }
}

// =============================================================================
// Resolution
// =============================================================================

impl OptionCatalog {
    /// Resolves every option id in `request` against this catalog.
    ///
    /// Quantity and infill are copied through clamped.
    pub fn resolve(&self, request: &PrintRequest) -> CoreResult<PrintOptions> {
        Ok(PrintOptions {
            material: self.material(&request.material)?.clone(),
            color: self.color(&request.color)?.clone(),
            quality: self.quality(&request.quality)?.clone(),
            size: self.size(&request.size)?.clone(),
            quantity: clamp_quantity(request.quantity),
            infill: clamp_infill(request.infill),
            supports: request.supports,
        })
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The pricing engine bound to one option catalog.
///
/// ## Example
/// ```rust
/// use innoprint_core::catalog::OptionCatalog;
/// use innoprint_core::pricing::{PricingEngine, PrintRequest};
///
/// let engine = PricingEngine::new(OptionCatalog::default());
/// let request = PrintRequest { material: "resin".to_string(), supports: false, ..Default::default() };
/// assert_eq!(engine.quote_base(600.0, 6.0, &request).unwrap().total.major(), 1200);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    catalog: OptionCatalog,
}

impl PricingEngine {
    pub fn new(catalog: OptionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &OptionCatalog {
        &self.catalog
    }

    /// Resolves `request` against the engine's catalog.
    pub fn resolve(&self, request: &PrintRequest) -> CoreResult<PrintOptions> {
        self.catalog.resolve(request)
    }

    /// Quotes a print of `model`.
    pub fn quote(&self, model: &Model, request: &PrintRequest) -> CoreResult<PricingResult> {
        self.quote_base(model.base_price, model.base_print_time, request)
    }

    /// Quotes from raw base values, for models not yet stored.
    pub fn quote_base(
        &self,
        base_price: f64,
        base_print_time: f64,
        request: &PrintRequest,
    ) -> CoreResult<PricingResult> {
        let options = self.resolve(request)?;
        Ok(calculate(base_price, base_print_time, &options))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn options(request: PrintRequest) -> PrintOptions {
        OptionCatalog::default().resolve(&request).unwrap()
    }

    fn plain() -> PrintRequest {
        PrintRequest {
            supports: false,
            ..PrintRequest::default()
        }
    }

    #[test]
    fn test_baseline_scenario() {
        let result = calculate(800.0, 8.0, &options(plain()));
        assert_eq!(result.total, Money::from_major(800));
        assert_eq!(result.print_hours, 8);
    }

    #[test]
    fn test_high_large_scenario() {
        let request = PrintRequest {
            quality: "high".to_string(),
            size: "lg".to_string(),
            quantity: 2,
            infill: 50,
            supports: true,
            ..PrintRequest::default()
        };
        let result = calculate(800.0, 8.0, &options(request));
        assert_eq!(result.total.major(), 4462);
        assert_eq!(result.total.minor_part(), 0);
        assert_eq!(result.print_hours, 40);
    }

    #[test]
    fn test_baseline_is_product_of_table_multipliers() {
        let catalog = OptionCatalog::default();
        for m in &catalog.materials {
            for q in &catalog.qualities {
                for s in &catalog.sizes {
                    let request = PrintRequest {
                        material: m.id.clone(),
                        quality: q.id.clone(),
                        size: s.id.clone(),
                        ..plain()
                    };
                    let result = calculate(1200.0, 12.0, &catalog.resolve(&request).unwrap());
                    let price =
                        (1200.0 * (m.price_multiplier * q.price_multiplier * s.price_multiplier))
                            .round();
                    let time = (12.0 * (q.time_multiplier * s.scale)).round();
                    assert_eq!(result.total.major(), price as i64);
                    assert_eq!(result.print_hours, time as u32);
                }
            }
        }
    }

    #[test]
    fn test_quantity_scales_linearly() {
        let one = options(plain());
        let five = options(PrintRequest {
            quantity: 5,
            ..plain()
        });

        let single = calculate(100.0, 3.0, &one);
        let batch = calculate(100.0, 3.0, &five);
        assert_eq!(batch.total, single.total * 5);
        assert_eq!(batch.print_hours, single.print_hours * 5);
    }

    #[test]
    fn test_infill_monotonic_above_baseline() {
        let mut previous = calculate(800.0, 8.0, &options(plain()));
        for infill in (25..=100).step_by(5) {
            let current = calculate(
                800.0,
                8.0,
                &options(PrintRequest {
                    infill,
                    ..plain()
                }),
            );
            assert!(current.total >= previous.total);
            assert!(current.print_hours >= previous.print_hours);
            previous = current;
        }
    }

    #[test]
    fn test_supports_increase_price_and_time() {
        let without = options(plain());
        let with = options(PrintRequest {
            supports: true,
            ..plain()
        });

        assert!((price_multiplier(&with) / price_multiplier(&without) - 1.10).abs() < 1e-9);
        assert!((time_multiplier(&with) / time_multiplier(&without) - 1.15).abs() < 1e-9);

        let a = calculate(1000.0, 20.0, &without);
        let b = calculate(1000.0, 20.0, &with);
        assert!(b.total > a.total);
        assert!(b.print_hours > a.print_hours);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let mut opts = options(plain());
        opts.quantity = 0;
        opts.infill = 0;
        let low = calculate(800.0, 8.0, &opts);
        // quantity 1, infill 10: 800 × 0.9 = 720
        assert_eq!(low.total.major(), 720);

        opts.quantity = 500;
        opts.infill = 250;
        let high = calculate(1.0, 1.0, &opts);
        // quantity 100, infill 100: 1 × 1.8 × 100 = 180
        assert_eq!(high.total.major(), 180);
    }

    #[test]
    fn test_invalid_base_values_quote_zero() {
        let opts = options(plain());
        let result = calculate(-50.0, f64::NAN, &opts);
        assert!(result.total.is_zero());
        assert_eq!(result.print_hours, 0);
    }

    #[test]
    fn test_huge_base_values_saturate() {
        let result = calculate(1.0e17, 1.0e12, &options(PrintRequest::default()));
        assert_eq!(result.total.minor_units(), i64::MAX);
        assert_eq!(result.print_hours, u32::MAX);

        let summary = crate::checkout::CheckoutSummary::new(
            &result,
            Money::from_major(100),
            crate::types::TaxRate::from_bps(1800),
        );
        assert!(!summary.total.is_negative());
    }

    #[test]
    fn test_engine_rejects_unknown_option() {
        let engine = PricingEngine::default();
        let request = PrintRequest {
            quality: "photo".to_string(),
            ..PrintRequest::default()
        };
        assert!(engine.quote_base(800.0, 8.0, &request).is_err());
    }

    #[test]
    fn test_engine_with_custom_catalog() {
        let mut catalog = OptionCatalog::default();
        catalog.materials[0].price_multiplier = 3.0;
        let engine = PricingEngine::new(catalog);

        let result = engine.quote_base(100.0, 1.0, &plain()).unwrap();
        assert_eq!(result.total.major(), 300);
    }

    #[test]
    fn test_quote_is_deterministic() {
        let engine = PricingEngine::default();
        let request = PrintRequest::default();
        let a = engine.quote_base(1200.0, 12.0, &request).unwrap();
        let b = engine.quote_base(1200.0, 12.0, &request).unwrap();
        assert_eq!(a, b);
    }
}
