//! # Checkout
//!
//! Turns a pricing quote into what the payment page shows and what the
//! payment widget is handed.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  PricingResult.total ──► CheckoutSummary                                │
//! │                            subtotal = total                             │
//! │                            shipping = flat fee                          │
//! │                            tax      = round(subtotal × rate)            │
//! │                            total    = subtotal + shipping + tax         │
//! │                                                                         │
//! │  PricingResult.total ──► PaymentRequest                                 │
//! │                            amount_minor = total × 100                   │
//! │                            currency, order_reference                    │
//! │                                                                         │
//! │  payment id from widget ──► OrderConfirmation                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payment widget itself is outside this crate. Nothing here performs
//! I/O; order references are derived from a caller-supplied random value.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::pricing::{PricingResult, PrintOptions};
use crate::types::{Address, Model, TaxRate};

/// Prefix of every order reference.
pub const ORDER_REFERENCE_PREFIX: &str = "ORD";

/// Number of digits following the prefix.
pub const ORDER_REFERENCE_DIGITS: usize = 9;

/// Days between order and the delivery estimate shown on confirmation.
pub const DELIVERY_ESTIMATE_DAYS: i64 = 7;

// =============================================================================
// Checkout Summary
// =============================================================================

/// Price breakdown shown on the payment page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax_rate: TaxRate,
    /// Tax on the subtotal, rounded to whole currency units.
    pub tax: Money,
    pub total: Money,
}

impl CheckoutSummary {
    /// Builds the breakdown for a quote.
    ///
    /// Tax applies to the print subtotal only, never to shipping.
    ///
    /// ## Example
    /// ```rust
    /// use innoprint_core::checkout::CheckoutSummary;
    /// use innoprint_core::money::Money;
    /// use innoprint_core::pricing::PricingResult;
    /// use innoprint_core::types::TaxRate;
    ///
    /// let quote = PricingResult { total: Money::from_major(800), print_hours: 8 };
    /// let summary = CheckoutSummary::new(&quote, Money::from_major(100), TaxRate::from_bps(1800));
    /// assert_eq!(summary.tax.major(), 144);
    /// assert_eq!(summary.total.major(), 1044);
    /// ```
    pub fn new(quote: &PricingResult, shipping: Money, tax_rate: TaxRate) -> Self {
        let subtotal = quote.total;
        let tax = subtotal.calculate_tax(tax_rate).round_to_major();

        CheckoutSummary {
            subtotal,
            shipping,
            tax_rate,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

// =============================================================================
// Payment Hand-off
// =============================================================================

/// What the external payment widget receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentRequest {
    pub order_reference: String,
    /// Amount in minor units (paise).
    pub amount_minor: i64,
    /// ISO 4217 code, e.g. "INR".
    pub currency: String,
    pub store_name: String,
    pub description: String,
    pub prefill_email: Option<String>,
}

impl PaymentRequest {
    /// Prepares the widget payload for printing `model` at `quote`.
    ///
    /// The amount is the quote total, as the widget is configured for it.
    pub fn new(
        model: &Model,
        quote: &PricingResult,
        currency: impl Into<String>,
        store_name: impl Into<String>,
        order_reference: String,
        prefill_email: Option<String>,
    ) -> Self {
        PaymentRequest {
            order_reference,
            amount_minor: quote.total.minor_units(),
            currency: currency.into(),
            store_name: store_name.into(),
            description: format!("3D print of {}", model.title),
            prefill_email,
        }
    }
}

/// Formats an order reference from a random value: `ORD` + 9 digits.
///
/// ## Example
/// ```rust
/// use innoprint_core::checkout::order_reference;
///
/// assert_eq!(order_reference(42), "ORD000000042");
/// assert_eq!(order_reference(12_345_678_901), "ORD345678901");
/// ```
pub fn order_reference(random: u128) -> String {
    let modulus = 10u128.pow(ORDER_REFERENCE_DIGITS as u32);
    format!(
        "{}{:0width$}",
        ORDER_REFERENCE_PREFIX,
        random % modulus,
        width = ORDER_REFERENCE_DIGITS
    )
}

/// Checks the shape of an order reference.
pub fn is_order_reference(value: &str) -> bool {
    value
        .strip_prefix(ORDER_REFERENCE_PREFIX)
        .map(|digits| {
            digits.len() == ORDER_REFERENCE_DIGITS && digits.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap_or(false)
}

// =============================================================================
// Order Confirmation
// =============================================================================

/// Record of a paid order, as shown on the confirmation page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderConfirmation {
    pub order_reference: String,
    /// Payment id reported by the payment widget.
    pub payment_id: String,
    pub model_id: String,
    pub model_title: String,
    pub options: PrintOptions,
    pub quote: PricingResult,
    pub summary: CheckoutSummary,
    pub shipping_address: Address,
    #[ts(as = "String")]
    pub ordered_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub estimated_delivery: DateTime<Utc>,
}

impl OrderConfirmation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        order_reference: String,
        payment_id: String,
        model: &Model,
        options: PrintOptions,
        quote: PricingResult,
        summary: CheckoutSummary,
        shipping_address: Address,
        ordered_at: DateTime<Utc>,
    ) -> Self {
        OrderConfirmation {
            order_reference,
            payment_id,
            model_id: model.id.clone(),
            model_title: model.title.clone(),
            options,
            quote,
            summary,
            shipping_address,
            ordered_at,
            estimated_delivery: ordered_at + Duration::days(DELIVERY_ESTIMATE_DAYS),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
