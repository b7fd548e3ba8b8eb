//! # Pricing Commands
//!
//! The print options page: option tables and live quotes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Material [PLA ▾]  Quality [High ▾]  Size [Large ▾]                    │
//! │  Quantity [2]      Infill [50%]      Supports [✓]                      │
//! │                                                                         │
//! │  quote_print(model_id, request)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Price: ₹4462        Estimated print time: 40 Hrs                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use innoprint_core::catalog::OptionCatalog;
use innoprint_core::pricing::{calculate, PricingEngine, PricingResult, PrintOptions, PrintRequest};
use innoprint_core::validation::{validate_infill, validate_quantity};
use innoprint_db::Database;

use super::catalogue::get_model;
use crate::error::ApiResult;

/// A quote for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintQuote {
    pub model_id: String,
    pub model_title: String,
    pub options: PrintOptions,
    pub quote: PricingResult,
}

/// Option tables for the print options form, plus its starting selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOptionsResponse {
    pub catalog: OptionCatalog,
    pub defaults: PrintRequest,
}

/// Returns the option tables the pricing engine was configured with.
pub fn get_print_options(pricing: &PricingEngine) -> PrintOptionsResponse {
    let catalog = pricing.catalog().clone();
    let mut defaults = PrintRequest::default();

    // Fall back to the first entry when a configured catalog lacks the
    // usual defaults.
    if catalog.material(&defaults.material).is_err() {
        if let Some(id) = catalog.default_material_id() {
            defaults.material = id.to_string();
        }
    }
    if catalog.color(&defaults.color).is_err() {
        if let Some(id) = catalog.default_color_id() {
            defaults.color = id.to_string();
        }
    }
    if let Some(id) = catalog.default_quality_id() {
        defaults.quality = id.to_string();
    }
    if let Some(id) = catalog.default_size_id() {
        defaults.size = id.to_string();
    }

    PrintOptionsResponse { catalog, defaults }
}

/// Rejects quantities and infill the form does not offer. The engine would
/// clamp them; the customer should see the problem instead.
pub(crate) fn check_request(request: &PrintRequest) -> ApiResult<()> {
    validate_quantity(request.quantity)?;
    validate_infill(request.infill)?;
    Ok(())
}

/// Prices `request` for the model `model_id`.
///
/// ## Errors
/// - `NOT_FOUND` when the model does not exist
/// - `VALIDATION_ERROR` when an option id is not in the catalog, or
///   quantity/infill are outside 1-100 / 10-100
pub async fn quote_print(
    db: &Database,
    pricing: &PricingEngine,
    model_id: &str,
    request: &PrintRequest,
) -> ApiResult<PrintQuote> {
    debug!(model_id = %model_id, ?request, "quote_print command");
    check_request(request)?;

    let model = get_model(db, model_id).await?;
    let options = pricing.resolve(request)?;
    let quote = calculate(model.base_price, model.base_print_time, &options);

    Ok(PrintQuote {
        model_id: model.id,
        model_title: model.title,
        options,
        quote,
    })
}
