//! # Validation Module
//!
//! Input validation utilities for Innoprint.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront (TypeScript)                                      │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: App command (Rust)                                           │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Partial UNIQUE index on the default address                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Address forms never reach the address store unless they pass
//! [`validate_address`].
//!
//! ## Usage
//! ```rust
//! use innoprint_core::validation::{validate_zip_code, validate_quantity};
//!
//! assert!(validate_zip_code("560001").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::NewAddress;
use crate::{MAX_INFILL, MAX_QUANTITY, MIN_INFILL, MIN_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest value accepted for any single address line.
pub const MAX_ADDRESS_FIELD_LEN: usize = 200;

/// Length of an Indian PIN code.
pub const ZIP_CODE_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a postal code.
///
/// ## Rules
/// - Must not be empty
/// - Exactly six ASCII digits after trimming
///
/// ## Example
/// ```rust
/// use innoprint_core::validation::validate_zip_code;
///
/// assert!(validate_zip_code("110001").is_ok());
/// assert!(validate_zip_code("1100").is_err());
/// assert!(validate_zip_code("11000A").is_err());
/// ```
pub fn validate_zip_code(zip: &str) -> ValidationResult<()> {
    let zip = zip.trim();

    if zip.is_empty() {
        return Err(ValidationError::required("zip_code"));
    }

    if zip.len() != ZIP_CODE_LEN || !zip.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "zip_code".to_string(),
            reason: format!("must be {} digits", ZIP_CODE_LEN),
        });
    }

    Ok(())
}

/// Collects every problem with an address form, in field order.
///
/// ## Rules
/// - name, line1, city, state, country: required, at most 200 chars
/// - line2: optional, at most 200 chars
/// - zip_code: see [`validate_zip_code`]
///
/// An empty result means the form is valid.
fn address_errors(form: &NewAddress) -> Vec<ValidationError> {
    let checks = [
        required_text("name", &form.name, MAX_ADDRESS_FIELD_LEN),
        required_text("line1", &form.line1, MAX_ADDRESS_FIELD_LEN),
        validate_optional_line("line2", form.line2.as_deref()),
        required_text("city", &form.city, MAX_ADDRESS_FIELD_LEN),
        required_text("state", &form.state, MAX_ADDRESS_FIELD_LEN),
        validate_zip_code(&form.zip_code),
        required_text("country", &form.country, MAX_ADDRESS_FIELD_LEN),
    ];

    checks.into_iter().filter_map(Result::err).collect()
}

/// Validates an address form, returning the first problem found.
pub fn validate_address(form: &NewAddress) -> ValidationResult<()> {
    match address_errors(form).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn validate_optional_line(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if v.trim().chars().count() > MAX_ADDRESS_FIELD_LEN => {
            Err(ValidationError::TooLong {
                field: field.to_string(),
                max: MAX_ADDRESS_FIELD_LEN,
            })
        }
        _ => Ok(()),
    }
}

/// Validates a model title.
pub fn validate_title(title: &str) -> ValidationResult<()> {
    required_text("title", title, 120)
}

/// Validates a model description.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    required_text("description", description, 5000)
}

/// Validates a catalogue search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a print quantity (1-100).
///
/// The pricing engine clamps quantity on its own. This check is for forms
/// that want to tell the customer instead of silently clamping.
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_QUANTITY as i64,
            max: MAX_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates an infill percentage (10-100).
pub fn validate_infill(infill: u32) -> ValidationResult<()> {
    if !(MIN_INFILL..=MAX_INFILL).contains(&infill) {
        return Err(ValidationError::OutOfRange {
            field: "infill".to_string(),
            min: MIN_INFILL as i64,
            max: MAX_INFILL as i64,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> NewAddress {
        NewAddress {
            name: "Asha Rao".to_string(),
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            zip_code: "560001".to_string(),
            country: "India".to_string(),
            is_default: false,
        }
    }

    #[test]
    fn test_validate_zip_code() {
        assert!(validate_zip_code("560001").is_ok());
        assert!(validate_zip_code(" 560001 ").is_ok());

        assert!(matches!(
            validate_zip_code(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_zip_code("56000"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_zip_code("5600011").is_err());
        assert!(validate_zip_code("56 001").is_err());
        assert!(validate_zip_code("٥٦٠٠٠١").is_err());
    }

    #[test]
    fn test_valid_address() {
        assert!(validate_address(&form()).is_ok());
        assert!(address_errors(&form()).is_empty());
    }

    #[test]
    fn test_address_collects_every_error() {
        let bad = NewAddress {
            name: "  ".to_string(),
            city: String::new(),
            zip_code: "12".to_string(),
            ..form()
        };

        let errors = address_errors(&bad);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].to_string(), "name is required");
        assert_eq!(errors[1].to_string(), "city is required");
        assert!(matches!(errors[2], ValidationError::InvalidFormat { .. }));

        let first = validate_address(&bad).unwrap_err();
        assert_eq!(first.to_string(), "name is required");
    }

    #[test]
    fn test_address_line2_optional_but_bounded() {
        let with_line2 = NewAddress {
            line2: Some("Flat 4B".to_string()),
            ..form()
        };
        assert!(validate_address(&with_line2).is_ok());

        let too_long = NewAddress {
            line2: Some("x".repeat(MAX_ADDRESS_FIELD_LEN + 1)),
            ..form()
        };
        assert!(matches!(
            validate_address(&too_long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_quantity_and_infill() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(101).is_err());

        assert!(validate_infill(10).is_ok());
        assert!(validate_infill(100).is_ok());
        assert!(validate_infill(9).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  skull ").unwrap(), "skull");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(1800).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }
}
