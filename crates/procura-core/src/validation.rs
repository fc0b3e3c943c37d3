//! # Validation Module
//!
//! Input validation for values crossing into the core from user surfaces
//! (quick-order SKU fields, quantity steppers). Storage-level constraints
//! (NOT NULL, UNIQUE) remain the backend's job; this is the early layer
//! that gives immediate feedback.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 50 characters
///
/// ## Example
/// ```rust
/// use procura_core::validation::validate_sku;
///
/// assert!(validate_sku("CPP-A4-250").is_ok());
/// assert!(validate_sku("   ").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    Ok(())
}

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed the per-line cap
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 1 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > crate::MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: crate::MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}
