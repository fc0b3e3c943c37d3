//! # Error Types
//!
//! Domain-specific error types for procura-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  procura-core errors (this file)                                       │
//! │  ├── CoreError        - Cart/pricing rule violations                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  procura-db errors (separate crate)                                    │
//! │  └── DbError          - Storage collaborator failures                  │
//! │                                                                         │
//! │  procura-checkout errors (separate crate)                              │
//! │  └── CheckoutError    - Pipeline failures (NoIdentity, Persistence…)   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → caller            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, ID, quantity)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A quantity that is zero or negative reached the pricing engine.
    ///
    /// The cart aggregate never produces such lines; this guards surfaces
    /// that build lines directly (quick-order rows).
    #[error("Invalid quantity: {requested}")]
    InvalidQuantity { requested: i64 },

    /// A quantity edit or remove referenced a product with no cart line.
    #[error("Product not in cart: {product_id}")]
    NotInCart { product_id: String },

    /// Cart has reached its maximum number of distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the per-line cap.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity { requested: -2 };
        assert_eq!(err.to_string(), "Invalid quantity: -2");

        let err = CoreError::NotInCart {
            product_id: "p-123".to_string(),
        };
        assert_eq!(err.to_string(), "Product not in cart: p-123");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
