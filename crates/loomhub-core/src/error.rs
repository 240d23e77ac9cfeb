//! # Error Types
//!
//! Domain-specific error types for loomhub-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  loomhub-core errors (this file)                                        │
//! │  ├── CartError        - Cart mutation failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  loomhub-store errors (separate crate)                                  │
//! │  ├── StorageError     - Snapshot store failures                        │
//! │  └── StoreError       - What the UI layer sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → StoreError → Frontend             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (item id, quantity, currency)
//! 3. Errors are enum variants, never String
//! 4. Rejected mutations leave the cart untouched
//!
//! A silently dropped mutation is indistinguishable from an applied one;
//! these types exist so a caller can tell "nothing happened because the
//! input was invalid" apart from "mutation applied".

use thiserror::Error;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart mutation errors.
///
/// Every variant means the mutation was rejected and the cart is unchanged.
/// MOQ shortfalls are NOT errors; they are advisory strings on the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be a positive integer.
    ///
    /// ## When This Occurs
    /// - `add_item` or `set_quantity` called with quantity <= 0
    /// - Removal must go through `remove_item`, never quantity 0
    #[error("Quantity must be positive, got {quantity}")]
    InvalidQuantity { quantity: i64 },

    /// No cart line carries this id.
    ///
    /// ## When This Occurs
    /// - `remove_item` / `set_quantity` with a stale line id
    /// - UI raced a clear() against a row-level action
    #[error("Cart item not found: {item_id}")]
    ItemNotFound { item_id: String },

    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Product currency differs from the currency the cart is pinned to.
    ///
    /// ## When This Occurs
    /// The first item added pins the cart currency; every cart holds exactly
    /// one currency. Clearing the cart resets the pin.
    #[error("Cart is priced in {cart_currency}, product is priced in {product_currency}")]
    CurrencyMismatch {
        cart_currency: String,
        product_currency: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller-supplied values do not meet requirements.
/// Used for early validation before cart logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::InvalidQuantity { quantity: -3 };
        assert_eq!(err.to_string(), "Quantity must be positive, got -3");

        let err = CartError::CurrencyMismatch {
            cart_currency: "USD".to_string(),
            product_currency: "EUR".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cart is priced in USD, product is priced in EUR"
        );
    }

    #[test]
    fn test_validation_converts_to_cart_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let cart_err: CartError = validation_err.into();
        assert!(matches!(cart_err, CartError::Validation(_)));
    }
}
