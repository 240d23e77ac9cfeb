//! # Store Error Types
//!
//! Errors crossing the CartStore boundary.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CartError (loomhub-core)        StorageError (storage.rs)             │
//! │       │                               │                                 │
//! │       └───────────┬───────────────────┘                                 │
//! │                   ▼                                                     │
//! │             StoreError (this module)                                    │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │             Frontend displays user-friendly message                     │
//! │                                                                         │
//! │  Note: write-through persistence failures never reach here; they are    │
//! │  logged and swallowed so the in-memory cart stays usable. Only an       │
//! │  explicit flush() surfaces StorageError to the caller.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use loomhub_core::CartError;

use crate::storage::StorageError;

/// Errors returned from CartStore operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cart rejected the mutation; nothing changed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// The snapshot store failed on an explicit flush.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for CartStore operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_message_passes_through() {
        let err: StoreError = CartError::InvalidQuantity { quantity: 0 }.into();
        assert_eq!(err.to_string(), "Cart error: Quantity must be positive, got 0");
    }
}
