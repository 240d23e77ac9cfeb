//! # Validation Module
//!
//! MOQ validation and input validation for the cart engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty fields, number inputs)                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: CartStore boundary (Rust)                                    │
//! │  └── THIS MODULE: catalog record sanity + argument validation          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart aggregator                                              │
//! │  └── Mutation-level rules (quantity, currency pin, line cap)           │
//! │                                                                         │
//! │  MOQ is different: a shortfall is ADVISORY. It never blocks a          │
//! │  mutation; it surfaces as strings the UI shows at checkout.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::cart::CartItem;
use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// MOQ Validator
// =============================================================================

/// Builds the advisory MOQ shortfall messages for a list of cart lines.
///
/// Pure function, no side effects. One message per violating line, in line
/// order; lines at or above their product's MOQ produce nothing.
///
/// ## Message Format
/// `"<title>: Need <moq - quantity> more units to meet MOQ of <moq>"`
///
/// The UI shows these verbatim at checkout, so the wording is part of the
/// contract with the frontend.
///
/// ## Example
/// ```rust
/// use loomhub_core::cart::CartItem;
/// use loomhub_core::types::Product;
/// use loomhub_core::validation::moq_violations;
///
/// let product = Product {
///     id: "p1".into(),
///     title: "Slub jersey".into(),
///     currency: "USD".into(),
///     price_cents: 450,
///     moq: 20,
///     lead_time_days: 10,
///     tiered_pricing: vec![],
/// };
/// let items = vec![CartItem::new(&product, 5, None)];
///
/// assert_eq!(
///     moq_violations(&items),
///     vec!["Slub jersey: Need 15 more units to meet MOQ of 20"]
/// );
/// ```
pub fn moq_violations(items: &[CartItem]) -> Vec<String> {
    items
        .iter()
        .filter(|item| item.quantity < item.product.moq)
        .map(|item| {
            format!(
                "{}: Need {} more units to meet MOQ of {}",
                item.product.title,
                item.product.moq - item.quantity,
                item.product.moq
            )
        })
        .collect()
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates a catalog record before it enters a cart.
///
/// ## Rules
/// - Title must not be empty (it appears verbatim in MOQ messages)
/// - Currency must look like an ISO 4217 code (three ASCII uppercase letters)
/// - Base price must be non-negative (zero is allowed for sample SKUs)
/// - MOQ must be positive
/// - Lead time must be non-negative
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    validate_currency_code(&product.currency)?;

    if product.price_cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    if product.moq <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "moq".to_string(),
        });
    }

    if product.lead_time_days < 0 {
        return Err(ValidationError::OutOfRange {
            field: "lead_time_days".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a currency code (ISO 4217: three ASCII uppercase letters).
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must be a three-letter ISO 4217 code".to_string(),
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

    fn product(title: &str, moq: i64) -> Product {
        Product {
            id: "p1".to_string(),
            title: title.to_string(),
            currency: "USD".to_string(),
            price_cents: 450,
            moq,
            lead_time_days: 10,
            tiered_pricing: Vec::new(),
        }
    }

    #[test]
    fn test_moq_shortfall_message() {
        let items = vec![CartItem::new(&product("Slub jersey", 20), 5, None)];

        let violations = moq_violations(&items);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0],
            "Slub jersey: Need 15 more units to meet MOQ of 20"
        );
    }

    #[test]
    fn test_meeting_moq_produces_no_message() {
        let items = vec![
            CartItem::new(&product("Slub jersey", 20), 20, None),
            CartItem::new(&product("Rib knit", 20), 50, None),
        ];

        assert!(moq_violations(&items).is_empty());
    }

    #[test]
    fn test_messages_follow_line_order() {
        let items = vec![
            CartItem::new(&product("Rib knit", 30), 10, None),
            CartItem::new(&product("Slub jersey", 20), 20, None),
            CartItem::new(&product("French terry", 40), 12, None),
        ];

        let violations = moq_violations(&items);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].starts_with("Rib knit:"));
        assert!(violations[1].starts_with("French terry:"));
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product("Slub jersey", 20)).is_ok());

        assert!(validate_product(&product("", 20)).is_err());
        assert!(validate_product(&product("   ", 20)).is_err());
        assert!(validate_product(&product("Slub jersey", 0)).is_err());

        let mut bad_price = product("Slub jersey", 20);
        bad_price.price_cents = -1;
        assert!(validate_product(&bad_price).is_err());

        let mut bad_lead = product("Slub jersey", 20);
        bad_lead.lead_time_days = -7;
        assert!(validate_product(&bad_lead).is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("USD").is_ok());
        assert!(validate_currency_code("EUR").is_ok());

        assert!(validate_currency_code("usd").is_err());
        assert!(validate_currency_code("US").is_err());
        assert!(validate_currency_code("DOLLAR").is_err());
        assert!(validate_currency_code("U$D").is_err());
    }
}
