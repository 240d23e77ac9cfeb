//! # Tiered Price Resolver
//!
//! Resolves the unit price for a requested quantity against a product's
//! tiered price schedule.
//!
//! ## Resolution Rule
//! Tiers are evaluated from highest `min_quantity` to lowest; the first band
//! whose range contains the quantity wins. If nothing matches (including an
//! empty schedule) the product's base price applies with no tier attached.
//!
//! Overlapping bands are not rejected: the descending sort means the band
//! with the highest `min_quantity` wins deterministically. Catalog authoring
//! is expected to keep ranges disjoint.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, TierPricing};

/// The outcome of resolving a price for one cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    /// Unit price in cents for the requested quantity.
    pub unit_price_cents: i64,

    /// The tier that applied, if any. None means base price.
    pub tier: Option<TierPricing>,
}

impl ResolvedPrice {
    /// Returns the resolved unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

/// Resolves the unit price for `quantity` units of `product`.
///
/// Side-effect free and total: every positive quantity resolves to a price.
/// Callers guarantee `quantity > 0`; the aggregator validates before calling.
///
/// ## Example
/// ```rust
/// use loomhub_core::pricing::resolve_price;
/// use loomhub_core::types::{Product, TierPricing};
///
/// let product = Product {
///     id: "p1".into(),
///     title: "Organic cotton tee".into(),
///     currency: "USD".into(),
///     price_cents: 1000,
///     moq: 50,
///     lead_time_days: 14,
///     tiered_pricing: vec![
///         TierPricing { min_quantity: 100, max_quantity: Some(499), price_per_unit_cents: 800 },
///         TierPricing { min_quantity: 500, max_quantity: None, price_per_unit_cents: 600 },
///     ],
/// };
///
/// assert_eq!(resolve_price(&product, 50).unit_price_cents, 1000);
/// assert_eq!(resolve_price(&product, 150).unit_price_cents, 800);
/// assert_eq!(resolve_price(&product, 1000).unit_price_cents, 600);
/// ```
pub fn resolve_price(product: &Product, quantity: i64) -> ResolvedPrice {
    let mut tiers: Vec<&TierPricing> = product.tiered_pricing.iter().collect();
    tiers.sort_by(|a, b| b.min_quantity.cmp(&a.min_quantity));

    for tier in tiers {
        if tier.contains(quantity) {
            return ResolvedPrice {
                unit_price_cents: tier.price_per_unit_cents,
                tier: Some(tier.clone()),
            };
        }
    }

    ResolvedPrice {
        unit_price_cents: product.price_cents,
        tier: None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
