//! # Cart Aggregator
//!
//! The cart itself: ordered line items plus derived totals.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Mutation Pipeline                               │
//! │                                                                         │
//! │  UI Action            Cart Operation          Derived State             │
//! │  ─────────            ──────────────          ─────────────             │
//! │                                                                         │
//! │  Add to cart ────────► add_item() ──────────► merge or append line     │
//! │                                                                         │
//! │  Change quantity ────► set_quantity() ──────► reprice one line         │
//! │                                                                         │
//! │  Remove line ────────► remove_item() ───────► drop line                │
//! │                                                                         │
//! │  Empty cart ─────────► clear() ─────────────► items = []               │
//! │                             │                                           │
//! │                             ▼                                           │
//! │          every mutation ends in recalculate():                          │
//! │          subtotal → tax (15%) → shipping → total → MOQ violations       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Line identity is (product_id, customization fingerprint); adding the
//!   same pair merges quantities instead of appending
//! - Quantity is always > 0; removal goes through `remove_item`
//! - Insertion order is display order; lines are never sorted
//! - One currency per cart, pinned by the first line added
//! - Totals and MOQ violations are recomputed in full on every mutation;
//!   a cart snapshot is always internally consistent

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CartError, CartResult};
use crate::money::Money;
use crate::pricing::resolve_price;
use crate::types::{CartKind, Customizations, Product, TierPricing};
use crate::validation::moq_violations;
use crate::{
    DEFAULT_CURRENCY, FLAT_SHIPPING_FEE_CENTS, FREE_SHIPPING_THRESHOLD_CENTS, MAX_CART_ITEMS,
    TAX_RATE,
};

// =============================================================================
// Cart Item
// =============================================================================

/// One line in a cart.
///
/// ## Design Notes
/// - `product_id`: reference to the catalog record
/// - `product`: frozen copy of the product at the time of the last add,
///   so the cart displays consistent data even if the catalog changes
/// - `unit_price_cents`: resolved by the tier schedule for the line's
///   current quantity, not simply the base price
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line id (UUID v4), stable across quantity changes.
    pub id: String,

    /// Product ID (UUID)
    pub product_id: String,

    /// Product snapshot at time of adding (frozen)
    pub product: Product,

    /// Quantity in cart, always > 0
    pub quantity: i64,

    /// Unit price in cents resolved for the current quantity
    pub unit_price_cents: i64,

    /// quantity × unit_price_cents
    pub subtotal_cents: i64,

    /// The tier band that priced this line, if any
    pub tier: Option<TierPricing>,

    /// Opaque customization bag, if any
    pub customizations: Option<Customizations>,

    /// Canonical fingerprint of the bag, computed once at insertion.
    /// Line-identity comparisons use this, never a deep compare.
    pub customizations_key: Option<String>,

    /// True when quantity is below the supplier's MOQ
    pub moq_warning: bool,

    /// Estimated delivery: last reprice time + product lead time
    #[ts(as = "String")]
    pub estimated_delivery: DateTime<Utc>,

    /// When this line was first added
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart line from a product and quantity.
    ///
    /// ## Price Resolution
    /// The unit price comes from the tier schedule for this quantity; the
    /// product snapshot is captured so later catalog edits don't reprice
    /// lines already in the cart.
    pub fn new(product: &Product, quantity: i64, customizations: Option<Customizations>) -> Self {
        let customizations_key = customizations.as_ref().map(Customizations::fingerprint);
        let mut item = CartItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product: product.clone(),
            quantity,
            unit_price_cents: 0,
            subtotal_cents: 0,
            tier: None,
            customizations,
            customizations_key,
            moq_warning: false,
            estimated_delivery: Utc::now(),
            added_at: Utc::now(),
        };
        item.reprice(quantity);
        item
    }

    /// Re-derives every quantity-dependent field for this line.
    ///
    /// Called on merge-adds and quantity updates. `added_at`, the line id,
    /// and the customization fingerprint are untouched.
    pub(crate) fn reprice(&mut self, quantity: i64) {
        let resolved = resolve_price(&self.product, quantity);
        self.quantity = quantity;
        self.unit_price_cents = resolved.unit_price_cents;
        self.subtotal_cents = resolved.unit_price_cents * quantity;
        self.tier = resolved.tier;
        self.moq_warning = quantity < self.product.moq;
        self.estimated_delivery = Utc::now() + Duration::days(self.product.lead_time_days);
    }

    /// Returns the resolved unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Checks whether an incoming add is "the same line" as this one.
    fn matches(&self, product_id: &str, customizations_key: &Option<String>) -> bool {
        self.product_id == product_id && &self.customizations_key == customizations_key
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A buyer's cart: one of the two independent slots (`main` / `sample`).
///
/// Derived fields (`subtotal_cents` through `moq_violations`) are recomputed
/// in full by every mutation, so a serialized cart is always a complete,
/// internally consistent snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart id (UUID v4).
    pub id: String,

    /// Owning user id, or "guest" for anonymous sessions.
    pub user_id: String,

    /// Which of the two slots this cart is.
    pub kind: CartKind,

    /// Currency code (ISO 4217); pinned by the first line added.
    pub currency: String,

    /// Lines in insertion order (= display order).
    pub items: Vec<CartItem>,

    /// Σ line subtotals.
    pub subtotal_cents: i64,

    /// subtotal × 15%.
    pub tax_cents: i64,

    /// Flat fee below the free-shipping threshold, 0 at or above it.
    pub shipping_cents: i64,

    /// subtotal + tax + shipping.
    pub total_cents: i64,

    /// Advisory MOQ shortfall messages, one per violating line, in line order.
    pub moq_violations: Vec<String>,

    /// When the cart was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the cart was last mutated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart for the given slot and owner.
    pub fn new(kind: CartKind, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Cart {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            kind,
            currency: DEFAULT_CURRENCY.to_string(),
            items: Vec::new(),
            subtotal_cents: 0,
            tax_cents: 0,
            shipping_cents: 0,
            total_cents: 0,
            moq_violations: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a product to the cart, merging into an existing line when the
    /// product and customization fingerprint both match.
    ///
    /// ## Behavior
    /// - Same (product_id, fingerprint): the existing line's quantity grows
    ///   and the line is repriced at the new total, with a fresh product
    ///   snapshot
    /// - Otherwise: a new line is appended at the end
    ///
    /// ## Errors
    /// - [`CartError::InvalidQuantity`] when quantity <= 0
    /// - [`CartError::CurrencyMismatch`] when the product's currency differs
    ///   from the cart's pinned currency
    /// - [`CartError::CartTooLarge`] when a new line would exceed the cap
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        customizations: Option<Customizations>,
    ) -> CartResult<()> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        if self.items.is_empty() {
            // First line pins the cart currency
            self.currency = product.currency.clone();
        } else if self.currency != product.currency {
            return Err(CartError::CurrencyMismatch {
                cart_currency: self.currency.clone(),
                product_currency: product.currency.clone(),
            });
        }

        let key = customizations.as_ref().map(Customizations::fingerprint);
        if let Some(line) = self.items.iter_mut().find(|i| i.matches(&product.id, &key)) {
            let new_quantity = line.quantity + quantity;
            line.product = product.clone();
            line.reprice(new_quantity);
            self.recalculate();
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CartError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::new(product, quantity, customizations));
        self.recalculate();
        Ok(())
    }

    /// Sets the quantity of one line, repricing it.
    ///
    /// ## Errors
    /// - [`CartError::InvalidQuantity`] when quantity <= 0; a line can never
    ///   reach zero through this path, use [`Cart::remove_item`]
    /// - [`CartError::ItemNotFound`] when no line carries `item_id`
    pub fn set_quantity(&mut self, item_id: &str, quantity: i64) -> CartResult<()> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        let line = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CartError::ItemNotFound {
                item_id: item_id.to_string(),
            })?;

        line.reprice(quantity);
        self.recalculate();
        Ok(())
    }

    /// Removes one line by id.
    ///
    /// ## Errors
    /// - [`CartError::ItemNotFound`] when no line carries `item_id`
    pub fn remove_item(&mut self, item_id: &str) -> CartResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != item_id);

        if self.items.len() == initial_len {
            return Err(CartError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        }

        self.recalculate();
        Ok(())
    }

    /// Empties the cart. Totals go to zero, violations to empty, and the
    /// currency pin resets.
    pub fn clear(&mut self) {
        self.items.clear();
        self.currency = DEFAULT_CURRENCY.to_string();
        self.recalculate();
    }

    /// Recomputes every cart-level derived field from the item list.
    ///
    /// Pure function of `items` (plus the clock for `updated_at`): running it
    /// twice on an unchanged list yields identical numbers.
    fn recalculate(&mut self) {
        let subtotal: Money = self.items.iter().map(CartItem::subtotal).sum();
        let tax = subtotal.calculate_tax(TAX_RATE);
        let shipping = if self.items.is_empty()
            || subtotal.cents() >= FREE_SHIPPING_THRESHOLD_CENTS
        {
            Money::zero()
        } else {
            Money::from_cents(FLAT_SHIPPING_FEE_CENTS)
        };

        self.subtotal_cents = subtotal.cents();
        self.tax_cents = tax.cents();
        self.shipping_cents = shipping.cents();
        self.total_cents = (subtotal + tax + shipping).cents();
        self.moq_violations = moq_violations(&self.items);
        self.updated_at = Utc::now();
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines (the cart badge count).
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub shipping_cents: i64,
    pub total_cents: i64,
    pub currency: String,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal_cents,
            tax_cents: cart.tax_cents,
            shipping_cents: cart.shipping_cents,
            total_cents: cart.total_cents,
            currency: cart.currency.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TierPricing;

    fn test_product(id: &str, price_cents: i64, moq: i64) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Fabric {}", id),
            currency: "USD".to_string(),
            price_cents,
            moq,
            lead_time_days: 14,
            tiered_pricing: Vec::new(),
        }
    }

    fn tiered_product(id: &str) -> Product {
        Product {
            tiered_pricing: vec![
                TierPricing {
                    min_quantity: 100,
                    max_quantity: Some(499),
                    price_per_unit_cents: 800,
                },
                TierPricing {
                    min_quantity: 500,
                    max_quantity: None,
                    price_per_unit_cents: 600,
                },
            ],
            ..test_product(id, 1000, 1)
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        let product = test_product("p1", 10_000, 10); // 100.00, moq 10

        cart.add_item(&product, 5, None).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.subtotal_cents, 50_000); // 500.00
        assert_eq!(
            cart.moq_violations,
            vec!["Fabric p1: Need 5 more units to meet MOQ of 10"]
        );
    }

    #[test]
    fn test_add_same_product_merges_line() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        let product = test_product("p1", 999, 1);

        cart.add_item(&product, 2, None).unwrap();
        cart.add_item(&product, 3, None).unwrap();

        assert_eq!(cart.item_count(), 1); // Still one line
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_differing_customizations_create_second_line() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        let product = test_product("p1", 999, 1);
        let indigo = Customizations::new().with("color", "indigo");
        let charcoal = Customizations::new().with("color", "charcoal");

        cart.add_item(&product, 2, Some(indigo.clone())).unwrap();
        cart.add_item(&product, 3, Some(charcoal)).unwrap();
        assert_eq!(cart.item_count(), 2);

        // Same bag again merges, key order notwithstanding
        cart.add_item(&product, 1, Some(indigo)).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.items[0].quantity, 3);
    }

    #[test]
    fn test_merge_reprices_at_new_total_quantity() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        let product = tiered_product("p1");

        cart.add_item(&product, 60, None).unwrap();
        assert_eq!(cart.items[0].unit_price_cents, 1000); // base price

        cart.add_item(&product, 60, None).unwrap();
        // 120 units now sits in the 100-499 band
        assert_eq!(cart.items[0].unit_price_cents, 800);
        assert_eq!(cart.items[0].subtotal_cents, 96_000);
        assert_eq!(cart.items[0].tier.as_ref().unwrap().min_quantity, 100);
    }

    #[test]
    fn test_set_quantity_reprices_and_clears_moq_warning() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        let product = test_product("p1", 10_000, 10);

        cart.add_item(&product, 5, None).unwrap();
        assert!(cart.items[0].moq_warning);

        let item_id = cart.items[0].id.clone();
        cart.set_quantity(&item_id, 10).unwrap();

        assert!(!cart.items[0].moq_warning);
        assert!(cart.moq_violations.is_empty());
        assert_eq!(cart.subtotal_cents, 100_000); // 1000.00
    }

    #[test]
    fn test_set_quantity_rejects_non_positive() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        let product = test_product("p1", 999, 1);
        cart.add_item(&product, 2, None).unwrap();
        let item_id = cart.items[0].id.clone();

        assert!(matches!(
            cart.set_quantity(&item_id, 0),
            Err(CartError::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            cart.set_quantity(&item_id, -4),
            Err(CartError::InvalidQuantity { .. })
        ));
        // Rejected mutation left the line alone
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_unknown_item_id_is_an_error() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");

        assert!(matches!(
            cart.remove_item("nope"),
            Err(CartError::ItemNotFound { .. })
        ));
        assert!(matches!(
            cart.set_quantity("nope", 3),
            Err(CartError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_currency_is_pinned_by_first_line() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        let mut eur_product = test_product("p1", 999, 1);
        eur_product.currency = "EUR".to_string();

        cart.add_item(&eur_product, 1, None).unwrap();
        assert_eq!(cart.currency, "EUR");

        let usd_product = test_product("p2", 999, 1);
        assert!(matches!(
            cart.add_item(&usd_product, 1, None),
            Err(CartError::CurrencyMismatch { .. })
        ));

        cart.clear();
        cart.add_item(&usd_product, 1, None).unwrap();
        assert_eq!(cart.currency, "USD");
    }

    #[test]
    fn test_shipping_threshold_boundary() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");

        // 9,999.99 subtotal pays the flat fee
        cart.add_item(&test_product("p1", 999_999, 1), 1, None).unwrap();
        assert_eq!(cart.shipping_cents, 50_000);

        // Exactly 10,000.00 ships free
        cart.clear();
        cart.add_item(&test_product("p2", 1_000_000, 1), 1, None).unwrap();
        assert_eq!(cart.shipping_cents, 0);
    }

    #[test]
    fn test_totals_at_checkout_rate() {
        // subtotal 12,000.00 → tax 1,800.00, free shipping, total 13,800.00
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        cart.add_item(&test_product("p1", 1_200_000, 1), 1, None).unwrap();

        assert_eq!(cart.subtotal_cents, 1_200_000);
        assert_eq!(cart.tax_cents, 180_000);
        assert_eq!(cart.shipping_cents, 0);
        assert_eq!(cart.total_cents, 1_380_000);
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        cart.add_item(&test_product("p1", 12_345, 7), 3, None).unwrap();

        let first = (
            cart.subtotal_cents,
            cart.tax_cents,
            cart.shipping_cents,
            cart.total_cents,
            cart.moq_violations.clone(),
        );
        cart.recalculate();
        let second = (
            cart.subtotal_cents,
            cart.tax_cents,
            cart.shipping_cents,
            cart.total_cents,
            cart.moq_violations.clone(),
        );

        assert_eq!(first, second);
    }

    #[test]
    fn test_clear_zeroes_everything() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        cart.add_item(&test_product("p1", 999_999, 3), 1, None).unwrap();
        assert!(cart.total_cents > 0);
        assert!(!cart.moq_violations.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal_cents, 0);
        assert_eq!(cart.tax_cents, 0);
        assert_eq!(cart.shipping_cents, 0); // no flat fee on an empty cart
        assert_eq!(cart.total_cents, 0);
        assert!(cart.moq_violations.is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        for i in 0..5 {
            cart.add_item(&test_product(&format!("p{}", i), 1000, 1), 1, None)
                .unwrap();
        }

        let ids: Vec<&str> = cart.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p0", "p1", "p2", "p3", "p4"]);
    }

    #[test]
    fn test_cart_line_cap() {
        let mut cart = Cart::new(CartKind::Main, "buyer-1");
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(&test_product(&format!("p{}", i), 100, 1), 1, None)
                .unwrap();
        }

        assert!(matches!(
            cart.add_item(&test_product("overflow", 100, 1), 1, None),
            Err(CartError::CartTooLarge { .. })
        ));
        // Merging into an existing line still works at the cap
        cart.add_item(&test_product("p0", 100, 1), 1, None).unwrap();
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_estimated_delivery_tracks_lead_time() {
        let mut cart = Cart::new(CartKind::Sample, "guest");
        let product = test_product("p1", 1000, 1);
        cart.add_item(&product, 1, None).unwrap();

        let expected = Utc::now() + Duration::days(product.lead_time_days);
        let delta = (cart.items[0].estimated_delivery - expected).num_seconds().abs();
        assert!(delta <= 1);
    }
}
