//! # loomhub-core: Pure Business Logic for the Loomhub Cart Engine
//!
//! This crate is the **heart** of the Loomhub cart. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Loomhub Cart Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Marketplace Frontend                            │   │
//! │  │    Catalog UI ──► Cart UI ──► Checkout UI ──► RFQ flow          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              loomhub-store (CartStore)                          │   │
//! │  │    add_item, set_quantity, remove_item, clear per cart slot     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ loomhub-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │   cart    │  │ validation│  │   │
//! │  │   │  Product  │  │  resolve  │  │   Cart    │  │    MOQ    │  │   │
//! │  │   │  TierPrc  │  │  _price   │  │ CartItem  │  │  messages │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, TierPricing, CartKind, Customizations)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Tiered price resolver
//! - [`cart`] - Cart aggregator (lines, totals, derived state)
//! - [`validation`] - MOQ messages and input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Storage, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: Rejected mutations return typed errors, never silent no-ops
//!
//! ## Example Usage
//!
//! ```rust
//! use loomhub_core::cart::Cart;
//! use loomhub_core::types::{CartKind, Product};
//!
//! let product = Product {
//!     id: "p1".into(),
//!     title: "Organic cotton tee".into(),
//!     currency: "USD".into(),
//!     price_cents: 10_000, // 100.00
//!     moq: 10,
//!     lead_time_days: 14,
//!     tiered_pricing: vec![],
//! };
//!
//! let mut cart = Cart::new(CartKind::Main, "guest");
//! cart.add_item(&product, 5, None).unwrap();
//!
//! assert_eq!(cart.subtotal_cents, 50_000);
//! assert_eq!(cart.moq_violations.len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use loomhub_core::Cart` instead of
// `use loomhub_core::cart::Cart`

pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CartError, CartResult, ValidationError};
pub use money::Money;
pub use pricing::{resolve_price, ResolvedPrice};
pub use types::{CartKind, Customizations, Product, TaxRate, TierPricing};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Checkout tax rate: 15%, applied to the cart subtotal.
pub const TAX_RATE: TaxRate = TaxRate::from_bps(1500);

/// Orders at or above this subtotal ship free (10,000.00 in cart currency).
pub const FREE_SHIPPING_THRESHOLD_CENTS: i64 = 1_000_000;

/// Flat shipping fee below the threshold (500.00 in cart currency).
pub const FLAT_SHIPPING_FEE_CENTS: i64 = 50_000;

/// Maximum distinct lines in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps the persisted snapshot bounded.
/// There is deliberately no per-line quantity cap: bulk garment orders
/// legitimately run to thousands of units and tier tables depend on it.
pub const MAX_CART_ITEMS: usize = 100;

/// Currency an empty cart reports before its first line pins one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Owner id used for carts created before the buyer signs in.
pub const GUEST_USER_ID: &str = "guest";
