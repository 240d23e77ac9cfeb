//! # Domain Types
//!
//! Core domain types for the Loomhub cart engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  TierPricing    │   │ Customizations  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  min_quantity   │   │  opaque bag     │       │
//! │  │  title          │   │  max_quantity?  │   │  canonical      │       │
//! │  │  price_cents    │   │  price_per_unit │   │  fingerprint    │       │
//! │  │  moq            │   └─────────────────┘   └─────────────────┘       │
//! │  │  lead_time_days │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │    CartKind     │   │    TaxRate      │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  Main           │   │  bps (u32)      │       │
//! │                        │  Sample         │   │  1500 = 15%     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Product` is an upstream catalog record: the cart engine consumes it
//! read-only and freezes a snapshot of it into each cart line.

use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (the marketplace checkout rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Tier Pricing
// =============================================================================

/// One quantity band in a product's tiered price schedule.
///
/// Tiers are unordered in catalog storage; the resolver sorts them by
/// `min_quantity` descending before matching. `max_quantity` of `None` means
/// the band is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TierPricing {
    /// Smallest quantity that qualifies for this band.
    pub min_quantity: i64,

    /// Largest quantity covered by this band (inclusive). None = open-ended.
    pub max_quantity: Option<i64>,

    /// Unit price in cents while inside this band.
    pub price_per_unit_cents: i64,
}

impl TierPricing {
    /// Checks whether a quantity falls inside this band.
    pub fn contains(&self, quantity: i64) -> bool {
        quantity >= self.min_quantity
            && self.max_quantity.map_or(true, |max| quantity <= max)
    }

    /// Returns the band's unit price as Money.
    #[inline]
    pub fn price_per_unit(&self) -> Money {
        Money::from_cents(self.price_per_unit_cents)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product, as consumed by the cart engine.
///
/// ## Read-Only Contract
/// The engine never fetches or caches products itself; the caller supplies
/// the current catalog record and the cart freezes a snapshot of it per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display title shown in the cart and in MOQ messages.
    pub title: String,

    /// Currency code (ISO 4217). One currency per cart.
    pub currency: String,

    /// Base unit price in cents, used when no tier matches.
    pub price_cents: i64,

    /// Minimum order quantity the supplier accepts.
    pub moq: i64,

    /// Production lead time in days, drives the delivery estimate.
    pub lead_time_days: i64,

    /// Tiered price schedule. May be empty; order is not significant.
    pub tiered_pricing: Vec<TierPricing>,
}

impl Product {
    /// Returns the base price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Cart Kind
// =============================================================================

/// Discriminator separating the two independent carts a buyer holds.
///
/// The main cart is the purchase cart; the sample cart collects product
/// samples requested before committing to a bulk order. The two slots never
/// interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CartKind {
    /// The bulk purchase cart.
    Main,
    /// The sample-request cart.
    Sample,
}

impl CartKind {
    /// Fixed persistence key for this cart slot.
    pub const fn storage_key(&self) -> &'static str {
        match self {
            CartKind::Main => "main_cart",
            CartKind::Sample => "sample_cart",
        }
    }
}

impl fmt::Display for CartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartKind::Main => write!(f, "main"),
            CartKind::Sample => write!(f, "sample"),
        }
    }
}

// =============================================================================
// Customizations
// =============================================================================

/// An opaque customization bag attached to a cart line.
///
/// ## Line Identity
/// Two adds of the same product merge into one line only when their
/// customization bags are structurally equal. Equality goes through
/// [`Customizations::fingerprint`], a canonical order-independent hash
/// computed once when the line is created, so the cart never deep-compares
/// bags on every lookup.
///
/// ## Canonical Form
/// `serde_json::Map` keeps keys sorted, so serializing the bag yields the
/// same bytes regardless of the order the caller inserted keys in. The
/// fingerprint is an `FxHasher` digest of those bytes, stable across
/// processes (no random hash seed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customizations(#[ts(type = "Record<string, unknown>")] pub Map<String, Value>);

impl Customizations {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Customizations(Map::new())
    }

    /// Inserts a key-value pair, returning self for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Checks if the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical structural fingerprint, rendered as a fixed-width hex key.
    ///
    /// Serialization cannot fail for a value built from JSON parts, so a
    /// failure here would mean a broken serde_json invariant; the bag falls
    /// back to hashing its Debug form rather than panicking.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_string(&self.0)
            .unwrap_or_else(|_| format!("{:?}", self.0));
        let mut hasher = FxHasher::default();
        hasher.write(canonical.as_bytes());
        format!("{:016x}", hasher.finish())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
