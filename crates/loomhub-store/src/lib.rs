//! # loomhub-store: Cart Slots + Snapshot Persistence
//!
//! The stateful half of the Loomhub cart engine. Where `loomhub-core` is
//! pure math over carts, this crate owns the mutable slots and the
//! client-local persistence they write through to.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Loomhub Cart Data Flow                              │
//! │                                                                         │
//! │  UI action (add_item, set_quantity, remove_item, clear)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  loomhub-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌─────────────┐  │   │
//! │  │   │   CartStore   │    │ SnapshotStore  │    │   errors    │  │   │
//! │  │   │  (store.rs)   │    │ (storage.rs)   │    │ (error.rs)  │  │   │
//! │  │   │               │    │                │    │             │  │   │
//! │  │   │ main slot     │◄──►│ MemoryStore    │    │ StoreError  │  │   │
//! │  │   │ sample slot   │    │ FileStore      │    │             │  │   │
//! │  │   └───────┬───────┘    └────────────────┘    └─────────────┘  │   │
//! │  │           │                                                    │   │
//! │  └───────────┼────────────────────────────────────────────────────┘   │
//! │              ▼                                                          │
//! │     loomhub-core aggregator (pure cart math)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `CartStore`: the two slots and their operations
//! - [`storage`] - `SnapshotStore` trait + memory/file implementations
//! - [`error`] - store-boundary error types
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use loomhub_core::types::{CartKind, Product};
//! use loomhub_store::{CartStore, MemoryStore};
//!
//! let store = CartStore::new(Arc::new(MemoryStore::new()), "guest");
//!
//! let product = Product {
//!     id: "p1".into(),
//!     title: "Organic cotton tee".into(),
//!     currency: "USD".into(),
//!     price_cents: 10_000,
//!     moq: 10,
//!     lead_time_days: 14,
//!     tiered_pricing: vec![],
//! };
//!
//! let cart = store.add_item(CartKind::Main, &product, 5, None).unwrap();
//! assert_eq!(cart.subtotal_cents, 50_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod storage;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use storage::{FileStore, MemoryStore, SnapshotStore, StorageError};
pub use store::CartStore;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Persisted cart snapshots expire this many days after their last write.
///
/// Matches the marketplace session policy: an untouched cart older than a
/// week is treated as abandoned rather than restored.
pub const CART_TTL_DAYS: i64 = 7;
