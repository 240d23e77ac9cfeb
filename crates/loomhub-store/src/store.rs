//! # Cart Store
//!
//! Owns the two cart slots and drives every mutation end to end.
//!
//! ## Operation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore Operations                                 │
//! │                                                                         │
//! │  UI Action              Store Operation          Pipeline               │
//! │  ─────────              ───────────────          ────────               │
//! │                                                                         │
//! │  Add to cart ──────────► add_item(kind, …) ───┐                        │
//! │  Change quantity ──────► set_quantity(…) ─────┤   lock slot            │
//! │  Remove line ──────────► remove_item(…) ──────┼─► run aggregator       │
//! │  Empty cart ───────────► clear(kind) ─────────┘   write through        │
//! │                                                    return snapshot     │
//! │                                                                         │
//! │  View cart ────────────► cart(kind) / totals(kind)   (read only)       │
//! │                                                                         │
//! │  The two slots are independent: a mutation of `main` never touches      │
//! │  `sample`, and each persists under its own key.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! Both slots live behind one `Mutex` because:
//! 1. Commands may run concurrently even though the engine is logically
//!    single-threaded
//! 2. A mutation must see its own write-through before the next one starts
//! 3. Cart operations are quick; a RwLock would add complexity for nothing
//!
//! ## Persistence Contract
//! Mutations commit in memory first; the snapshot write is fire-and-forget.
//! A failed write is logged at `warn` and the operation still succeeds, so
//! in-memory and persisted state can diverge until the next successful
//! write. Callers that need durability call [`CartStore::flush`].

use std::sync::{Arc, Mutex};

use chrono::Duration;
use tracing::{debug, warn};

use loomhub_core::cart::{Cart, CartTotals};
use loomhub_core::error::{CartError, CartResult};
use loomhub_core::types::{CartKind, Customizations, Product};
use loomhub_core::validation::validate_product;

use crate::error::StoreResult;
use crate::storage::{SnapshotStore, StorageError};
use crate::CART_TTL_DAYS;

// =============================================================================
// Cart Store
// =============================================================================

/// The stateful cart engine: two slots, one owner, injected persistence.
///
/// Construct one per session and hand it to the UI layer; there is no
/// global instance. The `user_id` tags newly created carts only - the
/// store enforces no authorization.
pub struct CartStore {
    storage: Arc<dyn SnapshotStore>,
    user_id: String,
    slots: Mutex<Slots>,
}

/// The two independent in-memory cart slots.
#[derive(Debug)]
struct Slots {
    main: Cart,
    sample: Cart,
}

impl Slots {
    fn get(&self, kind: CartKind) -> &Cart {
        match kind {
            CartKind::Main => &self.main,
            CartKind::Sample => &self.sample,
        }
    }

    fn get_mut(&mut self, kind: CartKind) -> &mut Cart {
        match kind {
            CartKind::Main => &mut self.main,
            CartKind::Sample => &mut self.sample,
        }
    }
}

impl CartStore {
    /// Creates a store for `user_id`, restoring both slots from storage.
    ///
    /// ## Snapshot Restore Rules
    /// A slot starts fresh when its persisted snapshot is missing, expired,
    /// unparseable, stored under the wrong slot kind, or owned by a
    /// different user. Carts are never merged across identities.
    pub fn new(storage: Arc<dyn SnapshotStore>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let slots = Slots {
            main: Self::load_slot(storage.as_ref(), &user_id, CartKind::Main),
            sample: Self::load_slot(storage.as_ref(), &user_id, CartKind::Sample),
        };

        CartStore {
            storage,
            user_id,
            slots: Mutex::new(slots),
        }
    }

    /// Restores one slot from storage, falling back to a fresh empty cart.
    fn load_slot(storage: &dyn SnapshotStore, user_id: &str, kind: CartKind) -> Cart {
        let key = kind.storage_key();

        match storage.get(key) {
            Ok(Some(raw)) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) if cart.kind == kind && cart.user_id == user_id => {
                    debug!(key, items = cart.items.len(), "restored cart snapshot");
                    cart
                }
                Ok(_) => {
                    debug!(key, "snapshot has a different owner or slot, starting fresh");
                    Cart::new(kind, user_id)
                }
                Err(e) => {
                    warn!(key, error = %e, "corrupt cart snapshot, starting fresh");
                    Cart::new(kind, user_id)
                }
            },
            Ok(None) => Cart::new(kind, user_id),
            Err(e) => {
                warn!(key, error = %e, "cart snapshot read failed, starting fresh");
                Cart::new(kind, user_id)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds a product to the given cart slot.
    ///
    /// Validates the catalog record, then runs the aggregator's merge-or-
    /// append logic and writes the new snapshot through to storage.
    ///
    /// ## Returns
    /// The full new cart snapshot on success; the slot is unchanged on error.
    pub fn add_item(
        &self,
        kind: CartKind,
        product: &Product,
        quantity: i64,
        customizations: Option<Customizations>,
    ) -> StoreResult<Cart> {
        debug!(kind = %kind, product_id = %product.id, quantity, "add_item");
        validate_product(product).map_err(CartError::from)?;

        self.mutate(kind, |cart| cart.add_item(product, quantity, customizations))
    }

    /// Sets the quantity of one line in the given cart slot.
    pub fn set_quantity(&self, kind: CartKind, item_id: &str, quantity: i64) -> StoreResult<Cart> {
        debug!(kind = %kind, item_id = %item_id, quantity, "set_quantity");

        self.mutate(kind, |cart| cart.set_quantity(item_id, quantity))
    }

    /// Removes one line from the given cart slot.
    pub fn remove_item(&self, kind: CartKind, item_id: &str) -> StoreResult<Cart> {
        debug!(kind = %kind, item_id = %item_id, "remove_item");

        self.mutate(kind, |cart| cart.remove_item(item_id))
    }

    /// Empties the given cart slot. The other slot is untouched.
    pub fn clear(&self, kind: CartKind) -> Cart {
        debug!(kind = %kind, "clear");

        let mut slots = self.slots.lock().expect("cart store mutex poisoned");
        let cart = slots.get_mut(kind);
        cart.clear();
        self.persist(cart);
        cart.clone()
    }

    /// Runs one aggregator mutation under the lock, then writes through.
    fn mutate<F>(&self, kind: CartKind, op: F) -> StoreResult<Cart>
    where
        F: FnOnce(&mut Cart) -> CartResult<()>,
    {
        let mut slots = self.slots.lock().expect("cart store mutex poisoned");
        let cart = slots.get_mut(kind);

        op(cart)?;
        self.persist(cart);
        Ok(cart.clone())
    }

    /// Writes a slot's snapshot to storage, swallowing failures.
    ///
    /// In-memory state stays authoritative; a later successful write
    /// re-converges the persisted copy.
    fn persist(&self, cart: &Cart) {
        let key = cart.kind.storage_key();
        let result = serde_json::to_string(cart)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.put(key, &raw, Duration::days(CART_TTL_DAYS)));

        if let Err(e) = result {
            warn!(key, error = %e, "cart snapshot write failed, keeping in-memory state");
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Returns a snapshot of the given cart slot.
    pub fn cart(&self, kind: CartKind) -> Cart {
        let slots = self.slots.lock().expect("cart store mutex poisoned");
        slots.get(kind).clone()
    }

    /// Returns the totals summary for the given cart slot.
    pub fn totals(&self, kind: CartKind) -> CartTotals {
        let slots = self.slots.lock().expect("cart store mutex poisoned");
        CartTotals::from(slots.get(kind))
    }

    /// Returns Σ quantity across the slot's lines (the cart badge count).
    pub fn total_quantity(&self, kind: CartKind) -> i64 {
        let slots = self.slots.lock().expect("cart store mutex poisoned");
        slots.get(kind).total_quantity()
    }

    /// Returns the owner this store tags new carts with.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    // -------------------------------------------------------------------------
    // Durability
    // -------------------------------------------------------------------------

    /// Re-writes one slot's snapshot, surfacing storage errors.
    ///
    /// Write-through failures during mutations are swallowed by design;
    /// checkout calls this to make sure the persisted copy caught up.
    pub fn flush(&self, kind: CartKind) -> StoreResult<()> {
        let slots = self.slots.lock().expect("cart store mutex poisoned");
        let cart = slots.get(kind);
        let raw = serde_json::to_string(cart).map_err(StorageError::from)?;

        self.storage
            .put(cart.kind.storage_key(), &raw, Duration::days(CART_TTL_DAYS))?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
