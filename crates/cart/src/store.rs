//! Authoritative in-memory cart state.
//!
//! `CartStore` owns the current [`Snapshot`] and is the only place it can be
//! changed. Every successful mutation swaps in a new `Arc<Snapshot>`, runs the
//! registered observers while still holding the state lock (so observers see
//! changes in mutation order), then publishes the snapshot on a `watch`
//! channel for readers that only care about the latest state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use marketplace_cart_core::{LineItem, Product, ProductId, Snapshot};
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::error::{CartError, Result};

/// Callback invoked with each new snapshot after a mutation.
pub type Observer = Box<dyn Fn(&Arc<Snapshot>) + Send + Sync>;

/// The cart state and its three mutation operations.
pub struct CartStore {
    current: Mutex<Arc<Snapshot>>,
    observers: RwLock<Vec<Observer>>,
    updates: watch::Sender<Arc<Snapshot>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("current", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        let initial = Arc::new(Snapshot::empty());
        let (updates, _) = watch::channel(Arc::clone(&initial));
        Self {
            current: Mutex::new(initial),
            observers: RwLock::new(Vec::new()),
            updates,
        }
    }

    /// The current cart contents.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.lock())
    }

    /// Subscribe to snapshot changes.
    ///
    /// The receiver always holds the latest snapshot; intermediate states may
    /// be skipped by slow readers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.updates.subscribe()
    }

    /// Register an observer that is called once for every mutation.
    ///
    /// Observers run under the state lock and must not call back into the
    /// store.
    pub fn observe(&self, observer: Observer) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// Add one unit of `product` to the cart.
    ///
    /// An existing line item with the same id gains one unit and takes the
    /// new title, image and price. Otherwise a new line item with quantity 1
    /// is appended.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub fn add_to_cart(&self, product: Product) {
        let outcome = self.mutate(|items| {
            match items.iter_mut().find(|item| item.id == product.id) {
                Some(item) => {
                    item.quantity = item.quantity.saturating_add(1);
                    let quantity = item.quantity;
                    item.refresh(product);
                    Ok(quantity)
                }
                None => {
                    items.push(LineItem::from_product(product, 1));
                    Ok(1)
                }
            }
        });

        if let Ok(quantity) = outcome {
            debug!(quantity, "Added to cart");
        }
    }

    /// Add one unit to an existing line item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineItemNotFound` if no line item has this id. The
    /// cart is not changed and observers are not called.
    #[instrument(skip(self))]
    pub fn increment(&self, id: &ProductId) -> Result<()> {
        let quantity = self.mutate(|items| {
            let item = find_mut(items, id)?;
            item.quantity = item.quantity.saturating_add(1);
            Ok(item.quantity)
        })?;
        debug!(quantity, "Incremented line item");
        Ok(())
    }

    /// Remove one unit from an existing line item.
    ///
    /// A line item at quantity 1 is removed from the cart entirely.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineItemNotFound` if no line item has this id. The
    /// cart is not changed and observers are not called.
    #[instrument(skip(self))]
    pub fn decrement(&self, id: &ProductId) -> Result<()> {
        let remaining = self.mutate(|items| {
            let item = find_mut(items, id)?;
            item.quantity = item.quantity.saturating_sub(1);
            let new_quantity = item.quantity;
            if new_quantity < 1 {
                items.retain(|item| &item.id != id);
            }
            Ok(new_quantity)
        })?;

        if remaining == 0 {
            debug!("Removed line item");
        } else {
            debug!(quantity = remaining, "Decremented line item");
        }
        Ok(())
    }

    /// Replace the whole cart without notifying observers.
    ///
    /// Used to seed the store from a persisted snapshot; writing that
    /// snapshot straight back would be redundant.
    pub(crate) fn seed(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        let mut current = self.lock();
        *current = Arc::clone(&snapshot);
        self.updates.send_replace(snapshot);
    }

    /// Apply `change` to a copy of the items and commit it if it succeeds.
    fn mutate<T>(&self, change: impl FnOnce(&mut Vec<LineItem>) -> Result<T>) -> Result<T> {
        let mut current = self.lock();
        let mut items = current.items().to_vec();
        let output = change(&mut items)?;

        let next = Arc::new(Snapshot::from_items(items));
        *current = Arc::clone(&next);

        for observer in self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            observer(&next);
        }
        self.updates.send_replace(next);

        Ok(output)
    }

    fn lock(&self) -> MutexGuard<'_, Arc<Snapshot>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn find_mut<'a>(items: &'a mut [LineItem], id: &ProductId) -> Result<&'a mut LineItem> {
    items
        .iter_mut()
        .find(|item| &item.id == id)
        .ok_or_else(|| CartError::LineItemNotFound(id.clone()))
}
