//! The process-wide cart and the scope it is published in.
//!
//! A [`CartProvider`] is mounted once per process. Mounting loads the
//! persisted snapshot before any handle exists, so no mutation can race the
//! load. Code running inside [`CartProvider::scope`] can find the cart with
//! [`use_cart`]; anywhere else that lookup fails with `CartError::NoProvider`.

use std::future::Future;
use std::sync::Arc;

use marketplace_cart_core::{Product, ProductId, Snapshot};
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::kv::KeyValueStore;
use crate::persistence::{LoadOutcome, PersistenceBridge};
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartHandle;
}

/// Cheaply cloneable access to the mounted cart.
///
/// Exposes a read-only view plus the three mutation operations.
#[derive(Debug, Clone)]
pub struct CartHandle {
    store: Arc<CartStore>,
}

impl CartHandle {
    /// The current cart contents.
    #[must_use]
    pub fn products(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    /// Receive a new snapshot whenever the cart changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.store.subscribe()
    }

    /// See [`CartStore::add_to_cart`].
    pub fn add_to_cart(&self, product: Product) {
        self.store.add_to_cart(product);
    }

    /// See [`CartStore::increment`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineItemNotFound` if the product is not in the cart.
    pub fn increment(&self, id: &ProductId) -> Result<()> {
        self.store.increment(id)
    }

    /// See [`CartStore::decrement`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineItemNotFound` if the product is not in the cart.
    pub fn decrement(&self, id: &ProductId) -> Result<()> {
        self.store.decrement(id)
    }
}

/// Owner of the cart and its persistence.
#[derive(Debug)]
pub struct CartProvider {
    cart: CartHandle,
    bridge: PersistenceBridge,
    loaded: LoadOutcome,
}

impl CartProvider {
    /// Load the persisted cart from `store` and start persisting changes.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(store, config), fields(key = %config.storage_key))]
    pub async fn mount(store: Arc<dyn KeyValueStore>, config: &CartConfig) -> Self {
        let cart = Arc::new(CartStore::new());
        let bridge = PersistenceBridge::spawn(store, config.storage_key.clone());

        let loaded = bridge.load(&cart).await;
        bridge.attach(&cart);
        info!(?loaded, "Cart provider mounted");

        Self {
            cart: CartHandle { store: cart },
            bridge,
            loaded,
        }
    }

    /// A handle to the mounted cart.
    #[must_use]
    pub fn cart(&self) -> CartHandle {
        self.cart.clone()
    }

    /// Result of the initial load.
    #[must_use]
    pub const fn load_outcome(&self) -> LoadOutcome {
        self.loaded
    }

    /// Run `future` with this provider's cart available through [`use_cart`].
    pub async fn scope<F: Future>(&self, future: F) -> F::Output {
        CURRENT_CART.scope(self.cart(), future).await
    }

    /// Wait for all saves queued so far.
    pub async fn flush(&self) {
        self.bridge.flush().await;
    }

    /// Finish queued saves and stop persisting.
    pub async fn shutdown(self) {
        self.bridge.shutdown().await;
    }
}

/// The cart of the enclosing [`CartProvider::scope`].
///
/// # Errors
///
/// Returns `CartError::NoProvider` when called outside a provider scope.
pub fn use_cart() -> Result<CartHandle> {
    CURRENT_CART
        .try_with(CartHandle::clone)
        .map_err(|_| CartError::NoProvider)
}
