//! Marketplace Cart - shopping cart state with durable persistence.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart and its invariants (unique ids,
//!   quantity at least 1) and is the only thing that can change it
//! - [`persistence::PersistenceBridge`] seeds the store from a key-value store
//!   at startup and writes the full snapshot back after every change, from a
//!   single background task
//! - [`provider::CartProvider`] wires the two together once per process and
//!   publishes the cart to code running in its scope
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use marketplace_cart::{CartConfig, CartProvider, FileStore, use_cart};
//! use marketplace_cart_core::{Decimal, Product};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CartConfig::from_env()?;
//! let store = Arc::new(FileStore::new(&config.data_dir));
//! let provider = CartProvider::mount(store, &config).await;
//!
//! provider
//!     .scope(async {
//!         let cart = use_cart()?;
//!         cart.add_to_cart(Product::new("p1", "Shirt", "https://img/p1", Decimal::new(10, 0)));
//!         Ok::<_, marketplace_cart::CartError>(())
//!     })
//!     .await?;
//!
//! provider.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod kv;
pub mod persistence;
pub mod provider;
pub mod store;

pub use config::{CartConfig, ConfigError};
pub use error::CartError;
pub use kv::{FileStore, KeyValueStore, MemoryStore, StoreError};
#[cfg(feature = "postgres")]
pub use kv::PgStore;
pub use persistence::{LoadOutcome, PersistenceBridge, PersistenceError};
pub use provider::{CartHandle, CartProvider, use_cart};
pub use store::CartStore;
