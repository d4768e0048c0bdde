//! Integration tests for Marketplace Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketplace-cart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Mutation sequences against a mounted provider
//! - `cart_persistence` - Restarts against memory and file stores
//!
//! This library holds the shared fixtures.

use std::sync::Arc;

use marketplace_cart::{CartConfig, CartProvider, KeyValueStore};
use marketplace_cart_core::{Decimal, Product};

/// Storage key used by every test.
pub const TEST_KEY: &str = "@GoMarketplace:products";

/// A product descriptor with a whole-unit price.
#[must_use]
pub fn product(id: &str, title: &str, price: i64) -> Product {
    Product::new(id, title, format!("https://img.example/{id}.png"), Decimal::new(price, 0))
}

/// Configuration pointing at [`TEST_KEY`].
#[must_use]
pub fn test_config() -> CartConfig {
    CartConfig {
        storage_key: TEST_KEY.to_string(),
        ..CartConfig::default()
    }
}

/// Mount a provider against `store` with [`test_config`].
pub async fn mount(store: Arc<dyn KeyValueStore>) -> CartProvider {
    CartProvider::mount(store, &test_config()).await
}
