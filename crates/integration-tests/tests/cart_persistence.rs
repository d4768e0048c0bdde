//! Integration tests for restoring a cart across restarts.
//!
//! A "restart" is modelled by shutting a provider down and mounting a new one
//! against the same store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use marketplace_cart::{FileStore, KeyValueStore, LoadOutcome, MemoryStore};
use marketplace_cart_core::{Decimal, ProductId};
use marketplace_cart_integration_tests::{TEST_KEY, mount, product};
use serde_json::json;

// =============================================================================
// Cold Start
// =============================================================================

#[tokio::test]
async fn test_cold_start_restores_persisted_snapshot() {
    let raw = json!([
        {"id": "p2", "title": "Hat", "image_url": "https://img/p2", "price": 15, "quantity": 3}
    ])
    .to_string();
    let provider = mount(Arc::new(MemoryStore::with_entry(TEST_KEY, raw))).await;

    assert_eq!(provider.load_outcome(), LoadOutcome::Restored { items: 1 });
    let products = provider.cart().products();
    assert_eq!(products.len(), 1);
    let item = products.get(&ProductId::new("p2")).unwrap();
    assert_eq!(item.quantity, 3);
    assert_eq!(item.title, "Hat");
    assert_eq!(item.price.to_decimal(), Some(Decimal::new(15, 0)));
}

#[tokio::test]
async fn test_cold_start_without_snapshot_is_empty() {
    let provider = mount(Arc::new(MemoryStore::new())).await;

    assert_eq!(provider.load_outcome(), LoadOutcome::Missing);
    assert!(provider.cart().products().is_empty());
}

#[tokio::test]
async fn test_cold_start_with_corrupt_snapshot_is_empty() {
    let store = Arc::new(MemoryStore::with_entry(TEST_KEY, "[{\"id\":"));
    let provider = mount(store.clone()).await;

    assert_eq!(provider.load_outcome(), LoadOutcome::Failed);
    assert!(provider.cart().products().is_empty());

    // The first mutation replaces the unreadable value.
    provider.cart().add_to_cart(product("p1", "Shirt", 10));
    provider.flush().await;
    let provider = mount(store).await;
    assert_eq!(provider.load_outcome(), LoadOutcome::Restored { items: 1 });
}

#[tokio::test]
async fn test_cold_start_accepts_camel_case_image_url() {
    let raw = r#"[{"id":"p2","title":"Hat","imageUrl":"u","price":5,"quantity":2}]"#;
    let provider = mount(Arc::new(MemoryStore::with_entry(TEST_KEY, raw))).await;

    let products = provider.cart().products();
    assert_eq!(products.get(&ProductId::new("p2")).unwrap().image_url, "u");
}

#[tokio::test]
async fn test_cold_start_keeps_price_outside_decimal_range() {
    let raw = r#"[
        {"id":"p1","title":"Planet","image_url":"u","price":1e30,"quantity":1},
        {"id":"p2","title":"Hat","image_url":"u","price":5,"quantity":1}
    ]"#;
    let store = Arc::new(MemoryStore::with_entry(TEST_KEY, raw));
    let provider = mount(store.clone()).await;

    assert_eq!(provider.load_outcome(), LoadOutcome::Restored { items: 2 });
    assert_eq!(provider.cart().products().subtotal(), None);

    // Saving after a mutation must not lose the stored item.
    provider.cart().increment(&ProductId::new("p2")).unwrap();
    provider.shutdown().await;

    let saved = store.get(TEST_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(value[0]["id"], "p1");
    assert_eq!(value[0]["price"].as_f64(), Some(1e30));
    assert_eq!(value[1]["quantity"], 2);
}

// =============================================================================
// Round Trips
// =============================================================================

#[tokio::test]
async fn test_memory_store_restart_round_trip() {
    let store = Arc::new(MemoryStore::new());

    let first = mount(store.clone()).await;
    let cart = first.cart();
    cart.add_to_cart(product("p1", "Shirt", 10));
    cart.add_to_cart(product("p2", "Hat", 5));
    cart.add_to_cart(product("p1", "Shirt", 10));
    cart.increment(&ProductId::new("p2")).unwrap();
    let before = cart.products();
    first.shutdown().await;

    let second = mount(store).await;
    assert_eq!(*second.cart().products(), *before);
}

#[tokio::test]
async fn test_file_store_restart_round_trip() {
    let tmp = tempfile::tempdir().unwrap();

    let first = mount(Arc::new(FileStore::new(tmp.path()))).await;
    let cart = first.cart();
    cart.add_to_cart(product("p1", "Shirt", 10));
    cart.add_to_cart(product("p3", "Socks", 3));
    cart.decrement(&ProductId::new("p3")).unwrap();
    cart.add_to_cart(product("p1", "Shirt", 10));
    let before = cart.products();
    first.shutdown().await;

    let store = FileStore::new(tmp.path());
    assert!(store.path_for(TEST_KEY).exists());
    let raw = store.get(TEST_KEY).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["id"], "p1");
    assert_eq!(value[0]["quantity"], 2);
    assert!(value[0]["price"].is_number());

    let second = mount(Arc::new(store)).await;
    assert_eq!(second.load_outcome(), LoadOutcome::Restored { items: 1 });
    assert_eq!(*second.cart().products(), *before);
}

#[tokio::test]
async fn test_mutations_after_restore_build_on_loaded_state() {
    let raw = json!([
        {"id": "p2", "title": "Hat", "image_url": "u", "price": 5, "quantity": 3}
    ])
    .to_string();
    let store = Arc::new(MemoryStore::with_entry(TEST_KEY, raw));
    let provider = mount(store.clone()).await;

    provider.cart().increment(&ProductId::new("p2")).unwrap();
    provider.cart().add_to_cart(product("p2", "Hat", 5));
    provider.shutdown().await;

    let provider = mount(store).await;
    let products = provider.cart().products();
    assert_eq!(products.get(&ProductId::new("p2")).unwrap().quantity, 5);
}
