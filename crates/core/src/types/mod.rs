//! Core types for Marketplace Cart.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod snapshot;

pub use id::*;
pub use price::Price;
pub use product::{LineItem, Product};
pub use snapshot::{Snapshot, SnapshotError};
