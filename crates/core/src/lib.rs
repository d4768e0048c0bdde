//! Marketplace Cart Core - Shared types library.
//!
//! This crate provides the types used across all Marketplace Cart components:
//! - `marketplace-cart` - Cart state, persistence and provider scope
//! - `cli` - Command-line front end for inspecting and editing a cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! storage access, no async runtime. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, product descriptors, line items and snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use rust_decimal::Decimal;
pub use types::*;
