//! Errors surfaced to callers of the cart capability.
//!
//! Persistence failures never appear here: they are logged by the
//! persistence worker and the in-memory cart stays authoritative.

use marketplace_cart_core::ProductId;
use thiserror::Error;

/// Cart-level error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// `use_cart()` was called outside of a `CartProvider` scope.
    #[error("use_cart must be called within a CartProvider scope")]
    NoProvider,

    /// `increment`/`decrement` referenced a product that is not in the cart.
    /// The cart is left unchanged.
    #[error("Line item not found: {0}")]
    LineItemNotFound(ProductId),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
