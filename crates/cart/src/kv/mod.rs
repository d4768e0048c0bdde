//! Key-value stores used to persist cart snapshots.
//!
//! The cart only needs an asynchronous string `get`/`set`. Backends:
//!
//! - [`MemoryStore`] - process-local map, for tests and ephemeral carts
//! - [`FileStore`] - one file per key under a data directory
//! - `PgStore` - `PostgreSQL` table (requires the `postgres` feature)

mod file;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;

/// Errors raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed.
    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other backend failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Asynchronous string key-value store.
///
/// Implementations are expected to serialize individual `get`/`set` calls;
/// no further locking is provided by the cart.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}
