//! CLI command implementations.

pub mod cart;

use std::sync::Arc;

use marketplace_cart::{CartConfig, FileStore, KeyValueStore};
use tracing::info;

/// Open the file-backed store configured by `CART_DATA_DIR` / `--data-dir`.
pub fn open_file_store(config: &CartConfig) -> Arc<dyn KeyValueStore> {
    info!(dir = %config.data_dir.display(), "Using file store");
    Arc::new(FileStore::new(&config.data_dir))
}

/// Connect to the `PostgreSQL` store configured by `CART_DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if `CART_DATABASE_URL` is not set or the connection fails.
#[cfg(feature = "postgres")]
pub async fn open_postgres(
    config: &CartConfig,
) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    let database_url = config
        .database_url
        .as_ref()
        .ok_or("CART_DATABASE_URL not set")?;

    let store = marketplace_cart::PgStore::connect(database_url).await?;
    info!("Connected to database");
    Ok(Arc::new(store))
}
