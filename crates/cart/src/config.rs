//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Key the snapshot is stored under (default: `@GoMarketplace:products`)
//! - `CART_DATA_DIR` - Directory used by the file store (default: `.cart`)
//! - `CART_DATABASE_URL` - `PostgreSQL` connection string for the database store

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Default key for the persisted cart snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:products";

/// Default directory for the file-backed store.
pub const DEFAULT_DATA_DIR: &str = ".cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Key the snapshot is persisted under
    pub storage_key: String,
    /// Directory for the file-backed store
    pub data_dir: PathBuf,
    /// Optional `PostgreSQL` URL (contains password)
    pub database_url: Option<SecretString>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database_url: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `CART_STORAGE_KEY` is set but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_key = get_env_or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        validate_storage_key(&storage_key, "CART_STORAGE_KEY")?;

        Ok(Self {
            storage_key,
            data_dir: PathBuf::from(get_env_or_default("CART_DATA_DIR", DEFAULT_DATA_DIR)),
            database_url: get_optional_env("CART_DATABASE_URL").map(SecretString::from),
        })
    }

    /// Override the storage key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `key` is empty.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        validate_storage_key(&key, "storage key")?;
        self.storage_key = key;
        Ok(self)
    }

    /// Override the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// A storage key must name something.
fn validate_storage_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "@GoMarketplace:products");
        assert_eq!(config.data_dir, PathBuf::from(".cart"));
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_validate_storage_key_empty() {
        let result = validate_storage_key("  ", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_with_storage_key() {
        let config = CartConfig::default().with_storage_key("@Shop:cart").unwrap();
        assert_eq!(config.storage_key, "@Shop:cart");

        assert!(CartConfig::default().with_storage_key("").is_err());
    }

    #[test]
    fn test_with_data_dir() {
        let config = CartConfig::default().with_data_dir("/tmp/cart");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cart"));
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let config = CartConfig {
            database_url: Some(SecretString::from("postgres://user:hunter2@db/cart")),
            ..CartConfig::default()
        };

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("hunter2"));
    }
}
