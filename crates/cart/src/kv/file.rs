//! Directory-backed key-value store.
//!
//! Each key maps to `<dir>/<percent-encoded key>.json`. Writes land in a
//! sibling temp file which is then renamed over the target, so readers never
//! observe a half-written value.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{KeyValueStore, StoreError};

/// A key-value store that keeps one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    ///
    /// The directory is created lazily on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path used for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let target = self.path_for(key);
        let temp = target.with_extension("json.tmp");
        tokio::fs::write(&temp, value.as_bytes()).await?;
        tokio::fs::rename(&temp, &target).await?;

        debug!(path = %target.display(), bytes = value.len(), "Wrote key");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_encodes_key() {
        let store = FileStore::new("/data");
        let path = store.path_for("@GoMarketplace:products");
        assert_eq!(
            path,
            PathBuf::from("/data/%40GoMarketplace%3Aproducts.json")
        );
    }

    #[tokio::test]
    async fn test_get_missing_key_in_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("not-created-yet"));
        assert_eq!(store.get("cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("nested"));

        store.set("cart", "[]".to_string()).await.unwrap();
        store.set("cart", "[1]".to_string()).await.unwrap();

        assert_eq!(store.get("cart").await.unwrap().as_deref(), Some("[1]"));
        assert!(!store.path_for("cart").with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        store.set("a", "1".to_string()).await.unwrap();
        store.set("b", "2".to_string()).await.unwrap();

        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("2"));
    }
}
