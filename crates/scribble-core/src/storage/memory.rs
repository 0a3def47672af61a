//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            let entries = self
                .entries
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(entries.get(&key).cloned())
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut entries = self
                .entries
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            entries.insert(key, value);
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut entries = self
                .entries
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            entries.remove(&key);
            Ok(())
        })
    }

    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries = self
                .entries
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(entries.keys().cloned().collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_set_and_get() {
        let storage = MemoryStorage::new();

        block_on(storage.set("page", "[]".to_string())).unwrap();
        let value = block_on(storage.get("page")).unwrap();

        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_key() {
        let storage = MemoryStorage::new();
        assert!(block_on(storage.get("nonexistent")).unwrap().is_none());
    }

    #[test]
    fn test_overwrite() {
        let storage = MemoryStorage::new();

        block_on(storage.set("page", "1".to_string())).unwrap();
        block_on(storage.set("page", "2".to_string())).unwrap();

        assert_eq!(block_on(storage.get("page")).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();

        block_on(storage.set("page", "[]".to_string())).unwrap();
        block_on(storage.remove("page")).unwrap();
        block_on(storage.remove("page")).unwrap();

        assert!(block_on(storage.get("page")).unwrap().is_none());
    }

    #[test]
    fn test_keys() {
        let storage = MemoryStorage::new();

        block_on(storage.set("a", "[]".to_string())).unwrap();
        block_on(storage.set("b", "[]".to_string())).unwrap();

        let keys = block_on(storage.keys()).unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"a".to_string()));
        assert!(keys.contains(&"b".to_string()));
    }
}
