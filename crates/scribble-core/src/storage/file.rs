//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::fs;
use std::path::{Path, PathBuf};

/// Longest file name component produced for an encoded key.
const SEGMENT_LEN: usize = 200;

const EXTENSION: &str = "json";

/// File-based storage for native platforms.
///
/// Each key is stored as one JSON file. Keys are page URLs, so they are
/// base64url-encoded into file names (distinct keys never share a file);
/// long encodings are split into nested directories to stay under file
/// name limits.
pub struct FileStorage {
    /// Base directory for annotation storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/scribble/annotations/`
    /// On Windows: `%LOCALAPPDATA%\scribble\annotations\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("scribble").join("annotations"))
    }

    /// Get the file path for a key.
    fn entry_path(&self, key: &str) -> PathBuf {
        let encoded = URL_SAFE_NO_PAD.encode(key.as_bytes());
        let mut path = self.base_path.clone();
        // base64url output is ASCII, so byte offsets are char boundaries.
        let mut rest = encoded.as_str();
        while rest.len() > SEGMENT_LEN {
            let (segment, tail) = rest.split_at(SEGMENT_LEN);
            path.push(segment);
            rest = tail;
        }
        path.push(format!("{rest}.{EXTENSION}"));
        path
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

/// Recover the encoded key from a path below the base directory.
fn decode_entry(relative: &Path) -> Option<String> {
    let mut encoded = String::new();
    for component in relative.components() {
        encoded.push_str(component.as_os_str().to_str()?);
    }
    let encoded = encoded.strip_suffix(&format!(".{EXTENSION}"))?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

fn collect_entries(base: &Path, dir: &Path, keys: &mut Vec<String>) -> StorageResult<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_entries(base, &path, keys)?;
            continue;
        }
        if path.extension().map(|e| e == EXTENSION).unwrap_or(false) {
            if let Some(key) = path.strip_prefix(base).ok().and_then(decode_entry) {
                keys.push(key);
            }
        }
    }
    Ok(())
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let path = self.entry_path(key);

        Box::pin(async move {
            if !path.exists() {
                return Ok(None);
            }
            fs::read_to_string(&path).map(Some).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.entry_path(key);

        Box::pin(async move {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
            // Write then rename so a crash never leaves a half-written record.
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", tmp.display(), e))
            })?;
            fs::rename(&tmp, &path).map_err(|e| {
                StorageError::Io(format!("Failed to replace {}: {}", path.display(), e))
            })
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.entry_path(key);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();

        Box::pin(async move {
            let mut keys = Vec::new();
            if base.exists() {
                collect_entries(&base, &base, &mut keys)?;
            }
            Ok(keys)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_set_get() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.set("scribble:https://x.test/p", "[]".to_string())).unwrap();
        let value = block_on(storage.get("scribble:https://x.test/p")).unwrap();

        assert_eq!(value.as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_storage_missing() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        assert!(block_on(storage.get("nonexistent")).unwrap().is_none());
    }

    #[test]
    fn test_file_storage_similar_keys_do_not_collide() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.set("scribble:https://x.test/a-b", "1".to_string())).unwrap();
        block_on(storage.set("scribble:https://x.test/a_b", "2".to_string())).unwrap();

        assert_eq!(
            block_on(storage.get("scribble:https://x.test/a-b")).unwrap().as_deref(),
            Some("1")
        );
        assert_eq!(
            block_on(storage.get("scribble:https://x.test/a_b")).unwrap().as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_file_storage_long_key() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let key = format!("scribble:https://x.test/{}", "segment/".repeat(80));

        block_on(storage.set(&key, "[]".to_string())).unwrap();

        assert_eq!(block_on(storage.get(&key)).unwrap().as_deref(), Some("[]"));
        assert_eq!(block_on(storage.keys()).unwrap(), vec![key]);
    }

    #[test]
    fn test_file_storage_keys() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.set("one", "[]".to_string())).unwrap();
        block_on(storage.set("two", "[]".to_string())).unwrap();

        let keys = block_on(storage.keys()).unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"one".to_string()));
        assert!(keys.contains(&"two".to_string()));
    }

    #[test]
    fn test_file_storage_remove() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        block_on(storage.set("page", "[]".to_string())).unwrap();
        block_on(storage.remove("page")).unwrap();

        assert!(block_on(storage.get("page")).unwrap().is_none());
        assert!(block_on(storage.keys()).unwrap().is_empty());
    }
}
