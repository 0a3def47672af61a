//! Storage abstraction for persisted annotations.
//!
//! Backends are plain key/value stores of serialized JSON, the same shape
//! as a browser extension's local storage area. Decoding and validation of
//! the values is the caller's job (see [`crate::store::StrokeStore::load`]).

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for key/value storage backends.
pub trait Storage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, StorageResult<()>>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored keys.
    fn keys(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;
}
