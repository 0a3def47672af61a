//! Host shell errors.

use scribble_core::{PageKeyError, StorageError, SurfaceError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the `scribble` command line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    PageKey(#[from] PageKeyError),
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Annotations for {0} could not be saved")]
    PersistDropped(String),
}

pub type AppResult<T> = Result<T, AppError>;
