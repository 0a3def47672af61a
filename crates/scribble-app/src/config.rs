//! Host shell configuration, read from an optional JSON file.

use crate::error::{AppError, AppResult};
use scribble_core::ScribbleConfig;
use scribble_render::DEFAULT_MAX_DIMENSION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Annotation store directory. Falls back to the platform data dir.
    pub store_dir: Option<PathBuf>,
    /// Surface size used for replay and for exporting an empty page.
    pub surface_width: u32,
    pub surface_height: u32,
    /// Largest surface width or height, in pixels. Larger extents fail
    /// instead of allocating.
    pub max_surface_px: u32,
    /// Export background as a CSS color; transparent when unset.
    pub background: Option<String>,
    pub session: ScribbleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            surface_width: 1280,
            surface_height: 800,
            max_surface_px: DEFAULT_MAX_DIMENSION,
            background: None,
            session: ScribbleConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read the config file at `path`, or the defaults when there is none.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&json).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribble_core::ErasePolicy;

    #[test]
    fn test_missing_path_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!((config.surface_width, config.surface_height), (1280, 800));
        assert!(config.store_dir.is_none());
        assert_eq!(config.max_surface_px, 8192);
    }

    #[test]
    fn test_nested_session_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scribble.json");
        fs::write(
            &path,
            r##"{ "background": "#ffffff", "session": { "erase_policy": "whole_stroke" } }"##,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.background.as_deref(), Some("#ffffff"));
        assert_eq!(config.session.erase_policy, ErasePolicy::WholeStroke);
        assert_eq!(config.session.default_width, 2.0);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            AppConfig::load(Some(&path)),
            Err(AppError::Config { .. })
        ));
    }
}
