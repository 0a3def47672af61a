//! Session configuration.

use crate::erase::{DEFAULT_ERASE_RADIUS, ErasePolicy};
use crate::history::HistoryConfig;
use crate::persist::PersistConfig;
use crate::stroke::{DEFAULT_COLOR, DEFAULT_WIDTH};
use serde::{Deserialize, Serialize};

/// File name suggested for exported images.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "scribble.png";

/// Settings for one annotation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribbleConfig {
    /// Ink color for new strokes.
    pub default_color: String,
    /// Line weight for new strokes.
    pub default_width: f64,
    pub min_width: f64,
    pub max_width: f64,
    /// Eraser hit radius in document units.
    pub erase_radius: f64,
    pub erase_policy: ErasePolicy,
    pub history: HistoryConfig,
    pub persist: PersistConfig,
    pub export_file_name: String,
}

impl Default for ScribbleConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COLOR.to_string(),
            default_width: DEFAULT_WIDTH,
            min_width: 1.0,
            max_width: 12.0,
            erase_radius: DEFAULT_ERASE_RADIUS,
            erase_policy: ErasePolicy::default(),
            history: HistoryConfig::default(),
            persist: PersistConfig::default(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }
}
