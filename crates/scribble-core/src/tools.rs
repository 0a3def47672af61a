//! Tool selection and ink settings.

use crate::config::ScribbleConfig;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Draw,
    Erase,
}

/// Pointer cursor the host should show over the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    Crosshair,
}

/// Current tool, ink and enable state.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Whether pointer input draws or erases at all.
    pub enabled: bool,
    /// Currently selected tool.
    pub tool: ToolKind,
    color: String,
    width: f64,
    min_width: f64,
    max_width: f64,
}

impl ToolSettings {
    pub fn new(config: &ScribbleConfig) -> Self {
        let mut settings = Self {
            enabled: false,
            tool: ToolKind::Draw,
            color: config.default_color.clone(),
            width: config.default_width,
            min_width: config.min_width,
            max_width: config.max_width.max(config.min_width),
        };
        settings.set_width(config.default_width);
        settings
    }

    /// Flip drawing on or off. Always returns to the draw tool.
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
        self.tool = ToolKind::Draw;
    }

    /// Switch to the eraser, enabling input if needed.
    pub fn select_eraser(&mut self) {
        self.enabled = true;
        self.tool = ToolKind::Erase;
    }

    /// Disable input and reset to the draw tool.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.tool = ToolKind::Draw;
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Set the line weight, clamped to the configured range.
    pub fn set_width(&mut self, width: f64) {
        if !width.is_finite() {
            log::debug!("Ignoring non-finite stroke width");
            return;
        }
        self.width = width.clamp(self.min_width, self.max_width);
    }

    pub fn cursor(&self) -> CursorStyle {
        match (self.enabled, self.tool) {
            (true, ToolKind::Erase) => CursorStyle::Crosshair,
            _ => CursorStyle::Default,
        }
    }
}
