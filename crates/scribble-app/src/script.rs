//! Scripted input: a recorded list of host events replayed against a session.

use crate::error::{AppError, AppResult};
use kurbo::{Point, Size, Vec2};
use scribble_core::{
    HostMessage, PointerEvent, ScribbleSession, Storage, Surface, SurfaceResult, ToolKind,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One host event. Pointer positions are viewport coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Scroll { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    Tool { tool: ToolKind },
    ToggleDrawing,
    Eraser,
    Color { color: String },
    Width { width: f64 },
    Undo,
    Redo,
    Clear,
    Message { message: HostMessage },
}

impl ScriptStep {
    /// Apply the step. Returns true if the stroke collection changed.
    ///
    /// Only a `resize` the surface cannot hold fails.
    pub fn apply<S: Storage, F: Surface>(
        &self,
        session: &mut ScribbleSession<S, F>,
    ) -> SurfaceResult<bool> {
        let changed = match self {
            ScriptStep::Down { x, y } => session.handle_pointer(PointerEvent::Down {
                position: Point::new(*x, *y),
            }),
            ScriptStep::Move { x, y } => session.handle_pointer(PointerEvent::Move {
                position: Point::new(*x, *y),
            }),
            ScriptStep::Up { x, y } => session.handle_pointer(PointerEvent::Up {
                position: Point::new(*x, *y),
            }),
            ScriptStep::Scroll { x, y } => {
                session.set_scroll(Vec2::new(*x, *y));
                false
            }
            ScriptStep::Resize { width, height } => {
                session.resize(Size::new(*width, *height))?;
                false
            }
            ScriptStep::Tool { tool } => {
                session.set_tool(*tool);
                false
            }
            ScriptStep::ToggleDrawing => {
                session.toggle_drawing();
                false
            }
            ScriptStep::Eraser => {
                session.select_eraser();
                false
            }
            ScriptStep::Color { color } => {
                session.set_color(color.clone());
                false
            }
            ScriptStep::Width { width } => {
                session.set_width(*width);
                false
            }
            ScriptStep::Undo => session.undo(),
            ScriptStep::Redo => session.redo(),
            ScriptStep::Clear => session.clear(),
            ScriptStep::Message { message } => {
                session.handle_message(*message);
                false
            }
        };
        Ok(changed)
    }
}

/// Read a script file: a JSON array of steps.
pub fn load_script(path: &Path) -> AppResult<Vec<ScriptStep>> {
    let json = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| AppError::Script {
        path: path.to_path_buf(),
        source,
    })
}
