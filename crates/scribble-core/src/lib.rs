//! Scribble Core Library
//!
//! Stroke, history and erase engine for a persistent freehand annotation
//! layer drawn over a document.

pub mod config;
pub mod drawing;
pub mod erase;
pub mod history;
pub mod input;
pub mod page;
pub mod persist;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;
pub mod stroke;
pub mod tools;

pub use config::ScribbleConfig;
pub use drawing::DrawingSession;
pub use erase::{EraseEngine, EraseGesture, ErasePolicy};
pub use history::{HistoryConfig, HistoryManager, Snapshot};
pub use input::{PointerEvent, Viewport};
pub use page::{PageKey, PageKeyError};
pub use persist::{FlushOutcome, PersistConfig, PersistQueue};
pub use render::{RecordingSurface, Renderer, StrokePaint, Surface, SurfaceError, SurfaceResult};
pub use session::{ExportedImage, Gesture, HostMessage, ScribbleSession, SessionPhase};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use store::StrokeStore;
pub use stroke::Stroke;
pub use tools::{CursorStyle, ToolKind, ToolSettings};
