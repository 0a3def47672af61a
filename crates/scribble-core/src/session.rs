//! Annotation session: the single state object driving one page.
//!
//! Owns the stroke store, history, the current gesture and tool settings.
//! Every change to the collection goes through [`ScribbleSession::commit`],
//! which queues persistence and repaints the surface in the same step.

use crate::config::ScribbleConfig;
use crate::drawing::DrawingSession;
use crate::erase::{EraseEngine, EraseGesture};
use crate::history::HistoryManager;
use crate::input::{PointerEvent, Viewport};
use crate::page::PageKey;
use crate::persist::{FlushOutcome, PersistQueue};
use crate::render::{Renderer, Surface, SurfaceResult};
use crate::storage::Storage;
use crate::store::StrokeStore;
use crate::stroke::Stroke;
use crate::tools::{CursorStyle, ToolKind, ToolSettings};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether the persisted collection has arrived yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the initial load; input and commands are ignored.
    Loading,
    Ready,
}

/// The gesture currently in progress.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Drawing(DrawingSession),
    Erasing(EraseGesture),
}

/// Messages a host controller can send to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    /// Show or hide the annotation controls.
    #[serde(rename = "TOGGLE_TOOLBAR")]
    ToggleVisibility,
}

/// A rendered export of the drawing surface.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    /// Suggested file name.
    pub file_name: String,
    /// PNG bytes.
    pub bytes: Vec<u8>,
}

/// One annotated page.
///
/// Mutations repaint the surface immediately but only queue their write:
/// nothing reaches storage until the host awaits [`ScribbleSession::flush`].
/// Hosts should flush after each handled event batch and before dropping
/// the session, or the latest edits are lost.
pub struct ScribbleSession<S: Storage, F: Surface> {
    config: ScribbleConfig,
    phase: SessionPhase,
    store: StrokeStore,
    history: HistoryManager,
    gesture: Gesture,
    tools: ToolSettings,
    eraser: EraseEngine,
    renderer: Renderer,
    viewport: Viewport,
    visible: bool,
    surface: F,
    persist: PersistQueue<S>,
}

impl<S: Storage, F: Surface> ScribbleSession<S, F> {
    /// Create a session for `key`. It starts in [`SessionPhase::Loading`].
    pub fn new(config: ScribbleConfig, key: PageKey, storage: Arc<S>, surface: F) -> Self {
        Self {
            phase: SessionPhase::Loading,
            store: StrokeStore::new(),
            history: HistoryManager::new(&config.history),
            gesture: Gesture::Idle,
            tools: ToolSettings::new(&config),
            eraser: EraseEngine::new(config.erase_radius, config.erase_policy),
            renderer: Renderer::new(&config.default_color),
            viewport: Viewport::default(),
            visible: true,
            surface,
            persist: PersistQueue::new(storage, key, config.persist.clone()),
            config,
        }
    }

    /// Load the persisted collection and become ready.
    ///
    /// Returns the number of strokes loaded, or `None` if the session was
    /// already ready (the late result is discarded).
    pub async fn load(&mut self) -> Option<usize> {
        if self.phase == SessionPhase::Ready {
            log::debug!("Session for {} already loaded", self.persist.key());
            return None;
        }
        let storage = Arc::clone(self.persist.storage());
        let strokes =
            StrokeStore::load(storage.as_ref(), self.persist.key(), self.config.default_width)
                .await;
        let count = strokes.len();
        self.finish_load(strokes).then_some(count)
    }

    /// Apply the result of the initial load.
    ///
    /// Only the first result is applied; anything arriving after the session
    /// became ready would overwrite newer edits and is ignored.
    pub fn finish_load(&mut self, strokes: Vec<Stroke>) -> bool {
        if self.phase == SessionPhase::Ready {
            log::warn!(
                "Ignoring superseded load result for {}",
                self.persist.key()
            );
            return false;
        }
        log::info!("Loaded {} strokes for {}", strokes.len(), self.persist.key());
        self.store = StrokeStore::from_strokes(strokes);
        self.history.clear();
        self.phase = SessionPhase::Ready;
        self.redraw();
        true
    }

    fn ensure_ready(&self, action: &str) -> bool {
        if self.phase == SessionPhase::Loading {
            log::debug!("Ignoring {} before annotations have loaded", action);
            return false;
        }
        true
    }

    /// Feed one pointer event. Returns true if the collection changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let position = self.viewport.to_document(event.position());
        match event {
            PointerEvent::Down { .. } => self.pointer_down(position),
            PointerEvent::Move { .. } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.end_gesture(),
        }
    }

    fn pointer_down(&mut self, position: Point) -> bool {
        if !self.ensure_ready("pointer input") || !self.accepts_pointer() {
            return false;
        }
        // A hover erase already open keeps its undo step when the button goes down.
        let continue_erase =
            self.tools.tool == ToolKind::Erase && matches!(self.gesture, Gesture::Erasing(_));
        let mut changed = if continue_erase { false } else { self.end_gesture() };

        match self.tools.tool {
            ToolKind::Draw => {
                self.history.snapshot_before_action(self.store.snapshot());
                let session =
                    DrawingSession::begin(self.tools.color(), self.tools.width(), position);
                let paint = self.renderer.paint_for(session.stroke());
                self.renderer
                    .draw_segment(&mut self.surface, position, position, &paint);
                self.gesture = Gesture::Drawing(session);
            }
            ToolKind::Erase => {
                if !continue_erase {
                    self.gesture = Gesture::Erasing(EraseGesture::default());
                }
                changed |= self.erase_at(position);
            }
        }
        changed
    }

    fn pointer_move(&mut self, position: Point) -> bool {
        if !self.tools.enabled {
            return false;
        }
        if let Gesture::Drawing(session) = &mut self.gesture {
            let (from, to) = session.extend(position);
            let paint = self.renderer.paint_for(session.stroke());
            self.renderer.draw_segment(&mut self.surface, from, to, &paint);
            return false;
        }
        if matches!(self.gesture, Gesture::Erasing(_)) {
            if self.tools.tool == ToolKind::Erase {
                return self.erase_at(position);
            }
            self.end_gesture();
            return false;
        }
        // The eraser works on hover too; the gesture runs until the next release.
        if self.phase == SessionPhase::Ready
            && self.accepts_pointer()
            && self.tools.tool == ToolKind::Erase
        {
            self.gesture = Gesture::Erasing(EraseGesture::default());
            return self.erase_at(position);
        }
        false
    }

    /// Finish whatever gesture is active. Returns true if a stroke was added.
    fn end_gesture(&mut self) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Drawing(session) => {
                self.store.append(session.finish());
                self.commit();
                true
            }
            Gesture::Erasing(gesture) => {
                if gesture.has_erased() {
                    log::debug!("Erase gesture finished");
                }
                false
            }
            Gesture::Idle => false,
        }
    }

    fn erase_at(&mut self, position: Point) -> bool {
        let Some(erased) = self.eraser.erase_at(self.store.strokes(), position) else {
            return false;
        };
        if let Gesture::Erasing(gesture) = &mut self.gesture {
            if gesture.record_hit() {
                self.history.snapshot_before_action(self.store.snapshot());
            }
        }
        self.store.replace(Arc::new(erased));
        self.commit();
        true
    }

    /// Persist and repaint after a change to the collection.
    fn commit(&mut self) {
        self.store.persist(&mut self.persist);
        self.redraw();
    }

    fn redraw(&mut self) {
        self.renderer.redraw_all(&mut self.surface, self.store.strokes());
    }

    /// Undo the last action. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.ensure_ready("undo") {
            return false;
        }
        self.end_gesture();
        match self.history.undo(self.store.snapshot()) {
            Some(previous) => {
                self.store.replace(previous);
                self.commit();
                true
            }
            None => false,
        }
    }

    /// Redo the last undone action. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.ensure_ready("redo") {
            return false;
        }
        self.end_gesture();
        match self.history.redo(self.store.snapshot()) {
            Some(next) => {
                self.store.replace(next);
                self.commit();
                true
            }
            None => false,
        }
    }

    /// Remove every stroke as one undoable action.
    ///
    /// Clearing is always recorded, even on an empty page, so it discards
    /// pending redo history like any other action.
    pub fn clear(&mut self) -> bool {
        if !self.ensure_ready("clear") {
            return false;
        }
        self.end_gesture();
        self.history.snapshot_before_action(self.store.snapshot());
        self.store.replace(Arc::new(Vec::new()));
        self.commit();
        true
    }

    /// Rasterize the current surface.
    pub fn export(&self) -> SurfaceResult<ExportedImage> {
        let bytes = self.surface.encode_png()?;
        log::info!(
            "Exported {} ({} bytes)",
            self.config.export_file_name,
            bytes.len()
        );
        Ok(ExportedImage {
            file_name: self.config.export_file_name.clone(),
            bytes,
        })
    }

    /// Track a new document extent. The bitmap is lost on resize, so the
    /// whole collection is repainted.
    ///
    /// A size the surface cannot hold is rejected and the surface keeps its
    /// previous extent.
    pub fn resize(&mut self, size: Size) -> SurfaceResult<()> {
        self.surface.resize(size)?;
        self.redraw();
        Ok(())
    }

    /// Update the viewport scroll offset used for pointer positions.
    pub fn set_scroll(&mut self, scroll: Vec2) {
        self.viewport.scroll = scroll;
    }

    /// React to a host controller message.
    pub fn handle_message(&mut self, message: HostMessage) {
        match message {
            HostMessage::ToggleVisibility => self.set_visible(!self.visible),
        }
    }

    /// Show or hide the controls. Hiding disables input and resets the tool.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.tools.reset();
        }
    }

    /// Toolbar toggle: flip drawing on or off, back on the draw tool.
    pub fn toggle_drawing(&mut self) {
        self.tools.toggle();
    }

    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        self.tools.enabled = enabled;
        if !enabled {
            self.tools.tool = ToolKind::Draw;
        }
    }

    /// Toolbar eraser button: enable input with the erase tool.
    pub fn select_eraser(&mut self) {
        self.tools.select_eraser();
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.tool = tool;
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.tools.set_color(color);
    }

    pub fn set_width(&mut self, width: f64) {
        self.tools.set_width(width);
    }

    /// Write pending changes to storage.
    pub async fn flush(&mut self) -> FlushOutcome {
        self.persist.flush().await
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SessionPhase::Ready
    }

    /// Strokes in z-order (back to front).
    pub fn strokes(&self) -> &[Stroke] {
        self.store.strokes()
    }

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn drawing_enabled(&self) -> bool {
        self.tools.enabled
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.tool
    }

    pub fn color(&self) -> &str {
        self.tools.color()
    }

    pub fn width(&self) -> f64 {
        self.tools.width()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the surface should capture pointer input. When false the host
    /// lets pointer events pass through to the document.
    pub fn accepts_pointer(&self) -> bool {
        self.visible && self.tools.enabled
    }

    pub fn cursor(&self) -> CursorStyle {
        self.tools.cursor()
    }

    pub fn key(&self) -> &PageKey {
        self.persist.key()
    }

    pub fn persist_queue(&self) -> &PersistQueue<S> {
        &self.persist
    }

    pub fn surface(&self) -> &F {
        &self.surface
    }

    pub fn config(&self) -> &ScribbleConfig {
        &self.config
    }
}
