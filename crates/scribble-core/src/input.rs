//! Pointer input in viewport coordinates.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Pointer event type for unified mouse/touch/pen handling.
///
/// Positions are relative to the viewport; the session converts them to
/// document coordinates with the current [`Viewport`] scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    /// Release observed anywhere, including outside the drawing surface.
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => position,
        }
    }
}

/// Scroll state of the host document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Scroll offset of the viewport within the document.
    pub scroll: Vec2,
}

impl Viewport {
    /// Convert a viewport position into document coordinates, which stay
    /// valid as the page scrolls.
    pub fn to_document(&self, position: Point) -> Point {
        position + self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_document_adds_scroll() {
        let viewport = Viewport {
            scroll: Vec2::new(0.0, 250.0),
        };
        assert_eq!(
            viewport.to_document(Point::new(10.0, 20.0)),
            Point::new(10.0, 270.0)
        );
    }

    #[test]
    fn test_event_position() {
        let event = PointerEvent::Up {
            position: Point::new(1.0, 2.0),
        };
        assert_eq!(event.position(), Point::new(1.0, 2.0));
    }
}
