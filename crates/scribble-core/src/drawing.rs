//! Capture of a single freehand gesture.

use crate::stroke::Stroke;
use kurbo::Point;

/// A draw gesture in progress.
///
/// Seeded on pointer-down; every pointer-move adds a point. A gesture with
/// no movement still finishes as a valid one-point stroke (a dot).
#[derive(Debug, Clone)]
pub struct DrawingSession {
    stroke: Stroke,
}

impl DrawingSession {
    /// Begin a gesture with the current ink settings.
    pub fn begin(color: impl Into<String>, width: f64, first: Point) -> Self {
        Self {
            stroke: Stroke::new(color, width, first),
        }
    }

    /// Add a point and return the segment that should be painted.
    pub fn extend(&mut self, point: Point) -> (Point, Point) {
        let from = self.stroke.last_point().unwrap_or(point);
        self.stroke.add_point(point);
        (from, point)
    }

    /// The stroke captured so far.
    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }

    /// End the gesture and hand back the finished stroke.
    pub fn finish(self) -> Stroke {
        self.stroke
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_collects_points_in_order() {
        let mut session = DrawingSession::begin("#ff0000", 2.0, Point::new(0.0, 0.0));
        assert_eq!(
            session.extend(Point::new(5.0, 5.0)),
            (Point::new(0.0, 0.0), Point::new(5.0, 5.0))
        );
        assert_eq!(
            session.extend(Point::new(9.0, 1.0)),
            (Point::new(5.0, 5.0), Point::new(9.0, 1.0))
        );

        let stroke = session.finish();
        assert_eq!(stroke.color, "#ff0000");
        assert_eq!(
            stroke.points,
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(9.0, 1.0)]
        );
    }

    #[test]
    fn test_click_finishes_as_dot() {
        let session = DrawingSession::begin("#000000", 4.0, Point::new(3.0, 3.0));
        let stroke = session.finish();
        assert_eq!(stroke.len(), 1);
        assert_eq!(stroke.width, 4.0);
    }
}
