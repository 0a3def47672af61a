//! Pointer hit-testing eraser.

use crate::stroke::{MIN_TRIMMED_POINTS, Stroke};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default eraser radius in document units.
pub const DEFAULT_ERASE_RADIUS: f64 = 12.0;

/// What happens to a stroke the eraser touches.
///
/// Chosen once per session and applied to every stroke alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErasePolicy {
    /// Remove only the points under the eraser; drop the stroke if fewer
    /// than two points survive.
    #[default]
    TrimPoints,
    /// Remove the whole stroke if any of its points is under the eraser.
    WholeStroke,
}

/// Per-gesture eraser state.
///
/// Dropped on pointer-release, which resets the "already snapshotted" flag
/// whether or not anything was erased.
#[derive(Debug, Clone, Default)]
pub struct EraseGesture {
    snapshot_taken: bool,
}

impl EraseGesture {
    /// Mark a hit. Returns true only for the first hit of the gesture.
    pub fn record_hit(&mut self) -> bool {
        !std::mem::replace(&mut self.snapshot_taken, true)
    }

    /// Whether this gesture has erased anything yet.
    pub fn has_erased(&self) -> bool {
        self.snapshot_taken
    }
}

/// Hit tests the pointer against strokes and computes the erased collection.
#[derive(Debug, Clone, Copy)]
pub struct EraseEngine {
    radius: f64,
    policy: ErasePolicy,
}

impl Default for EraseEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ERASE_RADIUS, ErasePolicy::default())
    }
}

impl EraseEngine {
    pub fn new(radius: f64, policy: ErasePolicy) -> Self {
        Self { radius, policy }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn policy(&self) -> ErasePolicy {
        self.policy
    }

    /// Erase around `center`.
    ///
    /// Returns the new collection, or `None` when nothing was hit, so callers
    /// can skip redraw and persistence while hovering empty space.
    pub fn erase_at(&self, strokes: &[Stroke], center: Point) -> Option<Vec<Stroke>> {
        if !strokes.iter().any(|s| s.hit_by(center, self.radius)) {
            return None;
        }

        let erased = match self.policy {
            ErasePolicy::WholeStroke => strokes
                .iter()
                .filter(|s| !s.hit_by(center, self.radius))
                .cloned()
                .collect(),
            ErasePolicy::TrimPoints => strokes
                .iter()
                .filter_map(|s| self.trim(s, center))
                .collect(),
        };
        Some(erased)
    }

    fn trim(&self, stroke: &Stroke, center: Point) -> Option<Stroke> {
        if !stroke.hit_by(center, self.radius) {
            return Some(stroke.clone());
        }
        let points: Vec<Point> = stroke
            .points
            .iter()
            .copied()
            .filter(|p| p.distance(center) > self.radius)
            .collect();
        if points.len() < MIN_TRIMMED_POINTS {
            return None;
        }
        Some(Stroke::from_points(stroke.color.clone(), stroke.width, points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(y: f64, xs: &[f64]) -> Stroke {
        Stroke::from_points(
            "#ff0000",
            2.0,
            xs.iter().map(|&x| Point::new(x, y)).collect(),
        )
    }

    #[test]
    fn test_miss_returns_none() {
        let engine = EraseEngine::default();
        let strokes = vec![line(0.0, &[0.0, 10.0, 20.0])];
        assert!(engine.erase_at(&strokes, Point::new(10.0, 100.0)).is_none());
    }

    #[test]
    fn test_whole_stroke_policy() {
        let engine = EraseEngine::new(5.0, ErasePolicy::WholeStroke);
        let a = line(0.0, &[0.0, 10.0, 20.0]);
        let b = line(100.0, &[0.0, 10.0]);

        let erased = engine.erase_at(&[a, b.clone()], Point::new(10.0, 1.0)).unwrap();
        assert_eq!(erased, vec![b]);
    }

    #[test]
    fn test_trim_keeps_remaining_points() {
        let engine = EraseEngine::new(5.0, ErasePolicy::TrimPoints);
        let a = line(0.0, &[0.0, 10.0, 20.0, 30.0]);
        let b = line(100.0, &[0.0, 10.0]);

        let erased = engine
            .erase_at(&[a, b.clone()], Point::new(10.0, 0.0))
            .unwrap();
        assert_eq!(erased, vec![line(0.0, &[0.0, 20.0, 30.0]), b]);
    }

    #[test]
    fn test_trim_drops_degenerate_stroke() {
        let engine = EraseEngine::new(5.0, ErasePolicy::TrimPoints);
        let a = line(0.0, &[0.0, 10.0]);

        let erased = engine.erase_at(&[a], Point::new(10.0, 0.0)).unwrap();
        assert!(erased.is_empty());
    }

    #[test]
    fn test_untouched_dot_survives_trim() {
        let engine = EraseEngine::new(5.0, ErasePolicy::TrimPoints);
        let dot = line(50.0, &[50.0]);
        let a = line(0.0, &[0.0, 1.0]);

        let erased = engine.erase_at(&[dot.clone(), a], Point::new(0.0, 0.0)).unwrap();
        assert_eq!(erased, vec![dot]);
    }

    #[test]
    fn test_hit_radius_is_inclusive() {
        let engine = EraseEngine::new(5.0, ErasePolicy::WholeStroke);
        let a = line(0.0, &[0.0]);
        assert!(engine.erase_at(&[a], Point::new(3.0, 4.0)).is_some());
    }

    #[test]
    fn test_gesture_first_hit_only() {
        let mut gesture = EraseGesture::default();
        assert!(!gesture.has_erased());
        assert!(gesture.record_hit());
        assert!(!gesture.record_hit());
        assert!(gesture.has_erased());
    }
}
