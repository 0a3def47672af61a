//! Freehand stroke model.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Ink color used when none is configured.
pub const DEFAULT_COLOR: &str = "#ff0000";

/// Line weight used when none is configured.
pub const DEFAULT_WIDTH: f64 = 2.0;

/// A stroke trimmed by the eraser is dropped once it has fewer points than this.
pub const MIN_TRIMMED_POINTS: usize = 2;

/// One continuous freehand line.
///
/// Points are in document coordinates and kept in drawing order.
/// The serialized form is the persisted record:
/// `{ "color": "#ff0000", "width": 2, "points": [{ "x": 1, "y": 2 }] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// CSS color string, e.g. `#ff0000`.
    pub color: String,
    /// Line weight in document units.
    pub width: f64,
    /// Sample points in drawing order.
    pub points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at its first point.
    pub fn new(color: impl Into<String>, width: f64, first: Point) -> Self {
        Self {
            color: color.into(),
            width,
            points: vec![first],
        }
    }

    /// Create from existing points.
    pub fn from_points(color: impl Into<String>, width: f64, points: Vec<Point>) -> Self {
        Self {
            color: color.into(),
            width,
            points,
        }
    }

    /// Add a point to the end of the line.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recently added point.
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Bounding box of the sample points (ignores line width).
    pub fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        Some(
            rest.iter()
                .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p)),
        )
    }

    /// Whether any sample point lies within `radius` of `center`.
    pub fn hit_by(&self, center: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance(center) <= radius)
    }
}

/// Drop strokes that cannot be drawn and repair bad widths.
///
/// Used on data coming back from storage, which may have been written by
/// another version or edited by hand.
pub fn sanitize_strokes(strokes: Vec<Stroke>, default_width: f64) -> Vec<Stroke> {
    let before = strokes.len();
    let sanitized: Vec<Stroke> = strokes
        .into_iter()
        .filter_map(|mut stroke| {
            stroke
                .points
                .retain(|p| p.x.is_finite() && p.y.is_finite());
            if stroke.points.is_empty() {
                return None;
            }
            if !stroke.width.is_finite() || stroke.width <= 0.0 {
                stroke.width = default_width;
            }
            Some(stroke)
        })
        .collect();

    if sanitized.len() != before {
        log::warn!(
            "Dropped {} unusable strokes from stored data",
            before - sanitized.len()
        );
    }
    sanitized
}
