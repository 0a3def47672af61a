//! Renderer contract: replaying strokes onto a drawing surface.

use crate::stroke::{DEFAULT_COLOR, Stroke};
use kurbo::{Point, Size};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use thiserror::Error;

/// Surface errors.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface has no pixels to export")]
    Empty,
    #[error("Export is not supported by this surface")]
    Unsupported,
    #[error("Surface size {width}x{height} exceeds the {max}px limit")]
    TooLarge { width: f64, height: f64, max: u32 },
    #[error("Image encoding failed: {0}")]
    Encode(String),
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Resolved paint for one stroke.
#[derive(Debug, Clone, Copy)]
pub struct StrokePaint {
    pub color: Color,
    pub width: f64,
}

/// A raster drawing surface sized to the document's scrollable extent.
pub trait Surface {
    /// Current surface size in document units.
    fn size(&self) -> Size;

    /// Resize the surface. Resizing discards the existing bitmap.
    ///
    /// Fails without touching the surface if `size` is too large to allocate.
    fn resize(&mut self, size: Size) -> SurfaceResult<()>;

    /// Clear every pixel.
    fn clear(&mut self);

    /// Stroke a connected polyline. A single point paints a round dot.
    fn stroke_polyline(&mut self, points: &[Point], paint: &StrokePaint);

    /// Encode the current pixels as a PNG image.
    fn encode_png(&self) -> SurfaceResult<Vec<u8>>;
}

/// Parse a CSS color string (`#rgb`, `#rrggbb`, `rgb(...)`, named colors).
pub fn parse_css_color(value: &str) -> Option<Color> {
    parse_color(value)
        .ok()
        .map(|color| color.to_alpha_color::<Srgb>())
}

/// Replays stroke collections onto a [`Surface`].
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    fallback_color: Color,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR)
    }
}

impl Renderer {
    /// Create a renderer that paints unparsable colors with `fallback`.
    pub fn new(fallback: &str) -> Self {
        Self {
            fallback_color: parse_css_color(fallback)
                .unwrap_or(Color::from_rgba8(255, 0, 0, 255)),
        }
    }

    /// Resolve the paint for a stroke.
    pub fn paint_for(&self, stroke: &Stroke) -> StrokePaint {
        self.paint(&stroke.color, stroke.width)
    }

    /// Resolve a color string and width into paint.
    pub fn paint(&self, color: &str, width: f64) -> StrokePaint {
        let color = parse_css_color(color).unwrap_or_else(|| {
            log::warn!("Unrecognized stroke color {:?}, using fallback", color);
            self.fallback_color
        });
        StrokePaint { color, width }
    }

    /// Clear the surface and repaint every stroke in collection order.
    pub fn redraw_all<F: Surface + ?Sized>(&self, surface: &mut F, strokes: &[Stroke]) {
        surface.clear();
        for stroke in strokes {
            if stroke.is_empty() {
                continue;
            }
            surface.stroke_polyline(&stroke.points, &self.paint_for(stroke));
        }
    }

    /// Paint one segment of a stroke still being drawn.
    pub fn draw_segment<F: Surface + ?Sized>(
        &self,
        surface: &mut F,
        from: Point,
        to: Point,
        paint: &StrokePaint,
    ) {
        if from == to {
            surface.stroke_polyline(&[to], paint);
        } else {
            surface.stroke_polyline(&[from, to], paint);
        }
    }
}

/// Surface that records calls instead of drawing. Useful in tests and for
/// hosts that only need to know when a repaint happened.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: Size,
    /// Number of `clear` calls, i.e. full repaints.
    pub clears: usize,
    /// Number of `resize` calls.
    pub resizes: usize,
    /// Every polyline painted since the last clear.
    pub polylines: Vec<Vec<Point>>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) -> SurfaceResult<()> {
        self.size = size;
        self.resizes += 1;
        self.polylines.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.polylines.clear();
    }

    fn stroke_polyline(&mut self, points: &[Point], _paint: &StrokePaint) {
        self.polylines.push(points.to_vec());
    }

    fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        Err(SurfaceError::Unsupported)
    }
}
