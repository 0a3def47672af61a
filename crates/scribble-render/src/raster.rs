//! CPU raster surface.
//!
//! Strokes are painted as round-capped capsules per segment: a pixel is
//! covered when its center lies within half the line width of the segment.
//! No anti-aliasing.

use image::{Rgba, RgbaImage};
use kurbo::{Point, Size};
use peniko::Color;
use scribble_core::render::{StrokePaint, Surface, SurfaceError, SurfaceResult};

/// Thinnest line that still covers pixel centers along its path.
const MIN_RADIUS: f64 = 0.5;

/// Default limit on either side of the surface, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

/// Drawing surface backed by an RGBA8 buffer.
pub struct RasterSurface {
    image: RgbaImage,
    /// Fill used by `clear`; transparent when `None`.
    background: Option<Color>,
    /// Largest width or height `resize` will allocate.
    max_dimension: u32,
}

impl RasterSurface {
    /// Create a transparent surface.
    ///
    /// The initial size is not checked against the dimension limit; size
    /// untrusted extents through [`Surface::resize`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            background: None,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Set the largest width or height accepted by `resize`.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Set the background painted by `clear`.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self.clear();
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA value at a pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    fn fill_capsule(&mut self, start: Point, end: Point, radius: f64, color: [u8; 4]) {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        let min_x = (start.x.min(end.x) - radius).floor().max(0.0);
        let min_y = (start.y.min(end.y) - radius).floor().max(0.0);
        let max_x = (start.x.max(end.x) + radius).ceil().min(width as f64 - 1.0);
        let max_y = (start.y.max(end.y) + radius).ceil().min(height as f64 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let radius_sq = radius * radius;
        for y in min_y as u32..=max_y as u32 {
            for x in min_x as u32..=max_x as u32 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if distance_sq_to_segment(center, start, end) <= radius_sq {
                    blend(self.image.get_pixel_mut(x, y), color);
                }
            }
        }
    }
}

/// Squared distance from `point` to the segment `start..end`.
fn distance_sq_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let line_vec = end - start;
    let point_vec = point - start;
    let line_len_sq = line_vec.hypot2();
    if line_len_sq < f64::EPSILON {
        return point_vec.hypot2();
    }
    let t = (point_vec.dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = start + line_vec * t;
    (point - projection).hypot2()
}

/// Source-over blend of a straight-alpha color onto a pixel.
fn blend(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let src_a = src[3] as f64 / 255.0;
    if src_a >= 1.0 {
        dst.0 = src;
        return;
    }
    let dst_a = dst.0[3] as f64 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        dst.0 = [0, 0, 0, 0];
        return;
    }
    for channel in 0..3 {
        let s = src[channel] as f64 * src_a;
        let d = dst.0[channel] as f64 * dst_a * (1.0 - src_a);
        dst.0[channel] = ((s + d) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}

fn to_rgba(color: Color) -> [u8; 4] {
    let rgba = color.to_rgba8();
    [rgba.r, rgba.g, rgba.b, rgba.a]
}

impl Surface for RasterSurface {
    fn size(&self) -> Size {
        Size::new(self.image.width() as f64, self.image.height() as f64)
    }

    fn resize(&mut self, size: Size) -> SurfaceResult<()> {
        let width = size.width.max(0.0).ceil();
        let height = size.height.max(0.0).ceil();
        let max = self.max_dimension as f64;
        if !(width <= max && height <= max) {
            log::warn!(
                "Refusing to resize raster surface to {}x{} (limit {})",
                size.width,
                size.height,
                self.max_dimension
            );
            return Err(SurfaceError::TooLarge {
                width: size.width,
                height: size.height,
                max: self.max_dimension,
            });
        }
        log::debug!("Resizing raster surface to {}x{}", width, height);
        self.image = RgbaImage::new(width as u32, height as u32);
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        let fill = self.background.map(to_rgba).unwrap_or([0, 0, 0, 0]);
        for pixel in self.image.pixels_mut() {
            pixel.0 = fill;
        }
    }

    fn stroke_polyline(&mut self, points: &[Point], paint: &StrokePaint) {
        let radius = (paint.width / 2.0).max(MIN_RADIUS);
        let color = to_rgba(paint.color);
        match points {
            [] => {}
            [dot] => self.fill_capsule(*dot, *dot, radius, color),
            _ => {
                for segment in points.windows(2) {
                    self.fill_capsule(segment[0], segment[1], radius, color);
                }
            }
        }
    }

    fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(SurfaceError::Empty);
        }

        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| SurfaceError::Encode(e.to_string()))?;
            writer
                .write_image_data(self.image.as_raw())
                .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        }
        Ok(png_data)
    }
}
