//! Scribble Render Library
//!
//! Software raster implementation of the scribble surface contract, with
//! PNG export of the annotation layer.

mod raster;

pub use raster::{DEFAULT_MAX_DIMENSION, RasterSurface};
