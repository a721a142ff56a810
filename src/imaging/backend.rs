//! Raster backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the set of platform capabilities the pipeline
//! calls into: decode encoded bytes to a raster, draw a raster region onto a
//! newly allocated surface, and encode a surface to JPEG.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Backends are shared across blocking worker tasks, hence the
//! `Send + Sync + 'static` bound.

use super::params::{DrawParams, Quality};
use image::DynamicImage;
use thiserror::Error;

/// A decoded, pixel-addressable image.
pub type Raster = DynamicImage;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Surface allocation failed: {0}")]
    Surface(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Natural size of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(raster: &Raster) -> Self {
        Self {
            width: raster.width(),
            height: raster.height(),
        }
    }
}

/// Trait for raster backends.
///
/// Each method is synchronous and may be CPU-heavy; the pipeline runs them on
/// blocking worker threads.
pub trait ImageBackend: Send + Sync + 'static {
    /// Decode an encoded image (JPEG, PNG) into a raster.
    fn decode(&self, bytes: &[u8]) -> Result<Raster, BackendError>;

    /// Allocate a surface of `params.surface()` and draw the source region of
    /// `raster` onto the destination region, clipped to the surface.
    fn draw(&self, raster: &Raster, params: &DrawParams) -> Result<Raster, BackendError>;

    /// Encode a surface to JPEG bytes.
    fn encode(&self, surface: &Raster, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
