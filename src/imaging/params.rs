//! Parameter types for image operations.
//!
//! These structs describe *what* to draw and encode, not *how*. They are the
//! interface between the [`operations`](super::operations) pipeline (which
//! decides the geometry) and the [`backend`](super::backend) (which does the
//! pixel work), so a mock backend can record them in tests.
//!
//! ## Types
//!
//! - [`Quality`] — JPEG encoding quality (1–100, default 92). Clamped on construction.
//! - [`DrawParams`] — one draw call: surface size, source rectangle, destination rectangle.

use super::calculations::Rect;

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    /// Matches the 0.92 default of canvas JPEG export.
    fn default() -> Self {
        Self(92)
    }
}

/// Parameters for drawing a raster onto a freshly allocated surface.
///
/// The destination rectangle may extend past the surface; the overhang is
/// clipped, which is how cover-crops are produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub surface_width: u32,
    pub surface_height: u32,
    pub source: Rect,
    pub dest: Rect,
}

impl DrawParams {
    /// Draw the whole raster stretched over the whole surface.
    pub fn stretch(raster: (u32, u32), surface: (u32, u32)) -> Self {
        Self {
            surface_width: surface.0,
            surface_height: surface.1,
            source: Rect::sized(raster.0 as f64, raster.1 as f64),
            dest: Rect::sized(surface.0 as f64, surface.1 as f64),
        }
    }

    pub fn surface(&self) -> (u32, u32) {
        (self.surface_width, self.surface_height)
    }
}
