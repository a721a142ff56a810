//! Pure Rust raster backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Capability | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::load_from_memory` |
//! | Allocate surface | `image::RgbImage::new` (black fill) |
//! | Draw region | `crop_imm` + `resize_exact` (`Triangle`) + `imageops::replace` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! Transparent sources are composited onto black before drawing, which is what
//! a JPEG export of a transparent surface shows.

use super::backend::{BackendError, ImageBackend, Raster};
use super::calculations::calculate_draw_region;
use super::params::{DrawParams, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageEncoder, RgbImage};

/// Largest surface side accepted, matching common 2-D canvas limits.
pub const MAX_SURFACE_SIDE: u32 = 32_767;
/// Largest surface area in pixels (16384 x 16384).
pub const MAX_SURFACE_AREA: u64 = 268_435_456;

/// Raster backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-capability mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop alpha by compositing onto black.
fn flatten(raster: &DynamicImage) -> RgbImage {
    if !raster.color().has_alpha() {
        return raster.to_rgb8();
    }
    let rgba = raster.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, BackendError> {
        image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn draw(&self, raster: &Raster, params: &DrawParams) -> Result<Raster, BackendError> {
        let (width, height) = params.surface();
        if width == 0
            || height == 0
            || width > MAX_SURFACE_SIDE
            || height > MAX_SURFACE_SIDE
            || u64::from(width) * u64::from(height) > MAX_SURFACE_AREA
        {
            return Err(BackendError::Surface(format!(
                "Invalid surface size {width}x{height}"
            )));
        }
        let mut surface = RgbImage::new(width, height);

        let region = calculate_draw_region(
            (raster.width(), raster.height()),
            params.source,
            params.dest,
            (width, height),
        );
        if let Some(region) = region {
            let src = region.source;
            let cropped = raster.crop_imm(src.x, src.y, src.width, src.height);
            let scaled = cropped.resize_exact(
                region.dest.width,
                region.dest.height,
                FilterType::Triangle,
            );
            imageops::replace(
                &mut surface,
                &flatten(&scaled),
                region.dest.x as i64,
                region.dest.y as i64,
            );
        }

        Ok(DynamicImage::ImageRgb8(surface))
    }

    fn encode(&self, surface: &Raster, quality: Quality) -> Result<Vec<u8>, BackendError> {
        let rgb = flatten(surface);
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality.value())
            .write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| BackendError::Encode(e.to_string()))?;
        Ok(buf)
    }
}
