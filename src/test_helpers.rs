//! Shared test utilities: synthetic images and blob builders.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let blob = jpeg_blob(400, 200);
//! let dims = decoded_dimensions(&output);
//! ```

use image::{DynamicImage, ImageEncoder, RgbImage};

use crate::codec::{Blob, EncodedImage, SUPPORTED_MIME};

// =========================================================================
// Synthetic images
// =========================================================================

/// Encode a gradient JPEG of the given size.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Encode a solid PNG of the given size.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// In-memory raster split into vertical thirds: red, green, blue.
pub fn striped_raster(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
        if x < width / 3 {
            image::Rgb([255, 0, 0])
        } else if x < 2 * width / 3 {
            image::Rgb([0, 255, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    }))
}

// =========================================================================
// Blob helpers
// =========================================================================

/// A JPEG-tagged blob holding a real JPEG.
pub fn jpeg_blob(width: u32, height: u32) -> Blob {
    Blob::new(create_test_jpeg(width, height), SUPPORTED_MIME)
}

/// Decode an encoded output and return its pixel size. Panics on failure.
pub fn decoded_dimensions(encoded: &EncodedImage) -> (u32, u32) {
    let blob = encoded.to_blob(512).unwrap();
    let img = image::load_from_memory(&blob.bytes)
        .unwrap_or_else(|e| panic!("output does not decode: {e}"));
    (img.width(), img.height())
}
