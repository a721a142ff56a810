//! Upload validation: accepted MIME type and the 2:1 panorama contract.
//!
//! Both checks are pure and cheap; they run before any pixel work.
//!
//! ## Dimension contract
//!
//! An upload is accepted only when width and height are both even and the
//! width is exactly twice the height (equirectangular panoramas). Even sides
//! keep 4:2:0 chroma subsampling aligned on re-encode.
//!
//! - `1024x512` → valid
//! - `1023x512` → invalid (odd width)
//! - `1000x400` → invalid (ratio 2.5)

use crate::codec::{ImageSource, SUPPORTED_MIME};
use crate::imaging::{Dimensions, ImageBackend, ImagePipeline};

/// Outcome of validating one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub mime: String,
    pub type_ok: bool,
    pub dimensions: Option<Dimensions>,
    pub dimension_ok: bool,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.type_ok && self.dimension_ok
    }
}

/// True only for a blob tagged `image/jpeg`.
pub fn valid_image_type(source: &ImageSource) -> bool {
    source
        .as_blob()
        .is_some_and(|blob| blob.mime == SUPPORTED_MIME)
}

/// True when both sides are even and `width / height == 2` exactly.
pub fn valid_image_dimension(width: u32, height: u32) -> bool {
    width % 2 == 0 && height % 2 == 0 && height != 0 && u64::from(width) == 2 * u64::from(height)
}

/// Run the type check, read the size, and apply the 2:1 contract.
///
/// An upload whose size cannot be read fails the dimension check.
pub async fn check_upload<B: ImageBackend>(
    pipeline: &ImagePipeline<B>,
    source: &ImageSource,
) -> CheckReport {
    let dimensions = pipeline.get_image_dimension(source).await;
    CheckReport {
        mime: source
            .as_blob()
            .map(|blob| blob.mime.clone())
            .unwrap_or_default(),
        type_ok: valid_image_type(source),
        dimensions,
        dimension_ok: dimensions.is_some_and(|d| valid_image_dimension(d.width, d.height)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Blob;
    use crate::imaging::RustBackend;
    use crate::test_helpers::{create_test_png, jpeg_blob};
    use proptest::prelude::*;

    #[test]
    fn dimension_examples() {
        assert!(valid_image_dimension(1024, 512));
        assert!(!valid_image_dimension(1023, 512));
        assert!(valid_image_dimension(1000, 500));
        assert!(!valid_image_dimension(1000, 400));
        assert!(valid_image_dimension(400, 200));
    }

    #[test]
    fn dimension_rejects_odd_height() {
        // 2:1 but the height is odd
        assert!(!valid_image_dimension(1026, 513));
    }

    #[test]
    fn dimension_rejects_zero() {
        assert!(!valid_image_dimension(0, 0));
        assert!(!valid_image_dimension(2, 0));
    }

    #[test]
    fn dimension_rejects_inverted_ratio() {
        assert!(!valid_image_dimension(512, 1024));
    }

    #[test]
    fn dimension_handles_large_values() {
        // 2 * height overflows u32
        assert!(!valid_image_dimension(u32::MAX - 1, 2_147_483_648));
        assert!(valid_image_dimension(4_000_000_000, 2_000_000_000));
    }

    proptest! {
        #[test]
        fn even_two_to_one_is_always_valid(h in 1u32..1_000_000) {
            let h = h * 2;
            prop_assert!(valid_image_dimension(h * 2, h));
        }

        #[test]
        fn anything_else_is_invalid(w in 0u32..100_000, h in 0u32..100_000) {
            let expected = h != 0 && h % 2 == 0 && w == 2 * h;
            prop_assert_eq!(valid_image_dimension(w, h), expected);
        }
    }

    #[test]
    fn type_accepts_only_jpeg_blobs() {
        let jpeg = ImageSource::Blob(Blob::new(vec![0u8; 4], "image/jpeg"));
        let png = ImageSource::Blob(Blob::new(vec![0u8; 4], "image/png"));
        let untyped = ImageSource::Blob(Blob::new(vec![0u8; 4], ""));
        let text = ImageSource::DataUrl("data:image/jpeg;base64,/9j/".into());

        assert!(valid_image_type(&jpeg));
        assert!(!valid_image_type(&png));
        assert!(!valid_image_type(&untyped));
        assert!(!valid_image_type(&text));
    }

    #[tokio::test]
    async fn check_valid_panorama() {
        let pipeline = ImagePipeline::with_defaults(RustBackend::new());
        let report = check_upload(&pipeline, &ImageSource::Blob(jpeg_blob(400, 200))).await;
        assert!(report.is_valid());
        assert_eq!(
            report.dimensions,
            Some(Dimensions {
                width: 400,
                height: 200
            })
        );
    }

    #[tokio::test]
    async fn check_wrong_ratio_and_type() {
        let pipeline = ImagePipeline::with_defaults(RustBackend::new());
        let png = ImageSource::Blob(Blob::sniffed(create_test_png(300, 100)));
        let report = check_upload(&pipeline, &png).await;
        assert_eq!(report.mime, "image/png");
        assert!(!report.type_ok);
        assert!(!report.dimension_ok);
        assert!(!report.is_valid());
    }

    #[tokio::test]
    async fn check_text_source_has_no_dimensions() {
        let pipeline = ImagePipeline::with_defaults(RustBackend::new());
        let report = check_upload(&pipeline, &ImageSource::DataUrl("data:,".into())).await;
        assert_eq!(report.dimensions, None);
        assert!(report.mime.is_empty());
        assert!(!report.is_valid());
    }
}
