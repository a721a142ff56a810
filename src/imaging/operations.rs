//! High-level image operations.
//!
//! [`ImagePipeline`] combines the geometry in
//! [`calculations`](super::calculations) with backend execution. Every entry
//! point is async: each decode, draw+encode, and verify step runs as its own
//! blocking task, and the caller suspends until that step completes. Steps
//! within one call are strictly sequenced; independent calls share nothing
//! but the backend and the configuration.
//!
//! Three failure conventions coexist on purpose:
//!
//! - [`get_image_dimension`](ImagePipeline::get_image_dimension) never fails;
//!   bad input or a decode failure yields `None`.
//! - [`load_base64`](ImagePipeline::load_base64) fails with
//!   [`PipelineError::NotABlob`] for textual input.
//! - [`resize_image`](ImagePipeline::resize_image) and
//!   [`get_thumbnail`](ImagePipeline::get_thumbnail) fail with whichever step
//!   broke: source decode, surface setup, encode, or verification.
//!
//! Output is all-or-nothing; no partial images, no retries.

use super::backend::{BackendError, Dimensions, ImageBackend, Raster};
use super::calculations::{calculate_capped_dimensions, calculate_cover_crop};
use super::params::{DrawParams, Quality};
use crate::codec::{CodecError, EncodedImage, ImageSource};
use crate::config::PipelineConfig;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Not a Blob")]
    NotABlob,
    #[error("Unreadable image reference: {0}")]
    Reference(#[from] CodecError),
    #[error("Source image failed to load: {0}")]
    Source(BackendError),
    #[error("Drawing surface setup failed: {0}")]
    Surface(BackendError),
    #[error("Encoding failed: {0}")]
    Encode(BackendError),
    #[error("Encoded image did not decode back: {0}")]
    Verify(BackendError),
    #[error("Image task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Output of [`ImagePipeline::load_base64`].
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// The re-encoded image, decoded back.
    pub image: Raster,
    /// The re-encoded image as a data-URI.
    pub image_base64: EncodedImage,
    /// Final width, after the size cap.
    pub width: u32,
    /// Final height, after the size cap.
    pub height: u32,
}

/// Plan the normalizing draw: whole raster onto a surface of the capped size.
pub fn plan_normalize(natural: (u32, u32), config: &PipelineConfig) -> DrawParams {
    let capped = calculate_capped_dimensions(natural, config.size_cap.as_tuple());
    DrawParams::stretch(natural, capped)
}

/// Plan a stretch-resize: whole raster onto exactly `out_width x out_height`.
pub fn plan_resize(natural: (u32, u32), out_width: u32, out_height: u32) -> DrawParams {
    DrawParams::stretch(natural, (out_width, out_height))
}

/// Plan a centered cover-crop onto a `crop_size` square.
pub fn plan_thumbnail(natural: (u32, u32), crop_size: u32) -> DrawParams {
    let (source, dest) = calculate_cover_crop(natural, crop_size);
    DrawParams {
        surface_width: crop_size,
        surface_height: crop_size,
        source,
        dest,
    }
}

/// Async front end over an [`ImageBackend`].
///
/// Cheap to clone; clones share the backend.
pub struct ImagePipeline<B> {
    backend: Arc<B>,
    config: PipelineConfig,
}

impl<B> Clone for ImagePipeline<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
        }
    }
}

impl<B: ImageBackend> ImagePipeline<B> {
    pub fn new(backend: B, config: PipelineConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
        }
    }

    pub fn with_defaults(backend: B) -> Self {
        Self::new(backend, PipelineConfig::default())
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Natural size of a blob, or `None` when the input is not a blob or does
    /// not decode.
    pub async fn get_image_dimension(&self, source: &ImageSource) -> Option<Dimensions> {
        let blob = source.as_blob()?;
        match self.decode(blob.bytes.clone()).await {
            Ok(raster) => Some(Dimensions::of(&raster)),
            Err(e) => {
                warn!(error = %e, mime = %blob.mime, "image dimension lookup failed");
                None
            }
        }
    }

    /// Read a blob as base64, redraw it within the size cap, and re-encode.
    pub async fn load_base64(&self, source: &ImageSource) -> Result<LoadedImage> {
        let blob = source.as_blob().ok_or(PipelineError::NotABlob)?;
        let data_url = ImageSource::DataUrl(blob.to_data_url());

        let raster = self.decode(data_url.to_bytes()?).await?;
        let natural = (raster.width(), raster.height());
        let params = plan_normalize(natural, &self.config);
        let (width, height) = params.surface();
        if (width, height) != natural {
            debug!(
                width = natural.0,
                height = natural.1,
                cap_width = width,
                cap_height = height,
                "original exceeds size cap"
            );
        }

        let (image_base64, image) = self.draw_encode_verify(raster, params).await?;
        Ok(LoadedImage {
            image,
            image_base64,
            width,
            height,
        })
    }

    /// Stretch the whole source to exactly `out_width x out_height`.
    pub async fn resize_image(
        &self,
        source: &ImageSource,
        out_width: u32,
        out_height: u32,
    ) -> Result<EncodedImage> {
        let raster = self.decode(source.to_bytes()?).await?;
        let params = plan_resize((raster.width(), raster.height()), out_width, out_height);
        let (encoded, _) = self.draw_encode_verify(raster, params).await?;
        Ok(encoded)
    }

    /// Square cover-crop thumbnail at the configured default size.
    pub async fn get_thumbnail(&self, source: &ImageSource) -> Result<EncodedImage> {
        self.get_thumbnail_sized(source, self.config.thumbnail.crop_size)
            .await
    }

    /// Square cover-crop thumbnail of `crop_size` pixels per side.
    pub async fn get_thumbnail_sized(
        &self,
        source: &ImageSource,
        crop_size: u32,
    ) -> Result<EncodedImage> {
        let raster = self.decode(source.to_bytes()?).await?;
        let params = plan_thumbnail((raster.width(), raster.height()), crop_size);
        let (encoded, _) = self.draw_encode_verify(raster, params).await?;
        Ok(encoded)
    }

    async fn decode(&self, bytes: Bytes) -> Result<Raster> {
        let backend = Arc::clone(&self.backend);
        let raster = tokio::task::spawn_blocking(move || backend.decode(&bytes))
            .await?
            .map_err(PipelineError::Source)?;
        debug!(
            width = raster.width(),
            height = raster.height(),
            "source decoded"
        );
        Ok(raster)
    }

    /// Draw, encode, then decode the result back before handing it out.
    async fn draw_encode_verify(
        &self,
        raster: Raster,
        params: DrawParams,
    ) -> Result<(EncodedImage, Raster)> {
        let backend = Arc::clone(&self.backend);
        let quality: Quality = self.config.quality();
        let encoded = tokio::task::spawn_blocking(move || {
            let surface = backend.draw(&raster, &params).map_err(PipelineError::Surface)?;
            let bytes = backend
                .encode(&surface, quality)
                .map_err(PipelineError::Encode)?;
            Ok::<_, PipelineError>(Bytes::from(bytes))
        })
        .await??;
        debug!(
            width = params.surface_width,
            height = params.surface_height,
            bytes = encoded.len(),
            "surface encoded"
        );

        let backend = Arc::clone(&self.backend);
        let check = encoded.clone();
        let verified = tokio::task::spawn_blocking(move || backend.decode(&check))
            .await?
            .map_err(PipelineError::Verify)?;

        Ok((EncodedImage::from_jpeg(&encoded), verified))
    }
}
