//! Pipeline configuration.
//!
//! Handles loading and validating a `panoprep.toml` file. Every value has a
//! default, so the file is optional and may be sparse.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [size_cap]
//! max_width = 8192          # Originals wider than this are replaced by the cap
//! max_height = 4096         # Originals taller than this are replaced by the cap
//!
//! [encode]
//! quality = 92              # JPEG quality (1-100)
//!
//! [thumbnail]
//! crop_size = 256           # Side of the square thumbnail
//!
//! [codec]
//! slice_size = 512          # Chunk size when decoding base64 to binary
//! ```
//!
//! ## Size cap
//!
//! When either side of an original exceeds its limit, **both** sides are
//! replaced by the cap values; the aspect ratio is not preserved.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::codec::DEFAULT_SLICE_SIZE;
use crate::imaging::Quality;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `panoprep.toml`.
///
/// Fixed for the lifetime of an [`ImagePipeline`](crate::imaging::ImagePipeline).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Upper bound applied by the normalizing load.
    pub size_cap: SizeCap,
    /// JPEG encoder settings.
    pub encode: EncodeConfig,
    /// Thumbnail defaults.
    pub thumbnail: ThumbnailConfig,
    /// base64 decoding settings.
    pub codec: CodecConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeCap {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for SizeCap {
    fn default() -> Self {
        Self {
            max_width: 1024 * 8,
            max_height: 1024 * 4,
        }
    }
}

impl SizeCap {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    pub quality: u32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value() as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailConfig {
    pub crop_size: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self { crop_size: 256 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    pub slice_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            slice_size: DEFAULT_SLICE_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_toml(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size_cap.max_width == 0 || self.size_cap.max_height == 0 {
            return Err(ConfigError::Validation(
                "size_cap dimensions must be greater than zero".into(),
            ));
        }
        if !(1..=100).contains(&self.encode.quality) {
            return Err(ConfigError::Validation(format!(
                "encode.quality must be 1-100, got {}",
                self.encode.quality
            )));
        }
        if self.thumbnail.crop_size == 0 {
            return Err(ConfigError::Validation(
                "thumbnail.crop_size must be greater than zero".into(),
            ));
        }
        if self.codec.slice_size == 0 {
            return Err(ConfigError::Validation(
                "codec.slice_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.encode.quality)
    }
}

/// A documented config file with every option at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# panoprep configuration
# All options are optional - defaults shown below.

[size_cap]
# Originals larger than the cap on either side are redrawn at exactly the cap.
max_width = 8192
max_height = 4096

[encode]
# JPEG quality (1-100).
quality = 92

[thumbnail]
# Side of the square thumbnail in pixels.
crop_size = 256

[codec]
# Chunk size used when decoding base64 payloads.
slice_size = 512
"#
}
