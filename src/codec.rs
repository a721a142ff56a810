//! Binary/text codec helpers shared by every stage of the pipeline.
//!
//! Images cross the pipeline boundary in two shapes:
//!
//! - **Blob**: raw bytes plus a MIME type tag, as handed over by an upload
//!   field or read from disk.
//! - **Data-URI**: `data:<mime>;base64,<payload>`, the textual form every
//!   encode step produces and every decode step accepts.
//!
//! The base64 decoder mirrors browser `atob` leniency: ASCII whitespace in the
//! payload is ignored and `=` padding is optional.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use bytes::{Bytes, BytesMut};
use std::fmt;
use thiserror::Error;

/// The single MIME type the pipeline accepts and produces.
pub const SUPPORTED_MIME: &str = "image/jpeg";

/// MIME type used when a blob carries no type of its own.
const FALLBACK_MIME: &str = "application/octet-stream";

/// Default chunk size for [`base64_to_binary`].
pub const DEFAULT_SLICE_SIZE: usize = 512;

/// Prefix variants removed by [`strip_data_url_prefix`].
const STRIPPABLE_SUBTYPES: &[&str] = &["png", "jpeg", "jpg"];

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Not a base64 data URI: {0}")]
    NotDataUrl(String),
    #[error("Slice size must be greater than zero")]
    ZeroSliceSize,
}

/// An opaque binary payload tagged with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub mime: String,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    /// Tag raw bytes by sniffing their leading magic bytes.
    pub fn sniffed(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let mime = sniff_mime(&bytes);
        Self::new(bytes, mime)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read the blob as a data-URI, like `FileReader.readAsDataURL`.
    pub fn to_data_url(&self) -> String {
        encode_data_url(&self.bytes, &self.mime)
    }
}

/// Whatever a caller hands in as "the image": a blob, or a textual reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Blob(Blob),
    DataUrl(String),
}

impl ImageSource {
    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            ImageSource::Blob(blob) => Some(blob),
            ImageSource::DataUrl(_) => None,
        }
    }

    /// Resolve the reference to the encoded bytes it points at.
    pub fn to_bytes(&self) -> Result<Bytes, CodecError> {
        match self {
            ImageSource::Blob(blob) => Ok(blob.bytes.clone()),
            ImageSource::DataUrl(url) => decode_data_url(url),
        }
    }
}

impl From<Blob> for ImageSource {
    fn from(blob: Blob) -> Self {
        ImageSource::Blob(blob)
    }
}

impl From<EncodedImage> for ImageSource {
    fn from(image: EncodedImage) -> Self {
        ImageSource::DataUrl(image.0)
    }
}

/// A compressed image embedded in a `data:image/jpeg;base64,...` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Wrap freshly encoded JPEG bytes.
    pub fn from_jpeg(bytes: &[u8]) -> Self {
        Self(encode_data_url(bytes, SUPPORTED_MIME))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The base64 payload without the MIME prefix.
    pub fn payload(&self) -> &str {
        strip_data_url_prefix(&self.0)
    }

    /// Turn the data-URI back into a JPEG blob.
    pub fn to_blob(&self, slice_size: usize) -> Result<Blob, CodecError> {
        base64_to_binary(&self.0, slice_size)
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remove a leading `data:image/{png|jpeg|jpg};base64,` prefix.
///
/// Any other string (including data-URIs of other types) is returned as-is.
pub fn strip_data_url_prefix(data_url: &str) -> &str {
    let Some(rest) = data_url.strip_prefix("data:image/") else {
        return data_url;
    };
    STRIPPABLE_SUBTYPES
        .iter()
        .find_map(|subtype| {
            rest.strip_prefix(subtype)
                .and_then(|r| r.strip_prefix(";base64,"))
        })
        .unwrap_or(data_url)
}

/// Decode a (possibly prefixed) base64 image into a JPEG-tagged blob.
///
/// The decoded bytes are assembled `slice_size` bytes at a time; the result is
/// byte-identical for every slice size.
pub fn base64_to_binary(data_url: &str, slice_size: usize) -> Result<Blob, CodecError> {
    if slice_size == 0 {
        return Err(CodecError::ZeroSliceSize);
    }
    let decoded = decode_lenient(strip_data_url_prefix(data_url))?;

    let mut buf = BytesMut::with_capacity(decoded.len());
    for slice in decoded.chunks(slice_size) {
        buf.extend_from_slice(slice);
    }
    Ok(Blob::new(buf.freeze(), SUPPORTED_MIME))
}

/// Build a `data:<mime>;base64,<payload>` string.
pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    let mime = if mime.is_empty() { FALLBACK_MIME } else { mime };
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Extract the bytes from any base64 data-URI, whatever its MIME type.
pub fn decode_data_url(data_url: &str) -> Result<Bytes, CodecError> {
    let payload = data_url
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .and_then(|_| data_url[5..].split_once(','))
        .filter(|(header, _)| has_base64_marker(header))
        .map(|(_, payload)| payload)
        .ok_or_else(|| CodecError::NotDataUrl(truncate_for_error(data_url)))?;
    Ok(Bytes::from(decode_lenient(payload)?))
}

fn decode_lenient(payload: &str) -> Result<Vec<u8>, CodecError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(LENIENT.decode(compact)?)
}

/// `;base64` at the end of a data-URI header, in any case.
fn has_base64_marker(header: &str) -> bool {
    header
        .len()
        .checked_sub(7)
        .and_then(|start| header.get(start..))
        .is_some_and(|marker| marker.eq_ignore_ascii_case(";base64"))
}

/// Identify JPEG and PNG from their magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        SUPPORTED_MIME
    } else if bytes.starts_with(&[0x89, 0x50, 0x4e, 0x47]) {
        "image/png"
    } else {
        FALLBACK_MIME
    }
}

fn truncate_for_error(s: &str) -> String {
    const MAX: usize = 40;
    match s.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
