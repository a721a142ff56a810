//! # panoprep
//!
//! Upload-side normalization for panorama images. An upload is checked
//! against the accepted type and the 2:1 contract, decoded, and turned into
//! two derived JPEGs: a size-capped full image and a square thumbnail.
//!
//! # Architecture
//!
//! ```text
//! Blob / data-URI ──► validate ──► imaging::ImagePipeline ──► data-URI
//!                                   decode → draw → encode → verify
//! ```
//!
//! Every pipeline step that touches pixels is delegated to an
//! [`imaging::ImageBackend`], so the geometry and sequencing are testable
//! with a recording mock and no real images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`codec`] | Blob and data-URI types, base64 strip/decode/encode helpers |
//! | [`validate`] | MIME type check and the even-sided 2:1 dimension contract |
//! | [`imaging`] | Crop/scale/clip geometry, backend trait, async pipeline |
//! | [`config`] | `panoprep.toml` loading and validation (size cap, quality, defaults) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Canvas Semantics, Not Library Semantics
//!
//! Resizing and cropping reproduce 2-D canvas `drawImage` behavior exactly:
//! the thumbnail is produced by over-drawing a scaled source onto a square
//! surface and letting the surface bounds clip it, rather than by a
//! resize-to-fill helper. The clipping math lives in pure functions so the
//! crop region can be asserted directly.
//!
//! ## Verify Before Returning
//!
//! Every encode is decoded back before the call resolves. A corrupt encode is
//! an error, never an output.
//!
//! ## JPEG Only
//!
//! One output format, one accepted upload type (`image/jpeg`). PNG is decoded
//! only so that `data:image/png` references can be read.

pub mod codec;
pub mod config;
pub mod imaging;
pub mod output;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
