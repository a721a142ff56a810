//! Raster transform pipeline.
//!
//! | Operation | What it does |
//! |---|---|
//! | **Dimension lookup** | decode a blob, report its natural size or nothing |
//! | **Normalizing load** | blob → base64 → raster, redraw within the size cap, re-encode |
//! | **Resize** | stretch the whole source to an exact size |
//! | **Thumbnail** | centered cover-crop onto a square |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop/scale/clip geometry (unit testable)
//! - **Parameters**: Data structures describing draw and encode calls
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`ImagePipeline`], the async entry points combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, Raster};
pub use calculations::{
    DrawRegion, PixelRect, Rect, calculate_capped_dimensions, calculate_cover_crop,
    calculate_draw_region,
};
pub use operations::{
    ImagePipeline, LoadedImage, PipelineError, plan_normalize, plan_resize, plan_thumbnail,
};
pub use params::{DrawParams, Quality};
pub use rust_backend::RustBackend;
