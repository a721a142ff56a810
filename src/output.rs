//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines, for testability.
//! Format functions are pure: no I/O, no side effects. `main` prints them.
//!
//! ## Check
//!
//! ```text
//! pano.jpg
//!     Type: image/jpeg (ok)
//!     Size: 1024x512 (ok)
//!     Result: valid
//! ```

use crate::imaging::{Dimensions, LoadedImage};
use crate::validate::CheckReport;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn verdict(ok: bool) -> &'static str {
    if ok { "ok" } else { "rejected" }
}

pub fn format_dimensions(dimensions: Option<Dimensions>) -> String {
    match dimensions {
        Some(d) => format!("{}x{}", d.width, d.height),
        None => "unknown".to_string(),
    }
}

pub fn format_check(source: &Path, report: &CheckReport) -> Vec<String> {
    let mime = if report.mime.is_empty() {
        "(none)"
    } else {
        report.mime.as_str()
    };
    vec![
        source.display().to_string(),
        format!("{}Type: {} ({})", indent(1), mime, verdict(report.type_ok)),
        format!(
            "{}Size: {} ({})",
            indent(1),
            format_dimensions(report.dimensions),
            verdict(report.dimension_ok)
        ),
        format!(
            "{}Result: {}",
            indent(1),
            if report.is_valid() { "valid" } else { "invalid" }
        ),
    ]
}

pub fn format_loaded(loaded: &LoadedImage) -> Vec<String> {
    vec![
        format!("Normalized: {}x{}", loaded.width, loaded.height),
        format!("{}Encoded: {} chars", indent(1), loaded.image_base64.as_str().len()),
    ]
}

pub fn format_written(label: &str, path: &Path, bytes: usize) -> String {
    format!("{label} → {} ({bytes} bytes)", path.display())
}
