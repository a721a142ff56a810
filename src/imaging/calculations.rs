//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// A rectangle in floating-point pixel space, as passed to a draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// A whole-pixel rectangle, inside the bounds of whatever it indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The visible part of a draw call: which source pixels land where on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRegion {
    pub source: PixelRect,
    pub dest: PixelRect,
}

/// Replace oversized dimensions with the cap.
///
/// If either side exceeds its limit, **both** sides become the cap values.
/// The aspect ratio is not preserved.
///
/// # Examples
/// ```
/// # use panoprep::imaging::calculate_capped_dimensions;
/// assert_eq!(calculate_capped_dimensions((800, 400), (8192, 4096)), (800, 400));
/// assert_eq!(calculate_capped_dimensions((9000, 1000), (8192, 4096)), (8192, 4096));
/// ```
pub fn calculate_capped_dimensions(source: (u32, u32), cap: (u32, u32)) -> (u32, u32) {
    let (w, h) = source;
    let (max_w, max_h) = cap;
    if w > max_w || h > max_h {
        (max_w, max_h)
    } else {
        (w, h)
    }
}

/// Source and destination rectangles for a centered cover-crop onto a square.
///
/// The source rectangle starts at the centering offset on the longer axis and
/// keeps the full source size; the destination is scaled so the shorter axis
/// exactly spans `crop_size`. Whatever overhangs the `crop_size` square is
/// clipped when drawn, which leaves a centered square of the source.
///
/// # Returns
/// * `(source, dest)` - rectangles for a draw onto a `crop_size` square surface
pub fn calculate_cover_crop(source: (u32, u32), crop_size: u32) -> (Rect, Rect) {
    let (src_w, src_h) = source;
    let crop = crop_size as f64;
    let ratio = src_w as f64 / src_h as f64;
    let diff = (src_w.abs_diff(src_h) / 2) as f64;

    let (sx, sy, dw, dh) = if src_w > src_h {
        (diff, 0.0, crop * ratio, crop)
    } else if src_h > src_w {
        (0.0, diff, crop, crop / ratio)
    } else {
        (0.0, 0.0, crop, crop)
    };

    (
        Rect::new(sx, sy, src_w as f64, src_h as f64),
        Rect::sized(dw, dh),
    )
}

/// Resolve a draw call to the pixels it actually touches.
///
/// Follows 2-D canvas `drawImage` rules: the source rectangle is clipped to the
/// raster, the destination shrinks by the same proportion, then the destination
/// is clipped to the surface and the clip is mapped back onto the source.
///
/// Returns `None` when nothing visible would be drawn.
pub fn calculate_draw_region(
    raster: (u32, u32),
    source: Rect,
    dest: Rect,
    surface: (u32, u32),
) -> Option<DrawRegion> {
    let (sx, dx) = clip_axis(
        (source.x, source.width),
        raster.0,
        (dest.x, dest.width),
        surface.0,
    )?;
    let (sy, dy) = clip_axis(
        (source.y, source.height),
        raster.1,
        (dest.y, dest.height),
        surface.1,
    )?;

    Some(DrawRegion {
        source: PixelRect {
            x: sx.0,
            y: sy.0,
            width: sx.1,
            height: sy.1,
        },
        dest: PixelRect {
            x: dx.0,
            y: dy.0,
            width: dx.1,
            height: dy.1,
        },
    })
}

/// Clip one axis of a draw call. Returns `(start, len)` pairs for source and dest.
fn clip_axis(
    (src_start, src_len): (f64, f64),
    src_limit: u32,
    (dst_start, dst_len): (f64, f64),
    dst_limit: u32,
) -> Option<((u32, u32), (u32, u32))> {
    if src_len <= 0.0 || dst_len <= 0.0 || !src_len.is_finite() || !dst_len.is_finite() {
        return None;
    }
    let scale = dst_len / src_len;
    let src_limit = src_limit as f64;
    let dst_limit = dst_limit as f64;

    // Source against the raster
    let mut s0 = src_start.max(0.0);
    let mut s1 = (src_start + src_len).min(src_limit);
    if s1 <= s0 {
        return None;
    }
    let mut d0 = dst_start + (s0 - src_start) * scale;
    let mut d1 = dst_start + (s1 - src_start) * scale;

    // Destination against the surface
    if d0 < 0.0 {
        s0 += -d0 / scale;
        d0 = 0.0;
    }
    if d1 > dst_limit {
        s1 -= (d1 - dst_limit) / scale;
        d1 = dst_limit;
    }
    if d1 <= d0 {
        return None;
    }

    let d_start = d0.round();
    let d_len = d1.round() - d_start;
    if d_len < 1.0 {
        return None;
    }
    let s_start = s0.round().min(src_limit - 1.0);
    let s_len = (s1.round() - s_start).clamp(1.0, src_limit - s_start);

    Some((
        (s_start as u32, s_len as u32),
        (d_start as u32, d_len as u32),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // calculate_capped_dimensions tests
    // =========================================================================

    #[test]
    fn cap_keeps_dimensions_within_limits() {
        assert_eq!(calculate_capped_dimensions((8192, 4096), (8192, 4096)), (8192, 4096));
        assert_eq!(calculate_capped_dimensions((400, 200), (8192, 4096)), (400, 200));
    }

    #[test]
    fn cap_replaces_both_sides_when_width_exceeds() {
        // Aspect ratio is not preserved: 10000x1000 becomes the full cap
        assert_eq!(calculate_capped_dimensions((10000, 1000), (8192, 4096)), (8192, 4096));
    }

    #[test]
    fn cap_replaces_both_sides_when_height_exceeds() {
        assert_eq!(calculate_capped_dimensions((100, 4097), (8192, 4096)), (8192, 4096));
    }

    // =========================================================================
    // calculate_cover_crop tests
    // =========================================================================

    #[test]
    fn cover_crop_landscape() {
        // 400x200 at 50: offset floor(200/2) = 100 on x, dest 100x50
        let (src, dst) = calculate_cover_crop((400, 200), 50);
        assert_eq!(src, Rect::new(100.0, 0.0, 400.0, 200.0));
        assert_eq!(dst, Rect::sized(100.0, 50.0));
    }

    #[test]
    fn cover_crop_portrait() {
        let (src, dst) = calculate_cover_crop((300, 600), 256);
        assert_eq!(src, Rect::new(0.0, 150.0, 300.0, 600.0));
        assert_eq!(dst, Rect::sized(256.0, 512.0));
    }

    #[test]
    fn cover_crop_square() {
        let (src, dst) = calculate_cover_crop((500, 500), 256);
        assert_eq!(src, Rect::new(0.0, 0.0, 500.0, 500.0));
        assert_eq!(dst, Rect::sized(256.0, 256.0));
    }

    #[test]
    fn cover_crop_odd_difference_floors_offset() {
        // |401 - 200| / 2 = 100.5 → 100
        let (src, _) = calculate_cover_crop((401, 200), 64);
        assert_eq!(src.x, 100.0);
    }

    // =========================================================================
    // calculate_draw_region tests
    // =========================================================================

    #[test]
    fn region_full_stretch() {
        let region = calculate_draw_region(
            (400, 200),
            Rect::sized(400.0, 200.0),
            Rect::sized(100.0, 100.0),
            (100, 100),
        )
        .unwrap();
        assert_eq!(
            region.source,
            PixelRect { x: 0, y: 0, width: 400, height: 200 }
        );
        assert_eq!(region.dest, PixelRect { x: 0, y: 0, width: 100, height: 100 });
    }

    #[test]
    fn region_cover_crop_landscape_centers() {
        let (src, dst) = calculate_cover_crop((400, 200), 50);
        let region = calculate_draw_region((400, 200), src, dst, (50, 50)).unwrap();
        // Source 100..300 on x, full height
        assert_eq!(
            region.source,
            PixelRect { x: 100, y: 0, width: 200, height: 200 }
        );
        assert_eq!(region.dest, PixelRect { x: 0, y: 0, width: 50, height: 50 });
    }

    #[test]
    fn region_cover_crop_portrait_centers() {
        let (src, dst) = calculate_cover_crop((200, 400), 50);
        let region = calculate_draw_region((200, 400), src, dst, (50, 50)).unwrap();
        assert_eq!(
            region.source,
            PixelRect { x: 0, y: 100, width: 200, height: 200 }
        );
        assert_eq!(region.dest, PixelRect { x: 0, y: 0, width: 50, height: 50 });
    }

    #[test]
    fn region_source_outside_raster_is_empty() {
        let region = calculate_draw_region(
            (100, 100),
            Rect::new(150.0, 0.0, 50.0, 50.0),
            Rect::sized(10.0, 10.0),
            (10, 10),
        );
        assert!(region.is_none());
    }

    #[test]
    fn region_zero_sized_destination_is_empty() {
        let region = calculate_draw_region(
            (100, 100),
            Rect::sized(100.0, 100.0),
            Rect::sized(0.0, 10.0),
            (10, 10),
        );
        assert!(region.is_none());
    }

    #[test]
    fn region_partially_covers_surface() {
        // Source overhangs the raster by half: only the left half of the surface is drawn
        let region = calculate_draw_region(
            (100, 100),
            Rect::new(50.0, 0.0, 100.0, 100.0),
            Rect::sized(20.0, 20.0),
            (20, 20),
        )
        .unwrap();
        assert_eq!(
            region.source,
            PixelRect { x: 50, y: 0, width: 50, height: 100 }
        );
        assert_eq!(region.dest, PixelRect { x: 0, y: 0, width: 10, height: 20 });
    }

    proptest! {
        /// The crop spans the full shorter axis and trims `|W - H|` off the longer one.
        #[test]
        fn cover_crop_trims_only_the_longer_axis(
            w in 1u32..3000,
            h in 1u32..3000,
            crop in 1u32..600,
        ) {
            let (src, dst) = calculate_cover_crop((w, h), crop);
            let region = calculate_draw_region((w, h), src, dst, (crop, crop)).unwrap();
            let short = w.min(h);

            prop_assert_eq!(region.dest, PixelRect { x: 0, y: 0, width: crop, height: crop });
            prop_assert_eq!(region.source.width, short);
            prop_assert_eq!(region.source.height, short);
            let kept_long = region.source.width.max(region.source.height);
            prop_assert_eq!(w.max(h) - kept_long, w.abs_diff(h));
            prop_assert_eq!(region.source.x, if w > h { (w - h) / 2 } else { 0 });
            prop_assert_eq!(region.source.y, if h > w { (h - w) / 2 } else { 0 });
        }
    }
}
