//! Pure calculation functions for cover-fit resizing.
//!
//! All functions here are pure and testable without any pixel data.

/// Calculate dimensions needed to fill a target area (resize before crop).
///
/// Equivalent to scaling by `max(target_w / src_w, target_h / src_h)`. The
/// dimension that drives the scale matches the target exactly; the other is
/// rounded and never falls below its target.
///
/// # Arguments
/// * `source` - Original dimensions (width, height), both non-zero
/// * `target` - Target area dimensions (width, height)
///
/// # Returns
/// * `(width, height)` - Fill dimensions (at least one matches target)
pub fn calculate_fill_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: height will match, width will exceed
        let h = tgt_h;
        let w = (h as f64 * src_aspect).round() as u32;
        (w.max(tgt_w), h)
    } else {
        // Source is taller: width will match, height will exceed
        let w = tgt_w;
        let h = (w as f64 / src_aspect).round() as u32;
        (w, h.max(tgt_h))
    }
}

/// Top-left corner of a centered `target` window inside `scaled`.
///
/// `((scaled_w - target_w) / 2, (scaled_h - target_h) / 2)`, truncating.
pub fn calculate_crop_offset(scaled: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    (
        scaled.0.saturating_sub(target.0) / 2,
        scaled.1.saturating_sub(target.1) / 2,
    )
}

/// Centered window of `source` that cover-fits `target` once resampled.
///
/// The same region [`calculate_fill_dimensions`] + [`calculate_crop_offset`]
/// select, expressed in source pixels: `target / scale`, rounded, at least one
/// pixel and never larger than the source. Cropping this window first keeps
/// the resampled image at the target size whatever the aspect mismatch.
///
/// # Returns
/// * `(x, y, width, height)` - Window inside `source`
pub fn calculate_source_window(source: (u32, u32), target: (u32, u32)) -> (u32, u32, u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let scale = (tgt_w as f64 / src_w as f64).max(tgt_h as f64 / src_h as f64);
    let w = ((tgt_w as f64 / scale).round() as u32).clamp(1, src_w);
    let h = ((tgt_h as f64 / scale).round() as u32).clamp(1, src_h);

    let (x, y) = calculate_crop_offset(source, (w, h));
    (x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_fill_dimensions tests
    // =========================================================================

    #[test]
    fn fill_wider_source_to_portrait_target() {
        // 800x600 (4:3) → 400x500 target
        // Source is wider, so height matches: 500, width = 500 * (4/3) = 667
        assert_eq!(calculate_fill_dimensions((800, 600), (400, 500)), (667, 500));
    }

    #[test]
    fn fill_taller_source_to_landscape_target() {
        // 600x800 (3:4) → 500x400 target
        assert_eq!(calculate_fill_dimensions((600, 800), (500, 400)), (500, 667));
    }

    #[test]
    fn fill_same_aspect_ratio() {
        assert_eq!(calculate_fill_dimensions((800, 600), (400, 300)), (400, 300));
    }

    #[test]
    fn fill_wide_source_to_square_keeps_scale_one() {
        // 100x50 → 50x50: scale = max(0.5, 1.0) = 1.0
        assert_eq!(calculate_fill_dimensions((100, 50), (50, 50)), (100, 50));
    }

    #[test]
    fn fill_upscales_small_source() {
        // 3x2 → 7x7: scale = max(7/3, 3.5) = 3.5
        assert_eq!(calculate_fill_dimensions((3, 2), (7, 7)), (11, 7));
    }

    #[test]
    fn fill_never_undershoots_target() {
        for source in [(1, 1000), (1000, 1), (3, 7), (641, 479), (1, 1)] {
            for target in [(1, 1), (7, 3), (320, 240), (99, 100)] {
                let (w, h) = calculate_fill_dimensions(source, target);
                assert!(w >= target.0 && h >= target.1, "{source:?} → {target:?}");
                assert!(w == target.0 || h == target.1, "{source:?} → {target:?}");
            }
        }
    }

    // =========================================================================
    // calculate_crop_offset tests
    // =========================================================================

    #[test]
    fn crop_offset_centers_excess() {
        assert_eq!(calculate_crop_offset((100, 50), (50, 50)), (25, 0));
        assert_eq!(calculate_crop_offset((500, 667), (500, 400)), (0, 133));
    }

    #[test]
    fn crop_offset_exact_fit_is_origin() {
        assert_eq!(calculate_crop_offset((320, 240), (320, 240)), (0, 0));
    }

    // =========================================================================
    // calculate_source_window tests
    // =========================================================================

    #[test]
    fn source_window_matches_scaled_crop() {
        // 100x50 → 50x50 at scale 1.0: same window as offset (25, 0)
        assert_eq!(calculate_source_window((100, 50), (50, 50)), (25, 0, 50, 50));
        // 800x600 → 400x500: scale 5/6, window 480x600
        assert_eq!(calculate_source_window((800, 600), (400, 500)), (160, 0, 480, 600));
    }

    #[test]
    fn source_window_same_size_is_whole_frame() {
        assert_eq!(calculate_source_window((320, 240), (320, 240)), (0, 0, 320, 240));
    }

    #[test]
    fn source_window_for_extreme_aspect_is_one_pixel_high() {
        // 1x2000 → 2000x1: scale 2000, window 1x1 in the middle of the column
        assert_eq!(calculate_source_window((1, 2000), (2000, 1)), (0, 999, 1, 1));
        assert_eq!(calculate_source_window((2000, 1), (1, 2000)), (999, 0, 1, 1));
    }

    #[test]
    fn source_window_stays_inside_source() {
        for source in [(1, 1000), (1000, 1), (3, 7), (641, 479), (1, 1)] {
            for target in [(1, 1), (7, 3), (320, 240), (99, 100), (65535, 1)] {
                let (x, y, w, h) = calculate_source_window(source, target);
                assert!(w >= 1 && h >= 1, "{source:?} → {target:?}");
                assert!(x + w <= source.0 && y + h <= source.1, "{source:?} → {target:?}");
            }
        }
    }
}
