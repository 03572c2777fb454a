//! Green-screen background replacement.
//!
//! A pixel counts as "screen" when green clearly dominates:
//! `g > 1.3 r && g > 1.3 b && g > 50`. Screen pixels take the background's
//! pixel at the same position, everything else keeps the source. There is no
//! edge softening.

use super::frame::{BYTES_PER_PIXEL, Bgr, EffectError, FrameBuffer, Result};
use rayon::prelude::*;

/// How much green must exceed red and blue.
pub const DOMINANCE: f64 = 1.3;

/// Minimum green level for a screen pixel.
pub const MIN_GREEN: u8 = 50;

/// Whether `px` falls inside the green-screen range.
pub fn is_screen(px: Bgr) -> bool {
    let g = px.g as f64;
    g > px.r as f64 * DOMINANCE && g > px.b as f64 * DOMINANCE && px.g > MIN_GREEN
}

/// Replace screen pixels of `source` with the matching pixels of `background`.
///
/// Without a background the source is returned unchanged. Both buffers must
/// have the same dimensions; resample the background first if they don't.
pub fn subtract(source: &FrameBuffer, background: Option<&FrameBuffer>) -> Result<FrameBuffer> {
    source.ensure_non_empty()?;
    let Some(background) = background else {
        return Ok(source.clone());
    };
    if background.dimensions() != source.dimensions() {
        return Err(EffectError::DimensionMismatch {
            expected: source.dimensions(),
            actual: background.dimensions(),
        });
    }

    let mut out = source.clone();
    let stride = out.stride() as usize;
    let row_len = out.row_len();
    out.bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let bg_row = background.row(y as u32);
            for (px, bg) in row[..row_len]
                .chunks_exact_mut(BYTES_PER_PIXEL)
                .zip(bg_row.chunks_exact(BYTES_PER_PIXEL))
            {
                if is_screen(Bgr {
                    b: px[0],
                    g: px[1],
                    r: px[2],
                }) {
                    px.copy_from_slice(bg);
                }
            }
        });
    Ok(out)
}
