//! Generic 3×3 convolution.
//!
//! For every interior pixel and channel:
//!
//! ```text
//! sum   = Σ weights[dy][dx] * src[y + dy - 1][x + dx - 1]
//! value = sum / factor + offset        (integer division, truncates toward zero)
//! out   = clamp(value, 0, 255)
//! ```
//!
//! The outermost one-pixel ring has no full neighborhood and is copied from
//! the source unchanged. Reads always come from the untouched input, so an
//! output pixel never depends on an already-filtered neighbor.

use super::frame::{BYTES_PER_PIXEL, EffectError, FrameBuffer, Result};
use super::kernel::ConvolutionKernel;
use rayon::prelude::*;

/// Convolve `frame` with `kernel` into a new buffer.
///
/// Fails with [`EffectError::InvalidKernel`] for a zero factor and
/// [`EffectError::InvalidInput`] for an empty frame, before anything is allocated.
pub fn apply(frame: &FrameBuffer, kernel: &ConvolutionKernel) -> Result<FrameBuffer> {
    if kernel.factor == 0 {
        return Err(EffectError::InvalidKernel);
    }
    frame.ensure_non_empty()?;

    let mut out = frame.clone();
    let (width, height) = (frame.width() as usize, frame.height() as usize);
    if width < 3 || height < 3 {
        return Ok(out);
    }

    let stride = frame.stride() as usize;
    let src = frame.as_bytes();
    out.bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .filter(|(y, _)| *y >= 1 && *y <= height - 2)
        .for_each(|(y, row)| {
            for x in 1..width - 1 {
                for c in 0..BYTES_PER_PIXEL {
                    row[x * BYTES_PER_PIXEL + c] = convolve_at(src, stride, x, y, c, kernel);
                }
            }
        });

    Ok(out)
}

fn convolve_at(
    src: &[u8],
    stride: usize,
    x: usize,
    y: usize,
    channel: usize,
    kernel: &ConvolutionKernel,
) -> u8 {
    // i64 holds 9 * i32::MAX * 255 without overflow
    let mut sum = 0i64;
    for (dy, weights) in kernel.weights.iter().enumerate() {
        let row_start = (y + dy - 1) * stride;
        for (dx, &weight) in weights.iter().enumerate() {
            let idx = row_start + (x + dx - 1) * BYTES_PER_PIXEL + channel;
            sum += weight as i64 * src[idx] as i64;
        }
    }
    (sum / kernel.factor as i64 + kernel.offset as i64).clamp(0, 255) as u8
}
