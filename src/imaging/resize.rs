//! Cover-fit resize with center crop, plus an exact stretch.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Crop | `image::imageops::crop_imm` |
//! | Scale | `image::imageops::resize` with `CatmullRom` (bicubic) |
//!
//! The cover-fit window is cropped in source coordinates before resampling,
//! so no intermediate image is ever larger than the source or the target.
//! Frames are converted to `RgbImage` for the resampler and back to BGR
//! afterwards; the output is always tightly packed.

use super::calculations::calculate_source_window;
use super::frame::{EffectError, FrameBuffer, Result};
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Bicubic-equivalent resampling filter.
const FILTER: FilterType = FilterType::CatmullRom;

/// Cover-fit `frame` to `target_w × target_h`: crop the centered window that
/// survives the fill, then scale it to the target.
///
/// The output is exactly `target_w × target_h` whatever the input aspect ratio.
pub fn resize_and_crop(frame: &FrameBuffer, target_w: u32, target_h: u32) -> Result<FrameBuffer> {
    frame.ensure_non_empty()?;
    ensure_target(target_w, target_h)?;

    if frame.dimensions() == (target_w, target_h) {
        return Ok(repack(frame));
    }

    let (x, y, w, h) = calculate_source_window(frame.dimensions(), (target_w, target_h));
    let window = imageops::crop_imm(&frame.to_rgb_image(), x, y, w, h).to_image();
    let scaled = scale(&window, (w, h), (target_w, target_h));
    Ok(FrameBuffer::from_rgb_image(&scaled))
}

/// Stretch `frame` to exactly `width × height`, ignoring aspect ratio.
pub fn resize_exact(frame: &FrameBuffer, width: u32, height: u32) -> Result<FrameBuffer> {
    frame.ensure_non_empty()?;
    ensure_target(width, height)?;
    if frame.dimensions() == (width, height) {
        return Ok(repack(frame));
    }
    let scaled = scale(&frame.to_rgb_image(), frame.dimensions(), (width, height));
    Ok(FrameBuffer::from_rgb_image(&scaled))
}

fn ensure_target(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(EffectError::InvalidInput(format!(
            "target size has zero dimension ({width}x{height})"
        )));
    }
    Ok(())
}

fn scale(img: &RgbImage, from: (u32, u32), to: (u32, u32)) -> RgbImage {
    if from == to {
        return img.clone();
    }
    imageops::resize(img, to.0, to.1, FILTER)
}

/// Same pixels with the row padding removed.
fn repack(frame: &FrameBuffer) -> FrameBuffer {
    if frame.stride() as usize == frame.row_len() {
        return frame.clone();
    }
    FrameBuffer::from_fn(frame.width(), frame.height(), |x, y| frame.pixel(x, y))
}
