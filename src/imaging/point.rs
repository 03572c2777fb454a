//! Per-pixel color remapping: greyscale, invert, sepia.
//!
//! Each transform looks at one pixel at a time, so the output has the same
//! layout as the input and rows can be processed independently.

use super::frame::{Bgr, FrameBuffer, Result, map_pixels};

/// Average the three channels and write the result to all of them.
pub fn greyscale(frame: &FrameBuffer) -> Result<FrameBuffer> {
    map_pixels(frame, |px| {
        let gray = px.luminance();
        Bgr::rgb(gray, gray, gray)
    })
}

/// Replace every channel with `255 - channel`.
pub fn invert(frame: &FrameBuffer) -> Result<FrameBuffer> {
    map_pixels(frame, |px| Bgr {
        b: 255 - px.b,
        g: 255 - px.g,
        r: 255 - px.r,
    })
}

/// Classic sepia matrix, truncated and capped at 255.
pub fn sepia(frame: &FrameBuffer) -> Result<FrameBuffer> {
    map_pixels(frame, sepia_pixel)
}

fn sepia_pixel(px: Bgr) -> Bgr {
    let (r, g, b) = (px.r as f64, px.g as f64, px.b as f64);
    let tone = |cr: f64, cg: f64, cb: f64| (cr * r + cg * g + cb * b).min(255.0) as u8;
    Bgr::rgb(
        tone(0.393, 0.769, 0.189),
        tone(0.349, 0.686, 0.168),
        tone(0.272, 0.534, 0.131),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::EffectError;
    use crate::test_helpers::{gradient_frame, padded_frame};

    #[test]
    fn greyscale_equalizes_channels() {
        let out = greyscale(&gradient_frame(17, 9)).unwrap();
        assert!(out.pixels().all(|p| p.r == p.g && p.g == p.b));
    }

    #[test]
    fn greyscale_truncates_average() {
        let frame = FrameBuffer::filled(1, 1, Bgr::rgb(10, 20, 31));
        // (10 + 20 + 31) / 3 = 20.33 → 20
        assert_eq!(greyscale(&frame).unwrap().pixel(0, 0), Bgr::rgb(20, 20, 20));
    }

    #[test]
    fn invert_white_is_black() {
        let white = FrameBuffer::filled(4, 4, Bgr::WHITE);
        let out = invert(&white).unwrap();
        assert!(out.pixels().all(|p| p == Bgr::BLACK));
    }

    #[test]
    fn invert_twice_is_identity() {
        for frame in [gradient_frame(13, 7), padded_frame(5, 4, 3)] {
            let twice = invert(&invert(&frame).unwrap()).unwrap();
            assert_eq!(twice, frame);
        }
    }

    #[test]
    fn sepia_saturates_white() {
        let out = sepia(&FrameBuffer::filled(1, 1, Bgr::WHITE)).unwrap();
        // r and g coefficients sum above 1.0, b sums to 0.937
        assert_eq!(out.pixel(0, 0), Bgr::rgb(255, 255, 238));
    }

    #[test]
    fn sepia_matches_matrix() {
        let out = sepia(&FrameBuffer::filled(1, 1, Bgr::rgb(100, 50, 20))).unwrap();
        // r = 39.3 + 38.45 + 3.78 = 81.53
        // g = 34.9 + 34.3 + 3.36 = 72.56
        // b = 27.2 + 26.7 + 2.62 = 56.52
        assert_eq!(out.pixel(0, 0), Bgr::rgb(81, 72, 56));
    }

    #[test]
    fn sepia_black_stays_black() {
        let out = sepia(&FrameBuffer::new(3, 3)).unwrap();
        assert!(out.pixels().all(|p| p == Bgr::BLACK));
    }

    #[test]
    fn transforms_preserve_layout() {
        let frame = padded_frame(6, 3, 5);
        for out in [
            greyscale(&frame).unwrap(),
            invert(&frame).unwrap(),
            sepia(&frame).unwrap(),
        ] {
            assert_eq!(out.dimensions(), frame.dimensions());
            assert_eq!(out.stride(), frame.stride());
        }
    }

    #[test]
    fn empty_frame_is_rejected() {
        let empty = FrameBuffer::new(0, 0);
        assert!(matches!(greyscale(&empty), Err(EffectError::InvalidInput(_))));
        assert!(matches!(invert(&empty), Err(EffectError::InvalidInput(_))));
        assert!(matches!(sepia(&empty), Err(EffectError::InvalidInput(_))));
    }
}
