//! Shared test utilities for the digital-imager test suite.
//!
//! Provides frame builders with known content, a column probe for rendered
//! histograms, and a retrying submit for the stream's rendezvous hand-off.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let frame = gradient_frame(32, 24);
//! let out = point::invert(&frame).unwrap();
//! assert_eq!(point::invert(&out).unwrap(), frame);
//! ```

use std::time::Duration;

use crate::imaging::{Bgr, FrameBuffer};
use crate::stream::FrameStream;

// =========================================================================
// Logging
// =========================================================================

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =========================================================================
// Frame builders
// =========================================================================

/// Frame with distinct values in every channel: red ramps along x, green
/// along y, blue mixes both.
pub fn gradient_frame(width: u32, height: u32) -> FrameBuffer {
    let ramp = |v: u32, len: u32| (v * 255 / len.saturating_sub(1).max(1)) as u8;
    FrameBuffer::from_fn(width, height, |x, y| {
        Bgr::rgb(ramp(x, width), ramp(y, height), ((x * 7 + y * 13) % 256) as u8)
    })
}

/// Gradient frame whose rows carry `padding` extra bytes, all `0xEE`.
pub fn padded_frame(width: u32, height: u32, padding: u32) -> FrameBuffer {
    let packed = gradient_frame(width, height);
    let stride = width * 3 + padding;
    let mut bytes = Vec::with_capacity((stride * height) as usize);
    for y in 0..height {
        bytes.extend_from_slice(packed.row(y));
        bytes.extend(std::iter::repeat_n(0xEE, padding as usize));
    }
    FrameBuffer::from_raw(width, height, stride, bytes).unwrap()
}

/// Frame made entirely of chroma-key green.
pub fn green_screen_frame(width: u32, height: u32) -> FrameBuffer {
    FrameBuffer::filled(width, height, Bgr::rgb(20, 220, 30))
}

// =========================================================================
// Probes
// =========================================================================

/// Number of pixels in column `x` that have the bar color.
pub fn column_bar_height(canvas: &FrameBuffer, x: u32, bar: Bgr) -> u32 {
    (0..canvas.height())
        .filter(|&y| canvas.pixel(x, y) == bar)
        .count() as u32
}

/// Keep offering frames until the idle worker takes one. Panics after ~5s.
pub fn submit_until_accepted(stream: &FrameStream, make: impl Fn() -> FrameBuffer) -> u64 {
    for _ in 0..5000 {
        if let crate::stream::Submission::Accepted(seq) = stream.submit(make()) {
            return seq;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    panic!("worker never accepted a frame");
}
