//! Raw pixel buffers and the shared error type.
//!
//! Every imaging operation works on a [`FrameBuffer`]: an owned byte buffer
//! with explicit width, height and row stride, three bytes per pixel in
//! `(blue, green, red)` order. The layout is fixed so buffers coming from a
//! capture driver can be handed in without repacking.
//!
//! ```text
//! row y:  [b g r][b g r] ... [b g r][padding ...]
//!          x = 0  x = 1      x = w-1   stride - w*3 bytes
//! ```

use image::{Rgb, RgbImage};
use thiserror::Error;

/// Bytes per pixel. The channel order is always blue, green, red.
pub const BYTES_PER_PIXEL: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid kernel: factor must be non-zero")]
    InvalidKernel,
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("Histogram is empty: every bucket is zero")]
    EmptyInput,
    #[error("Invalid buffer layout: {0}")]
    Layout(String),
}

/// Result type for imaging operations.
pub type Result<T> = std::result::Result<T, EffectError>;

/// One pixel, stored in buffer order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bgr {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Bgr {
    pub const BLACK: Bgr = Bgr { b: 0, g: 0, r: 0 };
    pub const WHITE: Bgr = Bgr {
        b: 255,
        g: 255,
        r: 255,
    };

    /// Build a pixel from the usual `(red, green, blue)` argument order.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r }
    }

    /// Integer average of the three channels, the luminance bucket.
    pub fn luminance(self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }

    fn from_slice(px: &[u8]) -> Self {
        Self {
            b: px[0],
            g: px[1],
            r: px[2],
        }
    }

    fn write_to(self, px: &mut [u8]) {
        px[0] = self.b;
        px[1] = self.g;
        px[2] = self.r;
    }
}

/// Owned BGR pixel buffer with an explicit row stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    stride: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Zero-filled (black) buffer with a tightly packed stride.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width * BYTES_PER_PIXEL as u32;
        Self {
            width,
            height,
            stride,
            pixels: vec![0; stride as usize * height as usize],
        }
    }

    /// Buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Bgr) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Buffer whose pixels are produced by `f(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Bgr) -> Self {
        let mut frame = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                frame.set_pixel(x, y, f(x, y));
            }
        }
        frame
    }

    /// Wrap raw bytes from an external producer, checking the layout invariants.
    pub fn from_raw(width: u32, height: u32, stride: u32, pixels: Vec<u8>) -> Result<Self> {
        let min_stride = width as u64 * BYTES_PER_PIXEL as u64;
        if (stride as u64) < min_stride {
            return Err(EffectError::Layout(format!(
                "stride {stride} is smaller than width * 3 ({min_stride})"
            )));
        }
        let expected_len = stride as u64 * height as u64;
        if pixels.len() as u64 != expected_len {
            return Err(EffectError::Layout(format!(
                "buffer holds {} bytes, expected stride * height = {expected_len}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            pixels,
        })
    }

    /// Convert from an RGB image (swaps to BGR order, packed stride).
    pub fn from_rgb_image(img: &RgbImage) -> Self {
        Self::from_fn(img.width(), img.height(), |x, y| {
            let Rgb([r, g, b]) = *img.get_pixel(x, y);
            Bgr::rgb(r, g, b)
        })
    }

    /// Convert to an RGB image, dropping any row padding.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let px = self.pixel(x, y);
            Rgb([px.r, px.g, px.b])
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// All bytes, including row padding.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel bytes of row `y`, without padding. Panics if `y` is out of range.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride as usize;
        &self.pixels[start..start + self.row_len()]
    }

    /// Read the pixel at `(x, y)`. Panics if out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Bgr {
        let idx = self.index(x, y);
        Bgr::from_slice(&self.pixels[idx..idx + BYTES_PER_PIXEL])
    }

    /// Write the pixel at `(x, y)`. Panics if out of range.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Bgr) {
        let idx = self.index(x, y);
        color.write_to(&mut self.pixels[idx..idx + BYTES_PER_PIXEL]);
    }

    /// Bounds-checked read.
    pub fn get(&self, x: u32, y: u32) -> Option<Bgr> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Bgr> + '_ {
        (0..self.height).flat_map(move |y| {
            self.row(y)
                .chunks_exact(BYTES_PER_PIXEL)
                .map(Bgr::from_slice)
        })
    }

    /// Fail with `InvalidInput` when the buffer has no pixels.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            return Err(EffectError::InvalidInput(format!(
                "buffer has zero dimension ({}x{})",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Number of meaningful bytes in each row.
    pub(crate) fn row_len(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Mutable access to the whole byte buffer, for row-parallel writers.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} buffer",
            self.width,
            self.height
        );
        y as usize * self.stride as usize + x as usize * BYTES_PER_PIXEL
    }
}

/// Map every pixel of `src` through `f` into a new buffer of the same layout.
///
/// Rows are processed in parallel. Padding bytes are copied as-is.
pub(crate) fn map_pixels(src: &FrameBuffer, f: impl Fn(Bgr) -> Bgr + Sync) -> Result<FrameBuffer> {
    use rayon::prelude::*;

    src.ensure_non_empty()?;
    let mut out = src.clone();
    let stride = out.stride as usize;
    let row_len = out.row_len();
    out.bytes_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row[..row_len].chunks_exact_mut(BYTES_PER_PIXEL) {
            f(Bgr::from_slice(px)).write_to(px);
        }
    });
    Ok(out)
}
