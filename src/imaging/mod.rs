//! Pixel-level image operations on raw BGR buffers.
//!
//! | Operation | Module / function |
//! |---|---|
//! | **Buffer** | [`FrameBuffer`]: width, height, stride, BGR bytes |
//! | **Greyscale / invert / sepia** | [`point`] |
//! | **3×3 convolution** | [`convolution::apply`] with a [`ConvolutionKernel`] |
//! | **Kernel presets** | [`kernel`]: smooth, Gaussian blur, sharpen, mean removal, emboss × 6 |
//! | **Luminance histogram** | [`histogram::compute`] + [`histogram::render`] |
//! | **Green-screen composite** | [`chroma::subtract`] |
//! | **Cover-fit resize + crop** | [`resize::resize_and_crop`] (`image` crate, Catmull-Rom) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Frame**: The buffer type, pixel accessors and [`EffectError`]
//! - **Operations**: One module per effect family, each `&FrameBuffer → Result<FrameBuffer>`
//!
//! No operation mutates its input. Errors are returned before any output is
//! built, so a failed call leaves nothing half-written.

mod calculations;
pub mod chroma;
pub mod convolution;
mod frame;
pub mod histogram;
pub mod kernel;
pub mod point;
pub mod resize;

pub use calculations::{
    calculate_crop_offset, calculate_fill_dimensions, calculate_source_window,
};
pub use frame::{BYTES_PER_PIXEL, Bgr, EffectError, FrameBuffer, Result};
pub use histogram::{Histogram, HistogramStyle};
pub use kernel::{ConvolutionKernel, KernelPreset};
pub use resize::{resize_and_crop, resize_exact};
