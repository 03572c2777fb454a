//! # Digital Imager
//!
//! Pixel-level visual effects for still images and live video frames. The
//! crate is the computational core only: something else decodes files or
//! captures frames and hands over raw BGR buffers; this crate returns
//! processed buffers for something else to display or encode.
//!
//! # Architecture: Effect, then Fit
//!
//! Every frame goes through the same two stages:
//!
//! ```text
//! FrameBuffer ──▶ effect (selected) ──▶ resize_and_crop(viewport) ──▶ FrameBuffer
//! ```
//!
//! The effect stage never changes the viewport; the fit stage never changes
//! colors. `none`/`copy` skip the first stage, so switching effects never
//! changes the output size.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Buffers and pixel operations: point transforms, 3×3 convolution, histogram, chroma key, resize/crop |
//! | [`effects`] | [`EffectSelection`](effects::EffectSelection) and the [`Dispatcher`](effects::Dispatcher) |
//! | [`session`] | Guarded control state (`set_effect`, `set_background`) and the [`Processor`](session::Processor) |
//! | [`stream`] | Frame-dropping worker for live sources |
//! | [`config`] | `config.toml` loading, merging, and validation |
//!
//! # Design Decisions
//!
//! ## Fixed BGR Layout
//!
//! Buffers are three bytes per pixel in blue-green-red order with an explicit
//! stride, the layout capture drivers and bitmap APIs hand out. Operations
//! index rows through the stride and leave padding bytes alone, so a buffer
//! can round-trip to its producer unchanged.
//!
//! ## Integer Arithmetic Where It Matters
//!
//! Greyscale, the histogram bucket and convolution use truncating integer
//! math. Convolution in particular divides by the kernel factor with
//! truncation toward zero before adding the offset; emboss presets rely on
//! that to center flat regions at 127.
//!
//! ## Convolution Border
//!
//! The outermost pixel ring is copied from the source, not filtered. Every
//! convolution preset shows a one-pixel unfiltered frame as a result.
//!
//! ## No Frame Queue
//!
//! Live frames are accepted only while the worker is idle. A slow effect
//! lowers the frame rate instead of building latency.

pub mod config;
pub mod effects;
pub mod imaging;
pub mod session;
pub mod stream;

#[cfg(test)]
pub(crate) mod test_helpers;
