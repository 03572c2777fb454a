//! Effect selection and dispatch.
//!
//! [`EffectSelection`] names one transform; [`Dispatcher::dispatch`] runs it
//! and then fits the result to the output size:
//!
//! ```text
//! frame ──▶ effect (selection) ──▶ resize_and_crop(target) ──▶ output
//! ```
//!
//! `none` and `copy` skip the effect stage. `subtract` stretches the
//! background to the frame's size before compositing, so callers can keep a
//! background at any resolution.

use crate::imaging::kernel::DEFAULT_SMOOTH_WEIGHT;
use crate::imaging::{
    self, FrameBuffer, HistogramStyle, KernelPreset, chroma, convolution, histogram, point,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Which transform to apply to incoming frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EffectSelection {
    #[default]
    None,
    Copy,
    Greyscale,
    Invert,
    Sepia,
    Histogram,
    Subtract,
    Kernel(KernelPreset),
}

impl EffectSelection {
    /// Every selectable effect, in menu order.
    pub fn all() -> Vec<EffectSelection> {
        let mut all = vec![
            EffectSelection::None,
            EffectSelection::Copy,
            EffectSelection::Greyscale,
            EffectSelection::Invert,
            EffectSelection::Sepia,
            EffectSelection::Histogram,
            EffectSelection::Subtract,
        ];
        all.extend(KernelPreset::ALL.into_iter().map(EffectSelection::Kernel));
        all
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectSelection::None => "none",
            EffectSelection::Copy => "copy",
            EffectSelection::Greyscale => "greyscale",
            EffectSelection::Invert => "invert",
            EffectSelection::Sepia => "sepia",
            EffectSelection::Histogram => "histogram",
            EffectSelection::Subtract => "subtract",
            EffectSelection::Kernel(preset) => preset.name(),
        }
    }

    /// Whether the effect reads the background buffer.
    pub fn uses_background(self) -> bool {
        self == EffectSelection::Subtract
    }
}

impl fmt::Display for EffectSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectSelection::all()
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| format!("unknown effect '{s}'"))
    }
}

impl TryFrom<String> for EffectSelection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EffectSelection> for String {
    fn from(value: EffectSelection) -> Self {
        value.name().to_string()
    }
}

/// Tunables that affect how effects render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    pub smooth_weight: i32,
    pub histogram: HistogramStyle,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            smooth_weight: DEFAULT_SMOOTH_WEIGHT,
            histogram: HistogramStyle::default(),
        }
    }
}

/// Routes a selection to its operation and fits the result to a target size.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(options: DispatchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Apply `selection` to `frame` and resize/crop the result to `target_w × target_h`.
    pub fn dispatch(
        &self,
        frame: &FrameBuffer,
        selection: EffectSelection,
        background: Option<&FrameBuffer>,
        target_w: u32,
        target_h: u32,
    ) -> imaging::Result<FrameBuffer> {
        let effected = self.apply(frame, selection, background)?;
        log::debug!(
            "dispatch {selection}: {}x{} → {target_w}x{target_h}",
            frame.width(),
            frame.height()
        );
        imaging::resize_and_crop(&effected, target_w, target_h)
    }

    /// Run only the effect stage. `none` and `copy` borrow the input.
    pub fn apply<'a>(
        &self,
        frame: &'a FrameBuffer,
        selection: EffectSelection,
        background: Option<&FrameBuffer>,
    ) -> imaging::Result<Cow<'a, FrameBuffer>> {
        frame.ensure_non_empty()?;
        let out = match selection {
            EffectSelection::None | EffectSelection::Copy => return Ok(Cow::Borrowed(frame)),
            EffectSelection::Greyscale => point::greyscale(frame)?,
            EffectSelection::Invert => point::invert(frame)?,
            EffectSelection::Sepia => point::sepia(frame)?,
            EffectSelection::Histogram => {
                let counts = histogram::compute(frame)?;
                histogram::render(&counts, &self.options.histogram)?
            }
            EffectSelection::Subtract => {
                let fitted = background
                    .map(|bg| fit_background(bg, frame.dimensions()))
                    .transpose()?;
                chroma::subtract(frame, fitted.as_deref())?
            }
            EffectSelection::Kernel(preset) => {
                convolution::apply(frame, &preset.kernel(self.options.smooth_weight))?
            }
        };
        Ok(Cow::Owned(out))
    }
}

/// Apply `selection` with default options.
pub fn dispatch(
    frame: &FrameBuffer,
    selection: EffectSelection,
    background: Option<&FrameBuffer>,
    target_w: u32,
    target_h: u32,
) -> imaging::Result<FrameBuffer> {
    Dispatcher::default().dispatch(frame, selection, background, target_w, target_h)
}

fn fit_background(
    background: &FrameBuffer,
    size: (u32, u32),
) -> imaging::Result<Cow<'_, FrameBuffer>> {
    if background.dimensions() == size {
        return Ok(Cow::Borrowed(background));
    }
    imaging::resize_exact(background, size.0, size.1).map(Cow::Owned)
}
