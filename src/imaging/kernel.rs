//! 3×3 convolution kernels and the named presets.
//!
//! A kernel describes *what* to compute; [`convolution::apply`](super::convolution::apply)
//! does the pixel work. Presets are `const` values so the whole filter table
//! is fixed at compile time.
//!
//! | Preset | Center | Others | Factor | Offset |
//! |---|---|---|---|---|
//! | smooth | `w` (default 1) | all 1 | `w + 8` | 0 |
//! | Gaussian blur | 4 | corners 1, edges 2 | 16 | 0 |
//! | sharpen | 11 | corners 0, edges −2 | 3 | 0 |
//! | mean removal | 9 | all −1 | 1 | 0 |
//! | emboss Laplacian | 4 | corners −1, edges 0 | 1 | 127 |
//! | emboss horz/vert | 4 | edges −1, corners 0 | 1 | 127 |
//! | emboss all directions | 8 | all −1 | 1 | 127 |
//! | emboss lossy | 4 | top-left, top-right, bottom-mid 1; others −2 | 1 | 127 |
//! | emboss horizontal | 2 | mid-left, mid-right −1 | 1 | 127 |
//! | emboss vertical | 0 | top-mid −1, bottom-mid 1 | 1 | 127 |

use std::fmt;
use std::str::FromStr;

/// Nine weights plus normalization.
///
/// `weights[row][col]`, row 0 is the line above the target pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvolutionKernel {
    pub weights: [[i32; 3]; 3],
    pub factor: i32,
    pub offset: i32,
}

impl ConvolutionKernel {
    pub const fn new(weights: [[i32; 3]; 3], factor: i32, offset: i32) -> Self {
        Self {
            weights,
            factor,
            offset,
        }
    }

    /// Symmetric kernel from a center weight, one corner weight and one edge weight.
    pub const fn symmetric(center: i32, corner: i32, edge: i32, factor: i32, offset: i32) -> Self {
        Self::new(
            [
                [corner, edge, corner],
                [edge, center, edge],
                [corner, edge, corner],
            ],
            factor,
            offset,
        )
    }

    pub const fn top_left(&self) -> i32 {
        self.weights[0][0]
    }

    pub const fn center(&self) -> i32 {
        self.weights[1][1]
    }

    pub const fn bottom_right(&self) -> i32 {
        self.weights[2][2]
    }
}

/// Pixel weight of the smooth preset when none is configured.
pub const DEFAULT_SMOOTH_WEIGHT: i32 = 1;

/// Smoothing average with an adjustable center weight.
///
/// A weight of -8 yields a zero factor, which the engine rejects. The factor
/// saturates at `i32::MAX`.
pub const fn smooth(weight: i32) -> ConvolutionKernel {
    ConvolutionKernel::symmetric(weight, 1, 1, weight.saturating_add(8), 0)
}

pub const GAUSSIAN_BLUR: ConvolutionKernel = ConvolutionKernel::symmetric(4, 1, 2, 16, 0);

pub const SHARPEN: ConvolutionKernel = ConvolutionKernel::symmetric(11, 0, -2, 3, 0);

pub const MEAN_REMOVAL: ConvolutionKernel = ConvolutionKernel::symmetric(9, -1, -1, 1, 0);

pub const EMBOSS_LAPLACIAN: ConvolutionKernel = ConvolutionKernel::symmetric(4, -1, 0, 1, 127);

pub const EMBOSS_HORZ_VERT: ConvolutionKernel = ConvolutionKernel::symmetric(4, 0, -1, 1, 127);

pub const EMBOSS_ALL_DIRECTIONS: ConvolutionKernel =
    ConvolutionKernel::symmetric(8, -1, -1, 1, 127);

pub const EMBOSS_LOSSY: ConvolutionKernel =
    ConvolutionKernel::new([[1, -2, 1], [-2, 4, -2], [-2, 1, -2]], 1, 127);

pub const EMBOSS_HORIZONTAL: ConvolutionKernel =
    ConvolutionKernel::new([[0, 0, 0], [-1, 2, -1], [0, 0, 0]], 1, 127);

pub const EMBOSS_VERTICAL: ConvolutionKernel =
    ConvolutionKernel::new([[0, -1, 0], [0, 0, 0], [0, 1, 0]], 1, 127);

/// Named kernel presets selectable as effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelPreset {
    Smooth,
    GaussianBlur,
    Sharpen,
    MeanRemoval,
    EmbossLaplacian,
    EmbossHorzVert,
    EmbossAllDirections,
    EmbossLossy,
    EmbossHorizontal,
    EmbossVertical,
}

impl KernelPreset {
    pub const ALL: [KernelPreset; 10] = [
        KernelPreset::Smooth,
        KernelPreset::GaussianBlur,
        KernelPreset::Sharpen,
        KernelPreset::MeanRemoval,
        KernelPreset::EmbossLaplacian,
        KernelPreset::EmbossHorzVert,
        KernelPreset::EmbossAllDirections,
        KernelPreset::EmbossLossy,
        KernelPreset::EmbossHorizontal,
        KernelPreset::EmbossVertical,
    ];

    /// The kernel for this preset. `smooth_weight` only affects [`KernelPreset::Smooth`].
    pub const fn kernel(self, smooth_weight: i32) -> ConvolutionKernel {
        match self {
            KernelPreset::Smooth => smooth(smooth_weight),
            KernelPreset::GaussianBlur => GAUSSIAN_BLUR,
            KernelPreset::Sharpen => SHARPEN,
            KernelPreset::MeanRemoval => MEAN_REMOVAL,
            KernelPreset::EmbossLaplacian => EMBOSS_LAPLACIAN,
            KernelPreset::EmbossHorzVert => EMBOSS_HORZ_VERT,
            KernelPreset::EmbossAllDirections => EMBOSS_ALL_DIRECTIONS,
            KernelPreset::EmbossLossy => EMBOSS_LOSSY,
            KernelPreset::EmbossHorizontal => EMBOSS_HORIZONTAL,
            KernelPreset::EmbossVertical => EMBOSS_VERTICAL,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            KernelPreset::Smooth => "smooth",
            KernelPreset::GaussianBlur => "gaussian-blur",
            KernelPreset::Sharpen => "sharpen",
            KernelPreset::MeanRemoval => "mean-removal",
            KernelPreset::EmbossLaplacian => "emboss-laplacian",
            KernelPreset::EmbossHorzVert => "emboss-horz-vert",
            KernelPreset::EmbossAllDirections => "emboss-all-directions",
            KernelPreset::EmbossLossy => "emboss-lossy",
            KernelPreset::EmbossHorizontal => "emboss-horizontal",
            KernelPreset::EmbossVertical => "emboss-vertical",
        }
    }
}

impl fmt::Display for KernelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KernelPreset::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown kernel preset '{s}'"))
    }
}
