//! Luminance histogram: counting and bar-chart rendering.

use super::frame::{Bgr, EffectError, FrameBuffer, Result};

/// Number of luminance buckets.
pub const BUCKETS: usize = 256;

/// Default canvas for [`render`].
pub const DEFAULT_WIDTH: u32 = 256;
pub const DEFAULT_HEIGHT: u32 = 200;

/// Pixel counts per luminance bucket `(r + g + b) / 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; BUCKETS],
}

impl Histogram {
    pub fn from_counts(counts: [u64; BUCKETS]) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> &[u64; BUCKETS] {
        &self.counts
    }

    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            counts: [0; BUCKETS],
        }
    }
}

/// Colors and canvas size for a rendered histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramStyle {
    pub width: u32,
    pub height: u32,
    pub background: Bgr,
    pub bar: Bgr,
}

impl Default for HistogramStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: Bgr::WHITE,
            bar: Bgr::BLACK,
        }
    }
}

/// Count every pixel of `frame` into its luminance bucket.
pub fn compute(frame: &FrameBuffer) -> Result<Histogram> {
    frame.ensure_non_empty()?;
    let mut histogram = Histogram::default();
    for px in frame.pixels() {
        histogram.counts[px.luminance() as usize] += 1;
    }
    Ok(histogram)
}

/// Draw `histogram` as vertical bars rising from the bottom edge.
///
/// Bar height is `round(count * height / max)`. When the canvas is not 256
/// columns wide, column `x` shows bucket `x * 256 / width`.
///
/// An all-zero histogram has no scale and fails with [`EffectError::EmptyInput`].
pub fn render(histogram: &Histogram, style: &HistogramStyle) -> Result<FrameBuffer> {
    if style.width == 0 || style.height == 0 {
        return Err(EffectError::InvalidInput(format!(
            "histogram canvas has zero dimension ({}x{})",
            style.width, style.height
        )));
    }
    let max = histogram.max();
    if max == 0 {
        return Err(EffectError::EmptyInput);
    }

    let mut canvas = FrameBuffer::filled(style.width, style.height, style.background);
    for x in 0..style.width {
        let bucket = (x as u64 * BUCKETS as u64 / style.width as u64) as usize;
        let bar = bar_height(histogram.counts[bucket], max, style.height);
        for y in (style.height - bar)..style.height {
            canvas.set_pixel(x, y, style.bar);
        }
    }
    Ok(canvas)
}

fn bar_height(count: u64, max: u64, height: u32) -> u32 {
    ((count as f64 * height as f64 / max as f64).round() as u32).min(height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{column_bar_height, gradient_frame, padded_frame};

    #[test]
    fn counts_sum_to_pixel_count() {
        for frame in [gradient_frame(31, 17), padded_frame(7, 5, 2)] {
            let h = compute(&frame).unwrap();
            assert_eq!(h.total(), frame.width() as u64 * frame.height() as u64);
        }
    }

    #[test]
    fn black_frame_fills_bucket_zero() {
        let h = compute(&FrameBuffer::new(4, 3)).unwrap();
        assert_eq!(h.counts()[0], 12);
        assert_eq!(h.max(), 12);
    }

    #[test]
    fn bucket_is_truncated_average() {
        let frame = FrameBuffer::filled(2, 1, Bgr::rgb(10, 11, 13));
        let h = compute(&frame).unwrap();
        assert_eq!(h.counts()[11], 2);
    }

    #[test]
    fn empty_frame_is_rejected() {
        assert!(matches!(
            compute(&FrameBuffer::new(3, 0)),
            Err(EffectError::InvalidInput(_))
        ));
    }

    #[test]
    fn render_has_fixed_canvas() {
        let h = compute(&gradient_frame(64, 64)).unwrap();
        let canvas = render(&h, &HistogramStyle::default()).unwrap();
        assert_eq!(canvas.dimensions(), (256, 200));
    }

    #[test]
    fn render_all_zero_is_empty_input() {
        assert_eq!(
            render(&Histogram::default(), &HistogramStyle::default()),
            Err(EffectError::EmptyInput)
        );
    }

    #[test]
    fn render_scales_bars_to_max() {
        let mut counts = [0u64; BUCKETS];
        counts[0] = 40;
        counts[10] = 10;
        counts[20] = 1;
        let canvas = render(&Histogram::from_counts(counts), &HistogramStyle::default()).unwrap();

        assert_eq!(column_bar_height(&canvas, 0, Bgr::BLACK), 200);
        assert_eq!(column_bar_height(&canvas, 10, Bgr::BLACK), 50);
        // 1 * 200 / 40 = 5
        assert_eq!(column_bar_height(&canvas, 20, Bgr::BLACK), 5);
        assert_eq!(column_bar_height(&canvas, 30, Bgr::BLACK), 0);
    }

    #[test]
    fn render_rounds_bar_height() {
        let mut counts = [0u64; BUCKETS];
        counts[0] = 3;
        counts[1] = 1;
        let style = HistogramStyle {
            height: 10,
            ..HistogramStyle::default()
        };
        let canvas = render(&Histogram::from_counts(counts), &style).unwrap();
        // 1 * 10 / 3 = 3.33 → 3
        assert_eq!(column_bar_height(&canvas, 1, Bgr::BLACK), 3);

        counts[1] = 2;
        let canvas = render(&Histogram::from_counts(counts), &style).unwrap();
        // 2 * 10 / 3 = 6.67 → 7
        assert_eq!(column_bar_height(&canvas, 1, Bgr::BLACK), 7);
    }

    #[test]
    fn render_uses_style_colors() {
        let mut counts = [0u64; BUCKETS];
        counts[255] = 1;
        let style = HistogramStyle {
            background: Bgr::rgb(0, 0, 80),
            bar: Bgr::rgb(250, 200, 0),
            ..HistogramStyle::default()
        };
        let canvas = render(&Histogram::from_counts(counts), &style).unwrap();
        assert_eq!(canvas.pixel(0, 0), style.background);
        assert_eq!(canvas.pixel(255, 0), style.bar);
        assert_eq!(canvas.pixel(255, 199), style.bar);
    }

    #[test]
    fn render_narrow_canvas_samples_buckets() {
        let mut counts = [0u64; BUCKETS];
        counts[128] = 5;
        let style = HistogramStyle {
            width: 128,
            ..HistogramStyle::default()
        };
        let canvas = render(&Histogram::from_counts(counts), &style).unwrap();
        assert_eq!(canvas.width(), 128);
        // column 64 → bucket 128
        assert_eq!(column_bar_height(&canvas, 64, Bgr::BLACK), 200);
        assert_eq!(column_bar_height(&canvas, 63, Bgr::BLACK), 0);
    }
}
