//! Engine configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [viewport]
//! width = 320               # Output width of processed frames
//! height = 240              # Output height of processed frames
//!
//! [effects]
//! default = "none"          # Effect active at startup
//! smooth_weight = 1         # Center weight of the smooth kernel
//!
//! [histogram]
//! width = 256               # Chart canvas width
//! height = 200              # Chart canvas height
//! background = [255, 255, 255]  # RGB
//! bar = [0, 0, 0]           # RGB
//!
//! [processing]
//! max_threads = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::effects::{DispatchOptions, EffectSelection};
use crate::imaging::kernel::DEFAULT_SMOOTH_WEIGHT;
use crate::imaging::{Bgr, HistogramStyle, histogram};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Engine configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Output size for processed frames.
    pub viewport: ViewportConfig,
    /// Startup effect and kernel tunables.
    pub effects: EffectsConfig,
    /// Histogram chart canvas and colors.
    pub histogram: HistogramConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl EngineConfig {
    /// Parse a TOML document on top of the stock defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let overlay: toml::Value = toml::from_str(content)?;
        resolve_config(stock_defaults_value(), Some(overlay))
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Validation(
                "viewport.width and viewport.height must be non-zero".into(),
            ));
        }
        if self.histogram.width == 0 || self.histogram.height == 0 {
            return Err(ConfigError::Validation(
                "histogram.width and histogram.height must be non-zero".into(),
            ));
        }
        let weight = self.effects.smooth_weight;
        if !(-255..=255).contains(&weight) {
            return Err(ConfigError::Validation(
                "effects.smooth_weight must be within -255..=255".into(),
            ));
        }
        if weight == -8 {
            return Err(ConfigError::Validation(
                "effects.smooth_weight must not be -8 (kernel factor would be zero)".into(),
            ));
        }
        Ok(())
    }

    /// Options handed to the [`Dispatcher`](crate::effects::Dispatcher).
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            smooth_weight: self.effects.smooth_weight,
            histogram: self.histogram.style(),
        }
    }
}

/// Output size of processed frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
        }
    }
}

/// Startup effect and kernel tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    /// Effect active before anyone calls `set_effect`.
    pub default: EffectSelection,
    /// Center weight of the smooth kernel; its factor is `smooth_weight + 8`.
    pub smooth_weight: i32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            default: EffectSelection::None,
            smooth_weight: DEFAULT_SMOOTH_WEIGHT,
        }
    }
}

/// Histogram chart settings. Colors are `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistogramConfig {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub bar: [u8; 3],
}

impl HistogramConfig {
    pub fn style(&self) -> HistogramStyle {
        let [br, bg, bb] = self.background;
        let [r, g, b] = self.bar;
        HistogramStyle {
            width: self.width,
            height: self.height,
            background: Bgr::rgb(br, bg, bb),
            bar: Bgr::rgb(r, g, b),
        }
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            width: histogram::DEFAULT_WIDTH,
            height: histogram::DEFAULT_HEIGHT,
            background: [255, 255, 255],
            bar: [0, 0, 0],
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of worker threads for pixel work.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up), at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.min(cores))
        .unwrap_or(cores)
        .max(1)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EngineConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<EngineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: EngineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the TOML file at `path`, falling back to stock defaults
/// when it does not exist.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let config = resolve_config(stock_defaults_value(), load_raw_config(path)?)?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Digital Imager Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output size
# ---------------------------------------------------------------------------
[viewport]
# Every processed frame is scaled to cover this size and center-cropped.
width = 320
height = 240

# ---------------------------------------------------------------------------
# Effects
# ---------------------------------------------------------------------------
[effects]
# Effect active at startup. One of:
#   none, copy, greyscale, invert, sepia, histogram, subtract,
#   smooth, gaussian-blur, sharpen, mean-removal,
#   emboss-laplacian, emboss-horz-vert, emboss-all-directions,
#   emboss-lossy, emboss-horizontal, emboss-vertical
default = "none"

# Center weight of the smooth kernel (factor = weight + 8, so -8 is invalid).
smooth_weight = 1

# ---------------------------------------------------------------------------
# Histogram chart
# ---------------------------------------------------------------------------
[histogram]
width = 256
height = 200
# Colors as [red, green, blue].
background = [255, 255, 255]
bar = [0, 0, 0]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum worker threads for pixel work. Omit to use all CPU cores.
# Values above the core count are clamped down.
# max_threads = 4
"##
}
