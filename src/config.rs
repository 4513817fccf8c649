//! Configuration module.
//!
//! Handles loading, validating, and merging `stitchstrip.toml`. Stock defaults
//! are overridden by an optional user file, and command-line flags override
//! both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! initial_slots = 2          # Empty image slots a session starts with
//!
//! [container]
//! width = 800                # Client width of the host container (px)
//! height = 600               # Client height of the host container (px)
//!
//! [layout]
//! mode = "horizontal"        # "horizontal" (side by side) or "vertical" (stacked)
//!
//! [surface]
//! background = [0, 0, 0, 0]  # RGBA of pixels not covered by an image
//! filter = "triangle"        # nearest | triangle | catmull-rom | gaussian | lanczos3
//! max_pixels = 268435456     # Largest surface allowed, in pixels
//!
//! [processing]
//! max_processes = 4          # Max parallel decoders (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::compositing::{DEFAULT_MAX_PIXELS, ResampleFilter};
use crate::types::{LayoutMode, Size};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILE_NAME: &str = "stitchstrip.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `stitchstrip.toml`.
///
/// All fields have defaults; user files only name what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StitchConfig {
    /// Empty slots a session starts with.
    pub initial_slots: usize,
    /// Size of the host container the surface is bound to.
    pub container: ContainerConfig,
    /// Initial layout mode.
    pub layout: LayoutConfig,
    /// Surface clearing and resampling.
    pub surface: SurfaceConfig,
    /// Parallel decoding settings.
    pub processing: ProcessingConfig,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            initial_slots: 2,
            container: ContainerConfig::default(),
            layout: LayoutConfig::default(),
            surface: SurfaceConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl StitchConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container.width == 0 || self.container.height == 0 {
            return Err(ConfigError::Validation(
                "container.width and container.height must be non-zero".into(),
            ));
        }
        if self.surface.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "surface.max_pixels must be at least 1".into(),
            ));
        }
        if self.container.size().area() > self.surface.max_pixels {
            return Err(ConfigError::Validation(format!(
                "container {} exceeds surface.max_pixels ({})",
                self.container.size(),
                self.surface.max_pixels
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    pub width: u32,
    pub height: u32,
}

impl ContainerConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    /// RGBA colour of cleared pixels.
    pub background: [u8; 4],
    pub filter: ResampleFilter,
    /// Layouts needing more pixels than this are not drawn.
    pub max_pixels: u64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            background: [0, 0, 0, 0],
            filter: ResampleFilter::default(),
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }
}

/// Parallel decoding settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel decode workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for user overrides.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(StitchConfig::default()).expect("default config must serialize")
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

/// Read `stitchstrip.toml` from `dir` as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<StitchConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StitchConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `stitchstrip.toml` in `dir`, on top of stock defaults.
pub fn load_config(dir: &Path) -> Result<StitchConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// A fully-commented stock `stitchstrip.toml`. Printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# stitchstrip configuration
# ==========================
#
# Place this file as stitchstrip.toml in the directory passed to --config-dir
# (the current directory by default). Every key is optional: delete anything
# you do not want to change. Unknown keys are rejected.

# Number of empty image slots a session starts with.
initial_slots = 2

# ---------------------------------------------------------------------------
# Container
# ---------------------------------------------------------------------------
# Client size of the element hosting the surface. Horizontal layouts scale
# every image to this height; vertical layouts scale every image to this width.
[container]
width = 800
height = 600

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# "horizontal": images side by side, sharing one height.
# "vertical":   images stacked, sharing one width.
mode = "horizontal"

# ---------------------------------------------------------------------------
# Surface
# ---------------------------------------------------------------------------
[surface]
# RGBA colour of pixels no image covers (the whole surface when empty).
background = [0, 0, 0, 0]
# Resampling filter: nearest | triangle | catmull-rom | gaussian | lanczos3
filter = "triangle"
# Largest surface allowed, in pixels (1 GiB of RGBA by default). Layouts
# needing more are reported and left blank instead of drawn.
max_pixels = 268435456

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image decoders. Omit for one per CPU core; larger values
# are clamped to the core count.
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn default_config_values() {
        let config = StitchConfig::default();
        assert_eq!(config.initial_slots, 2);
        assert_eq!(config.container.size(), Size::new(800, 600));
        assert_eq!(config.layout.mode, LayoutMode::Horizontal);
        assert_eq!(config.surface.background, [0, 0, 0, 0]);
        assert_eq!(config.surface.filter, ResampleFilter::Triangle);
        assert_eq!(config.surface.max_pixels, DEFAULT_MAX_PIXELS);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(StitchConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_container_fails() {
        let mut config = StitchConfig::default();
        config.container.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_max_pixels_fails() {
        let mut config = StitchConfig::default();
        config.surface.max_pixels = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_container_over_max_pixels_fails() {
        let mut config = StitchConfig::default();
        config.surface.max_pixels = 1000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("800x600"), "{err}");
    }

    #[test]
    fn validate_zero_processes_fails() {
        let mut config = StitchConfig::default();
        config.processing.max_processes = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, StitchConfig::default());
    }

    #[test]
    fn load_config_merges_partial_file() {
        let tmp = TempDir::new().unwrap();
        write_config(
            tmp.path(),
            r#"
[container]
height = 300

[layout]
mode = "vertical"
"#,
        );

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.container.size(), Size::new(800, 300));
        assert_eq!(config.layout.mode, LayoutMode::Vertical);
        assert_eq!(config.initial_slots, 2);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "this is not [valid toml");
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[container]\nwidth = 0\n");
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[layout]\ndirection = \"vertical\"\n");
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn unknown_mode_rejected() {
        let tmp = TempDir::new().unwrap();
        write_config(tmp.path(), "[layout]\nmode = \"diagonal\"\n");
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[surface]\nbackground = [0, 0, 0, 0]\nfilter = \"nearest\"").unwrap();
        let overlay: toml::Value = toml::from_str("[surface]\nfilter = \"lanczos3\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["surface"]["filter"].as_str(), Some("lanczos3"));
        assert!(merged["surface"]["background"].is_array());
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_auto_uses_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(value)).unwrap();
        assert_eq!(config, StitchConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        for section in ["container", "layout", "surface", "processing"] {
            assert!(value.get(section).is_some(), "missing [{section}]");
        }
    }
}
