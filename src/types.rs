//! Shared types used by the compositor, its collaborators and the CLI.
//!
//! These types are serialized into config files and `--json` output, so their
//! serde representation is part of the user-facing surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction in which images are packed.
///
/// - `Horizontal`: side by side, all scaled to a common height.
/// - `Vertical`: stacked, all scaled to a common width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Horizontal,
    Vertical,
}

impl LayoutMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            LayoutMode::Horizontal => LayoutMode::Vertical,
            LayoutMode::Vertical => LayoutMode::Horizontal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Horizontal => "horizontal",
            LayoutMode::Vertical => "vertical",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLayoutModeError(String);

impl fmt::Display for ParseLayoutModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown layout mode '{}' (expected 'horizontal' or 'vertical')",
            self.0
        )
    }
}

impl std::error::Error for ParseLayoutModeError {}

impl FromStr for LayoutMode {
    type Err = ParseLayoutModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(LayoutMode::Horizontal),
            "vertical" | "v" => Ok(LayoutMode::Vertical),
            _ => Err(ParseLayoutModeError(s.to_string())),
        }
    }
}

/// Pixel dimensions of a container, surface or image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The dimension every image is scaled to match under `mode`.
    pub fn cross_axis(self, mode: LayoutMode) -> u32 {
        match mode {
            LayoutMode::Horizontal => self.height,
            LayoutMode::Vertical => self.width,
        }
    }

    /// The dimension along which images are packed under `mode`.
    pub fn main_axis(self, mode: LayoutMode) -> u32 {
        match mode {
            LayoutMode::Horizontal => self.width,
            LayoutMode::Vertical => self.height,
        }
    }

    /// Build a size from its (cross, main) components under `mode`.
    pub fn from_axes(mode: LayoutMode, cross: u32, main: u32) -> Self {
        match mode {
            LayoutMode::Horizontal => Self::new(main, cross),
            LayoutMode::Vertical => Self::new(cross, main),
        }
    }

    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel count, widened so it never overflows.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSizeError(String);

impl fmt::Display for ParseSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid size '{}' (expected WIDTHxHEIGHT, e.g. 800x600)", self.0)
    }
}

impl std::error::Error for ParseSizeError {}

/// Parses `WIDTHxHEIGHT`, e.g. `800x600`.
impl FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSizeError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width = w.trim().parse().map_err(|_| err())?;
        let height = h.trim().parse().map_err(|_| err())?;
        Ok(Size::new(width, height))
    }
}
