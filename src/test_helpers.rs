//! Shared test utilities for the stitchstrip test suite.
//!
//! Provides solid-colour image builders and on-disk PNG fixtures, so tests
//! can exercise layout and decoding without shipping binary assets.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::images::{ImageSequence, LoadedImage};

// =========================================================================
// Image builders
// =========================================================================

/// A `width`×`height` image filled with one colour.
pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> LoadedImage {
    LoadedImage::new(RgbaImage::from_pixel(width, height, Rgba(color)))
}

/// A sequence of opaque solid images, one per `(width, height)`.
///
/// Colours differ per position so drawn regions can be told apart.
pub fn sequence_of(sizes: &[(u32, u32)]) -> ImageSequence {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| solid_image(w, h, palette(i)))
        .collect()
}

/// Distinct opaque colour for position `i`.
pub fn palette(i: usize) -> [u8; 4] {
    const COLORS: [[u8; 4]; 4] = [
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
        [255, 255, 0, 255],
    ];
    COLORS[i % COLORS.len()]
}

// =========================================================================
// On-disk fixtures
// =========================================================================

/// Write a solid PNG into `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
        .save(&path)
        .unwrap();
    path
}
