//! In-memory RGBA surface backed by the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Pixel buffer | `image::RgbaImage` |
//! | Clear | `RgbaImage::from_pixel` with the background colour |
//! | Scale into placement | `image::imageops::resize` with the configured filter |
//! | Composite | `image::imageops::overlay` (source-over, clipped to bounds) |
//!
//! The buffer is allocated eagerly at `width * height * 4` bytes. The
//! compositor keeps requested sizes under its pixel limit, so callers that
//! resize directly must do the same.

use super::geometry::Placement;
use super::surface::Surface;
use crate::images::LoadedImage;
use crate::types::Size;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Resampling filter used when scaling images into their placements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Surface that rasterises into an owned `RgbaImage`.
pub struct RasterSurface {
    buffer: RgbaImage,
    background: Rgba<u8>,
    filter: FilterType,
}

impl RasterSurface {
    /// Transparent surface using triangle (bilinear) resampling.
    pub fn new(size: Size) -> Self {
        Self::with_style(size, [0, 0, 0, 0], ResampleFilter::default())
    }

    pub fn with_style(size: Size, background: [u8; 4], filter: ResampleFilter) -> Self {
        let background = Rgba(background);
        Self {
            buffer: RgbaImage::from_pixel(size.width, size.height, background),
            background,
            filter: filter.into(),
        }
    }

    /// The composited pixels.
    pub fn pixels(&self) -> &RgbaImage {
        &self.buffer
    }

}

impl Surface for RasterSurface {
    fn size(&self) -> Size {
        Size::new(self.buffer.width(), self.buffer.height())
    }

    fn resize(&mut self, size: Size) {
        self.buffer = RgbaImage::from_pixel(size.width, size.height, self.background);
    }

    fn draw(&mut self, image: &LoadedImage, placement: &Placement) {
        let rect = placement.pixel_rect();
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let (x, y) = (i64::from(rect.x), i64::from(rect.y));
        if image.width() == rect.width && image.height() == rect.height {
            imageops::overlay(&mut self.buffer, image.pixels(), x, y);
        } else {
            let scaled = imageops::resize(image.pixels(), rect.width, rect.height, self.filter);
            imageops::overlay(&mut self.buffer, &scaled, x, y);
        }
    }
}
