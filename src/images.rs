//! Decoded images and the immutable snapshots handed to the compositor.

use crate::types::Size;
use image::{DynamicImage, RgbaImage};
use std::ops::Deref;
use std::sync::Arc;

/// One successfully decoded image.
///
/// Pixels live behind an `Arc`: cloning a `LoadedImage` hands out another
/// view of the same decoded data, never a copy.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pixels: Arc<RgbaImage>,
}

impl LoadedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::new(image.into_rgba8())
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Natural pixel dimensions.
    pub fn intrinsic_size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether two handles view the same decoded pixels.
    pub fn same_pixels(&self, other: &LoadedImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

/// Ordered snapshot of loaded images, in draw order.
///
/// A sequence is never mutated after construction; the image source builds a
/// fresh one on every change and the compositor keeps whichever it last drew.
#[derive(Debug, Clone, Default)]
pub struct ImageSequence(Arc<[LoadedImage]>);

impl ImageSequence {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn intrinsic_sizes(&self) -> impl Iterator<Item = Size> + '_ {
        self.0.iter().map(LoadedImage::intrinsic_size)
    }
}

impl Deref for ImageSequence {
    type Target = [LoadedImage];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<LoadedImage>> for ImageSequence {
    fn from(images: Vec<LoadedImage>) -> Self {
        Self(images.into())
    }
}

impl FromIterator<LoadedImage> for ImageSequence {
    fn from_iter<T: IntoIterator<Item = LoadedImage>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
