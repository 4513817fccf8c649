//! Drawing surface trait.
//!
//! The [`Surface`] trait is the compositor's only output: a pixel buffer it
//! sizes and draws into. It mirrors a browser canvas closely enough that the
//! compositor logic does not care what backs it.
//!
//! The production implementation is
//! [`RasterSurface`](super::raster::RasterSurface), an in-memory RGBA buffer.

use super::geometry::Placement;
use crate::images::LoadedImage;
use crate::types::Size;

/// Pixel buffer owned exclusively by one compositor.
pub trait Surface {
    /// Current pixel dimensions.
    fn size(&self) -> Size;

    /// Set the pixel dimensions. Like assigning a canvas dimension, this
    /// always discards the current contents, even when the size is unchanged.
    fn resize(&mut self, size: Size);

    /// Draw `image` scaled into `placement`.
    fn draw(&mut self, image: &LoadedImage, placement: &Placement);
}
