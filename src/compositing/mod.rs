//! Image compositing: layout, surfaces and the compositor itself.
//!
//! | Piece | Role |
//! |---|---|
//! | **Geometry** | Pure placement math: proportional scaling and packing |
//! | **Surface** | [`Surface`] trait the compositor draws into |
//! | **Raster** | [`RasterSurface`], an `image::RgbaImage`-backed surface |
//! | **Compositor** | [`Compositor`]: state, render, mode switch, resize replay |

mod compositor;
mod geometry;
mod raster;
pub mod surface;

pub use compositor::{Compositor, CompositorState, DEFAULT_MAX_PIXELS, RenderOutcome};
pub use geometry::{Layout, PixelRect, Placement, compute_layout, scaled_main_extent};
pub use raster::{RasterSurface, ResampleFilter};
pub use surface::Surface;
