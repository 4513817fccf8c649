//! The compositor: lays out an image sequence on a surface bound to a container.
//!
//! ## State
//!
//! The compositor is in one of two states per layout mode:
//!
//! ```text
//!              render(non-empty)
//!   Empty  ─────────────────────▶  Populated
//!     ▲  ◀─────────────────────      │
//!     │         render([])           │ render(non-empty)
//!     └── render([])                 └──▶ Populated
//! ```
//!
//! [`set_layout_mode`](Compositor::set_layout_mode) and
//! [`on_container_resize`](Compositor::on_container_resize) both replay the
//! last rendered sequence through [`render`](Compositor::render), so every
//! placement is always recomputed from intrinsic sizes. Nothing from a previous
//! pass carries over.
//!
//! ## Surface sizing
//!
//! The cross axis (height when horizontal, width when vertical) is taken from
//! the container's client size before any extent is computed; the main axis is
//! the sum of all scaled extents, known only after every image is placed.
//!
//! No surface larger than [`max_pixels`](Compositor::with_max_pixels) is ever
//! requested. A layout that would need one is reported as
//! [`RenderOutcome::TooLarge`] and leaves the surface blank; its images are
//! still kept, so a later resize or mode switch that brings them under the
//! limit draws them.

use super::geometry::{Layout, compute_layout};
use super::surface::Surface;
use crate::container::Container;
use crate::images::ImageSequence;
use crate::types::{LayoutMode, Size};
use tracing::{debug, trace, warn};

/// Default surface limit: 2^28 pixels, 1 GiB of RGBA.
pub const DEFAULT_MAX_PIXELS: u64 = 1 << 28;

/// Whether the last render drew anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositorState {
    Empty,
    Populated,
}

/// What a render pass did to the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Images were laid out and drawn.
    Drawn(Layout),
    /// The surface was reset to the container size with nothing drawn.
    Cleared,
    /// Nothing needed to change.
    Unchanged,
    /// The layout needs a surface over the pixel limit. Nothing was drawn and
    /// the surface was left blank.
    TooLarge(Layout),
}

pub struct Compositor<C, S> {
    container: C,
    surface: S,
    mode: LayoutMode,
    max_pixels: u64,
    last_rendered: ImageSequence,
}

impl<C: Container, S: Surface> Compositor<C, S> {
    /// Empty, horizontal compositor with the surface sized to the container.
    pub fn new(container: C, surface: S) -> Self {
        Self::with_mode(container, surface, LayoutMode::default())
    }

    pub fn with_mode(container: C, surface: S, mode: LayoutMode) -> Self {
        let mut compositor = Self {
            container,
            surface,
            mode,
            max_pixels: DEFAULT_MAX_PIXELS,
            last_rendered: ImageSequence::empty(),
        };
        let blank = compositor.blank_size();
        compositor.surface.resize(blank);
        compositor
    }

    /// Cap the surface at `max_pixels` pixels.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        if !self.fits(self.surface.size()) {
            let blank = self.blank_size();
            self.surface.resize(blank);
        }
        self
    }

    /// Lay out and draw `images`, replacing whatever was drawn before.
    pub fn render(&mut self, images: ImageSequence) -> RenderOutcome {
        if images.is_empty() {
            return self.clear();
        }

        let cross_axis = self.container.client_size().cross_axis(self.mode);
        let layout = compute_layout(images.intrinsic_sizes(), self.mode, cross_axis);
        let Some(surface_size) = layout.surface_size().filter(|s| self.fits(*s)) else {
            warn!(
                mode = %self.mode,
                images = images.len(),
                main_extent = layout.main_extent,
                cross_axis,
                max_pixels = self.max_pixels,
                "layout exceeds the surface limit; nothing drawn"
            );
            let blank = self.blank_size();
            self.surface.resize(blank);
            self.last_rendered = images;
            return RenderOutcome::TooLarge(layout);
        };
        self.surface.resize(surface_size);

        for placement in &layout.placements {
            trace!(
                index = placement.index,
                x = placement.x,
                y = placement.y,
                width = placement.width,
                height = placement.height,
                "draw"
            );
            self.surface.draw(&images[placement.index], placement);
        }

        if layout.placements.len() < images.len() {
            debug!(
                skipped = images.len() - layout.placements.len(),
                "skipped images with a zero intrinsic dimension"
            );
        }
        debug!(
            mode = %self.mode,
            images = images.len(),
            surface = %surface_size,
            "rendered"
        );

        self.last_rendered = images;
        RenderOutcome::Drawn(layout)
    }

    /// Switch layout mode and relayout the current images from scratch.
    ///
    /// Switching to the active mode does nothing.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) -> RenderOutcome {
        if mode == self.mode {
            return RenderOutcome::Unchanged;
        }
        debug!(from = %self.mode, to = %mode, "layout mode changed");
        self.mode = mode;
        self.render(self.last_rendered.clone())
    }

    /// Relayout the current images against the container's new size.
    pub fn on_container_resize(&mut self) -> RenderOutcome {
        debug!(container = %self.container.client_size(), "container resized");
        self.render(self.last_rendered.clone())
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn state(&self) -> CompositorState {
        if self.last_rendered.is_empty() {
            CompositorState::Empty
        } else {
            CompositorState::Populated
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn last_rendered(&self) -> &ImageSequence {
        &self.last_rendered
    }

    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }

    fn fits(&self, size: Size) -> bool {
        size.area() <= self.max_pixels
    }

    /// Container size when it fits under the limit, otherwise zero.
    fn blank_size(&self) -> Size {
        let client = self.container.client_size();
        if self.fits(client) {
            client
        } else {
            Size::default()
        }
    }

    /// Reset the surface to the container's client size without drawing.
    ///
    /// A no-op when already empty at the container's current size, so repeated
    /// empty renders leave the surface untouched.
    fn clear(&mut self) -> RenderOutcome {
        let blank = self.blank_size();
        let was_populated = !self.last_rendered.is_empty();
        self.last_rendered = ImageSequence::empty();

        if !was_populated && self.surface.size() == blank {
            return RenderOutcome::Unchanged;
        }
        self.surface.resize(blank);
        debug!(surface = %blank, "cleared");
        RenderOutcome::Cleared
    }
}
