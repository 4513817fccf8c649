//! # stitchstrip
//!
//! Stitch several images into one surface, either side by side (every image
//! scaled to a common height) or stacked (every image scaled to a common
//! width), always preserving each image's aspect ratio.
//!
//! # Architecture
//!
//! ```text
//!   ImageSources ──(fresh ImageSequence on load/remove)──▶ Compositor ──▶ Surface
//!                                                            ▲
//!   Container ──(client size; resize observed by Session)────┘
//! ```
//!
//! - The **sources** own the image slots and publish an immutable snapshot of
//!   the loaded images whenever a slot loads or is removed.
//! - The **compositor** turns the latest snapshot plus the active layout mode
//!   into placements and draws them. Mode switches and container resizes
//!   replay the last snapshot from scratch.
//! - The **session** wires the two together and polls the container for size
//!   changes. It only ever watches the container, never the surface the
//!   compositor writes to, so a render cannot trigger itself.
//!
//! Everything is single-threaded and event-driven: each call runs to
//! completion before the next, so there is no locking.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`compositing`] | Placement geometry, the [`Surface`] trait, [`RasterSurface`], the [`Compositor`] |
//! | [`source`] | Image slots, decoding, and change publication |
//! | [`session`] | Sources → compositor wiring and resize polling |
//! | [`container`] | Host container trait, shared handle, resize observer |
//! | [`images`] | [`LoadedImage`] and [`ImageSequence`] |
//! | [`types`] | [`LayoutMode`] and [`Size`] |
//! | [`config`] | `stitchstrip.toml` loading, merging, validation |
//! | [`output`] | CLI output formatting |

pub mod compositing;
pub mod config;
pub mod container;
pub mod images;
pub mod output;
pub mod session;
pub mod source;
pub mod types;

pub use compositing::{Compositor, CompositorState, RasterSurface, RenderOutcome, Surface};
pub use container::{Container, ResizeObserver, SharedContainer};
pub use images::{ImageSequence, LoadedImage};
pub use session::Session;
pub use source::{ImageSources, LoadOutcome, SlotId, SourceError};
pub use types::{LayoutMode, Size};

#[cfg(test)]
pub(crate) mod test_helpers;
