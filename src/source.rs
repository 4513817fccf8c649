//! Image slots feeding the compositor.
//!
//! An [`ImageSources`] holds an ordered list of slots, each empty or loaded.
//! Whenever a slot finishes loading or is removed, the sources publish a
//! fresh [`ImageSequence`] of the loaded images, in slot order, to the single
//! listener registered at construction.
//!
//! Filtering out empty slots, rejecting undecodable files and ignoring loads
//! that arrive after their slot was removed all happen here, so the
//! compositor only ever sees images it can lay out.

use crate::images::{ImageSequence, LoadedImage};
use crate::types::Size;
use image::{ImageFormat, ImageReader};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Image has no pixels ({0})")]
    EmptyImage(Size),
    #[error("Slot {0} was never issued")]
    UnknownSlot(SlotId),
}

/// Extensions paired with the decoder that handles them.
const IMAGE_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    IMAGE_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// File extensions with a decoder compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has an extension we can decode.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Read and decode an image file.
///
/// The format is sniffed from the file contents, so a misnamed file still
/// decodes. Images without pixels are rejected.
pub fn decode_file(path: &Path) -> Result<LoadedImage, SourceError> {
    let io_err = |source: std::io::Error| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let decoded = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?
        .decode()
        .map_err(|source| SourceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    let image = LoadedImage::from_dynamic(decoded);
    if image.intrinsic_size().is_degenerate() {
        return Err(SourceError::EmptyImage(image.intrinsic_size()));
    }
    Ok(image)
}

/// Stable handle for one slot. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The slot now holds the image and a new sequence was published.
    Published,
    /// The slot was removed before the load completed; nothing changed.
    Stale,
}

#[derive(Debug)]
enum SlotState {
    Empty,
    Loaded(LoadedImage),
}

#[derive(Debug)]
struct Slot {
    id: SlotId,
    state: SlotState,
}

/// Callback receiving every published sequence.
pub type Listener = Box<dyn FnMut(ImageSequence)>;

pub struct ImageSources {
    slots: Vec<Slot>,
    next_id: u64,
    listener: Listener,
}

impl ImageSources {
    pub fn new(listener: impl FnMut(ImageSequence) + 'static) -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
            listener: Box::new(listener),
        }
    }

    /// Append an empty slot. The loaded sequence is unchanged, so nothing is
    /// published.
    pub fn add_slot(&mut self) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            state: SlotState::Empty,
        });
        debug!(slot = %id, "slot added");
        id
    }

    /// Remove a slot and publish. Returns `false` for unknown ids.
    pub fn remove_slot(&mut self, id: SlotId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.slots.remove(pos);
        debug!(slot = %id, "slot removed");
        self.publish();
        true
    }

    /// Put a decoded image into a slot, replacing any previous one, and
    /// publish.
    pub fn load(&mut self, id: SlotId, image: LoadedImage) -> Result<LoadOutcome, SourceError> {
        self.check_issued(id)?;
        if image.intrinsic_size().is_degenerate() {
            return Err(SourceError::EmptyImage(image.intrinsic_size()));
        }
        let Some(pos) = self.position(id) else {
            debug!(slot = %id, "load for removed slot ignored");
            return Ok(LoadOutcome::Stale);
        };
        debug!(slot = %id, size = %image.intrinsic_size(), "slot loaded");
        self.slots[pos].state = SlotState::Loaded(image);
        self.publish();
        Ok(LoadOutcome::Published)
    }

    /// Decode `path` and load it into a slot.
    ///
    /// On failure the slot keeps whatever it held before.
    pub fn load_path(&mut self, id: SlotId, path: &Path) -> Result<LoadOutcome, SourceError> {
        self.check_issued(id)?;
        if self.position(id).is_none() {
            return Ok(LoadOutcome::Stale);
        }
        let image = decode_file(path)?;
        self.load(id, image)
    }

    /// Snapshot of the loaded images in slot order.
    pub fn loaded_images(&self) -> ImageSequence {
        self.slots
            .iter()
            .filter_map(|slot| match &slot.state {
                SlotState::Loaded(image) => Some(image.clone()),
                SlotState::Empty => None,
            })
            .collect()
    }

    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.slots.iter().map(|s| s.id).collect()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_loaded(&self, id: SlotId) -> bool {
        self.position(id)
            .is_some_and(|pos| matches!(self.slots[pos].state, SlotState::Loaded(_)))
    }

    /// Ids from another `ImageSources` are errors; removed ones are merely stale.
    fn check_issued(&self, id: SlotId) -> Result<(), SourceError> {
        if id.0 >= self.next_id {
            return Err(SourceError::UnknownSlot(id));
        }
        Ok(())
    }

    fn position(&self, id: SlotId) -> Option<usize> {
        self.slots.iter().position(|s| s.id == id)
    }

    fn publish(&mut self) {
        let snapshot = self.loaded_images();
        (self.listener)(snapshot);
    }
}
