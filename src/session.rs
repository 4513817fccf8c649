//! Wiring between the image slots and the compositor.
//!
//! A [`Session`] registers the compositor as the sole listener of its
//! [`ImageSources`], and watches the compositor's container for size changes.
//! Everything runs on one thread: each call completes its render before the
//! next event is handled, so renders never interleave.

use crate::compositing::{Compositor, RenderOutcome, Surface};
use crate::container::{Container, ResizeObserver};
use crate::images::LoadedImage;
use crate::source::{ImageSources, LoadOutcome, SlotId, SourceError};
use crate::types::LayoutMode;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

pub struct Session<C, S> {
    compositor: Rc<RefCell<Compositor<C, S>>>,
    sources: ImageSources,
    resize: ResizeObserver,
    last_outcome: Rc<RefCell<RenderOutcome>>,
}

impl<C, S> Session<C, S>
where
    C: Container + 'static,
    S: Surface + 'static,
{
    /// Wire `compositor` to a fresh set of `initial_slots` empty slots.
    pub fn new(compositor: Compositor<C, S>, initial_slots: usize) -> Self {
        let resize = ResizeObserver::new(compositor.container().client_size());
        let compositor = Rc::new(RefCell::new(compositor));

        let last_outcome = Rc::new(RefCell::new(RenderOutcome::Unchanged));

        let target = Rc::clone(&compositor);
        let outcome = Rc::clone(&last_outcome);
        let mut sources = ImageSources::new(move |images| {
            let rendered = target.borrow_mut().render(images);
            *outcome.borrow_mut() = rendered;
        });
        for _ in 0..initial_slots {
            sources.add_slot();
        }

        Self {
            compositor,
            sources,
            resize,
            last_outcome,
        }
    }

    pub fn add_slot(&mut self) -> SlotId {
        self.sources.add_slot()
    }

    pub fn remove_slot(&mut self, id: SlotId) -> bool {
        self.sources.remove_slot(id)
    }

    pub fn load(&mut self, id: SlotId, image: LoadedImage) -> Result<LoadOutcome, SourceError> {
        self.sources.load(id, image)
    }

    pub fn load_path(&mut self, id: SlotId, path: &Path) -> Result<LoadOutcome, SourceError> {
        self.sources.load_path(id, path)
    }

    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.sources.slot_ids()
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) -> RenderOutcome {
        let outcome = self.compositor.borrow_mut().set_layout_mode(mode);
        self.record(outcome)
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.compositor.borrow().layout_mode()
    }

    /// Replay the current images if the container changed size since the last
    /// poll. Returns `None` when it did not.
    pub fn poll_resize(&mut self) -> Option<RenderOutcome> {
        let size = self.compositor.borrow().container().client_size();
        if !self.resize.observe(size) {
            return None;
        }
        debug!(container = %size, "container size changed");
        let outcome = self.compositor.borrow_mut().on_container_resize();
        Some(self.record(outcome))
    }

    /// Run `f` with read access to the compositor.
    pub fn with_compositor<R>(&self, f: impl FnOnce(&Compositor<C, S>) -> R) -> R {
        f(&self.compositor.borrow())
    }

    /// What the most recent render did, whether a slot change, a resize or a
    /// mode switch triggered it. `Unchanged` before the first render.
    pub fn last_outcome(&self) -> RenderOutcome {
        self.last_outcome.borrow().clone()
    }

    fn record(&self, outcome: RenderOutcome) -> RenderOutcome {
        *self.last_outcome.borrow_mut() = outcome.clone();
        outcome
    }
}
