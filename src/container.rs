//! Host container the compositor's surface is bound to, and resize detection.
//!
//! The compositor only ever *reads* the container's client size. Resize
//! detection watches that size and nothing else: the surface the compositor
//! writes to is never observed, so a render growing the surface cannot
//! trigger another render.

use crate::types::Size;
use std::cell::Cell;
use std::rc::Rc;

/// Read-only view of the element hosting the drawing surface.
pub trait Container {
    /// Current client box in pixels.
    fn client_size(&self) -> Size;
}

/// A container that never changes size.
impl Container for Size {
    fn client_size(&self) -> Size {
        *self
    }
}

/// Single-threaded shared container handle.
///
/// The compositor holds one clone for reading; the host keeps another and
/// calls [`set_client_size`](Self::set_client_size) when the layout around the
/// container changes.
#[derive(Debug, Clone, Default)]
pub struct SharedContainer(Rc<Cell<Size>>);

impl SharedContainer {
    pub fn new(size: Size) -> Self {
        Self(Rc::new(Cell::new(size)))
    }

    pub fn set_client_size(&self, size: Size) {
        self.0.set(size);
    }
}

impl Container for SharedContainer {
    fn client_size(&self) -> Size {
        self.0.get()
    }
}

/// Reports genuine container size changes.
///
/// Hosts call [`observe`](Self::observe) whenever they might have resized the
/// container; only a size different from the last observed one counts.
#[derive(Debug, Clone)]
pub struct ResizeObserver {
    last: Size,
}

impl ResizeObserver {
    /// Start observing from the container's current size.
    pub fn new(initial: Size) -> Self {
        Self { last: initial }
    }

    /// Record `size` and report whether it differs from the previous one.
    pub fn observe(&mut self, size: Size) -> bool {
        if size == self.last {
            return false;
        }
        self.last = size;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_size_is_a_container() {
        assert_eq!(Size::new(400, 300).client_size(), Size::new(400, 300));
    }

    #[test]
    fn shared_container_clones_see_updates() {
        let host = SharedContainer::new(Size::new(400, 300));
        let view = host.clone();
        host.set_client_size(Size::new(640, 480));
        assert_eq!(view.client_size(), Size::new(640, 480));
    }

    #[test]
    fn observer_ignores_unchanged_size() {
        let mut observer = ResizeObserver::new(Size::new(400, 300));
        assert!(!observer.observe(Size::new(400, 300)));
        assert!(observer.observe(Size::new(400, 200)));
        assert!(!observer.observe(Size::new(400, 200)));
        assert!(observer.observe(Size::new(400, 300)));
    }
}
