//! Layout measurement capability supplied by the host.
//!
//! A fluid small image has no declared size; its rendered box is measured
//! from the host's layout. The widget asks for a measurement at mount and
//! whenever the host reports that the image loaded or the layout changed.

use std::cell::Cell;
use std::rc::Rc;

use magnify_core::Dimension;

/// Host-provided view onto the small image's rendered box.
pub trait LayoutObserver {
    /// Current rendered size of the small image. Zero when not laid out yet.
    fn measure(&self) -> Dimension;

    /// Start delivering layout-change notifications to the widget.
    fn subscribe(&mut self);

    /// Stop delivering layout-change notifications.
    fn unsubscribe(&mut self);
}

/// A layout observer backed by a shared cell.
///
/// Clones share the same size, so the host (or a test) keeps one handle
/// and updates it while the widget holds the other.
#[derive(Debug, Clone, Default)]
pub struct SharedLayout {
    size: Rc<Cell<Dimension>>,
    subscribed: Rc<Cell<bool>>,
}

impl SharedLayout {
    pub fn new(size: Dimension) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
            subscribed: Rc::new(Cell::new(false)),
        }
    }

    /// Update the measured size. The widget only sees it after a
    /// layout-change event.
    pub fn set(&self, size: Dimension) {
        self.size.set(size);
    }

    /// Whether the widget is currently listening.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.get()
    }
}

impl LayoutObserver for SharedLayout {
    fn measure(&self) -> Dimension {
        self.size.get()
    }

    fn subscribe(&mut self) {
        log::trace!("Layout: subscribed");
        self.subscribed.set(true);
    }

    fn unsubscribe(&mut self) {
        log::trace!("Layout: unsubscribed");
        self.subscribed.set(false);
    }
}
