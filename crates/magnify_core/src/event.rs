//! Raw pointer events as reported by the host's pointer tracker.
//!
//! Coordinates are in pixels relative to the small image's top-left corner.
//! They may lie outside the image box during fast movement.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Pointer events the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Mouse entered the small image box.
    MouseEnter { position: Point },
    /// Mouse moved.
    MouseMove { position: Point },
    /// Mouse left the small image box.
    MouseLeave,
    /// Finger touched down on the small image.
    TouchStart { position: Point },
    /// Finger moved.
    TouchMove { position: Point },
    /// Finger lifted.
    TouchEnd,
    /// Touch interrupted by the platform.
    TouchCancel,
}

impl PointerEvent {
    /// Whether this event belongs to the touch gesture grammar.
    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            PointerEvent::TouchStart { .. }
                | PointerEvent::TouchMove { .. }
                | PointerEvent::TouchEnd
                | PointerEvent::TouchCancel
        )
    }

    /// The reported position, if the event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::MouseEnter { position }
            | PointerEvent::MouseMove { position }
            | PointerEvent::TouchStart { position }
            | PointerEvent::TouchMove { position } => Some(*position),
            PointerEvent::MouseLeave | PointerEvent::TouchEnd | PointerEvent::TouchCancel => None,
        }
    }
}
