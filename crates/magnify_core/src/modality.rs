//! Input modality detection.
//!
//! The initial modality comes from a one-time platform capability query.
//! After that the last qualifying event wins: a touch start switches to
//! touch, a mouse enter switches back to mouse. There is no hysteresis.

use serde::{Deserialize, Serialize};

use crate::event::PointerEvent;

/// Primary pointer input class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputModality {
    /// Hover-capable pointer
    #[default]
    Mouse,
    /// Coarse pointer without hover
    Touch,
}

impl InputModality {
    /// Get the display name for this modality.
    pub fn name(&self) -> &'static str {
        match self {
            InputModality::Mouse => "mouse",
            InputModality::Touch => "touch",
        }
    }
}

/// What the platform reports about its primary pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerCapability {
    /// The primary pointer can hover
    pub can_hover: bool,
    /// The primary pointer is coarse (a finger)
    pub is_coarse: bool,
}

impl PointerCapability {
    /// A typical desktop mouse.
    pub fn mouse() -> Self {
        Self {
            can_hover: true,
            is_coarse: false,
        }
    }

    /// A typical touch screen.
    pub fn touch() -> Self {
        Self {
            can_hover: false,
            is_coarse: true,
        }
    }

    /// Map the capability onto a modality. Anything that cannot hover is
    /// treated as touch.
    pub fn primary_modality(&self) -> InputModality {
        if self.is_coarse || !self.can_hover {
            InputModality::Touch
        } else {
            InputModality::Mouse
        }
    }
}

/// Tracks the current primary input modality.
#[derive(Debug, Clone)]
pub struct ModalityDetector {
    current: InputModality,
}

impl ModalityDetector {
    /// Create a detector seeded from the platform capability query.
    pub fn new(capability: PointerCapability) -> Self {
        let current = capability.primary_modality();
        log::debug!("Modality: initial {} from {:?}", current.name(), capability);
        Self { current }
    }

    /// Current modality.
    pub fn current(&self) -> InputModality {
        self.current
    }

    /// Observe a pointer event. Returns the new modality if it changed.
    pub fn observe(&mut self, event: &PointerEvent) -> Option<InputModality> {
        let detected = match event {
            PointerEvent::TouchStart { .. } => InputModality::Touch,
            PointerEvent::MouseEnter { .. } => InputModality::Mouse,
            _ => return None,
        };
        if detected == self.current {
            return None;
        }
        log::debug!("Modality: {} -> {}", self.current.name(), detected.name());
        self.current = detected;
        Some(detected)
    }
}
