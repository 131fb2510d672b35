//! Default values for every configurable knob.

// =============================================================================
// Mouse grammar
// =============================================================================

/// Hover time before magnification turns on
pub const DEFAULT_HOVER_DELAY_MS: u64 = 250;

/// Grace period after the mouse leaves before magnification turns off
pub const DEFAULT_HOVER_OFF_DELAY_MS: u64 = 150;

// =============================================================================
// Touch grammar
// =============================================================================

/// Hold time before a touch counts as a long press
pub const DEFAULT_PRESS_DURATION_MS: u64 = 500;

/// Movement in pixels that cancels a long press
pub const DEFAULT_PRESS_MOVE_THRESHOLD: f32 = 5.0;

// =============================================================================
// Presentation (passed through untouched)
// =============================================================================

pub const DEFAULT_FADE_DURATION_MS: u64 = 300;

pub const DEFAULT_HINT_TEXT_MOUSE: &str = "Hover to Zoom";

pub const DEFAULT_HINT_TEXT_TOUCH: &str = "Long-Touch to Zoom";
