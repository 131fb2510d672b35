//! "Hover to zoom" hint visibility.
//!
//! The hint is shown until magnification is first activated. Depending on
//! configuration it either stays hidden from then on or comes back whenever
//! magnification ends.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HINT_TEXT_MOUSE, DEFAULT_HINT_TEXT_TOUCH};
use crate::modality::InputModality;

/// Hint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintConfig {
    pub enabled: bool,
    pub hide_after_first_activation: bool,
    pub text_mouse: String,
    pub text_touch: String,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            hide_after_first_activation: true,
            text_mouse: DEFAULT_HINT_TEXT_MOUSE.to_string(),
            text_touch: DEFAULT_HINT_TEXT_TOUCH.to_string(),
        }
    }
}

impl HintConfig {
    /// Text for the given modality.
    pub fn text(&self, modality: InputModality) -> &str {
        match modality {
            InputModality::Mouse => &self.text_mouse,
            InputModality::Touch => &self.text_touch,
        }
    }
}

/// What the renderer should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub visible: bool,
    pub text: String,
}

/// Remembers whether magnification has ever been active.
#[derive(Debug, Clone, Copy, Default)]
pub struct HintState {
    has_been_active: bool,
}

impl HintState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current activation.
    pub fn observe(&mut self, is_active: bool) {
        self.has_been_active |= is_active;
    }

    /// Whether the hint is visible right now.
    pub fn is_visible(&self, config: &HintConfig, is_active: bool) -> bool {
        if !config.enabled || is_active {
            return false;
        }
        !(config.hide_after_first_activation && self.has_been_active)
    }

    /// Build the renderer-facing hint.
    pub fn hint(&self, config: &HintConfig, is_active: bool, modality: InputModality) -> Hint {
        Hint {
            visible: self.is_visible(config, is_active),
            text: config.text(modality).to_string(),
        }
    }
}
