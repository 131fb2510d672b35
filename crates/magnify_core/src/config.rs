//! Magnifier configuration.
//!
//! [`MagnifyConfig`] mirrors what the host writes (camelCase keys, optional
//! fields). Defaults are filled in by serde and then everything is checked
//! once by [`MagnifyConfig::validate`], which produces the
//! [`ValidatedConfig`] the widget runs on.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::activation::ActivationTimings;
use crate::constants::{
    DEFAULT_FADE_DURATION_MS, DEFAULT_HINT_TEXT_MOUSE, DEFAULT_HINT_TEXT_TOUCH,
    DEFAULT_HOVER_DELAY_MS, DEFAULT_HOVER_OFF_DELAY_MS, DEFAULT_PRESS_DURATION_MS,
    DEFAULT_PRESS_MOVE_THRESHOLD,
};
use crate::dimension::{ContainerDimension, ContainerDimensions};
use crate::error::{ConfigError, Result};
use crate::geometry::Dimension;
use crate::hint::HintConfig;
use crate::image::{ImageDescriptor, ImageSize};
use crate::placement::Placement;

/// Host-supplied magnifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagnifyConfig {
    /// Preview image, always visible
    pub small_image: ImageDescriptor,

    /// High-resolution image; width and height are required
    pub large_image: ImageDescriptor,

    /// Size of the enlarged viewport when placed beside the image
    #[serde(default)]
    pub enlarged_image_container_dimensions: ContainerDimensions,

    /// Force a placement instead of deriving it from the modality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enlarged_image_position: Option<Placement>,

    #[serde(default = "default_hover_delay")]
    pub hover_delay_in_ms: u64,

    #[serde(default = "default_hover_off_delay")]
    pub hover_off_delay_in_ms: u64,

    #[serde(default = "default_press_duration")]
    pub press_duration: u64,

    #[serde(default = "default_press_move_threshold")]
    pub press_move_threshold: f32,

    /// Activate on touch start instead of waiting for a long press
    #[serde(default)]
    pub is_activated_on_touch: bool,

    /// Passed through to the renderer
    #[serde(default = "default_fade_duration")]
    pub fade_duration_in_ms: u64,

    #[serde(default)]
    pub is_hint_enabled: bool,

    #[serde(default = "default_true")]
    pub should_hide_hint_after_first_activation: bool,

    #[serde(default = "default_hint_text_mouse")]
    pub hint_text_mouse: String,

    #[serde(default = "default_hint_text_touch")]
    pub hint_text_touch: String,
}

fn default_hover_delay() -> u64 {
    DEFAULT_HOVER_DELAY_MS
}

fn default_hover_off_delay() -> u64 {
    DEFAULT_HOVER_OFF_DELAY_MS
}

fn default_press_duration() -> u64 {
    DEFAULT_PRESS_DURATION_MS
}

fn default_press_move_threshold() -> f32 {
    DEFAULT_PRESS_MOVE_THRESHOLD
}

fn default_fade_duration() -> u64 {
    DEFAULT_FADE_DURATION_MS
}

fn default_true() -> bool {
    true
}

fn default_hint_text_mouse() -> String {
    DEFAULT_HINT_TEXT_MOUSE.to_string()
}

fn default_hint_text_touch() -> String {
    DEFAULT_HINT_TEXT_TOUCH.to_string()
}

impl MagnifyConfig {
    /// Create a configuration with every optional setting at its default.
    pub fn new(small_image: ImageDescriptor, large_image: ImageDescriptor) -> Self {
        Self {
            small_image,
            large_image,
            enlarged_image_container_dimensions: ContainerDimensions::default(),
            enlarged_image_position: None,
            hover_delay_in_ms: default_hover_delay(),
            hover_off_delay_in_ms: default_hover_off_delay(),
            press_duration: default_press_duration(),
            press_move_threshold: default_press_move_threshold(),
            is_activated_on_touch: false,
            fade_duration_in_ms: default_fade_duration(),
            is_hint_enabled: false,
            should_hide_hint_after_first_activation: true,
            hint_text_mouse: default_hint_text_mouse(),
            hint_text_touch: default_hint_text_touch(),
        }
    }

    /// Check everything and resolve defaults into runtime types.
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let small_image = self.small_image.validate("small")?;
        let large_image = self.large_image.validate_fixed("large")?;

        let container = self.enlarged_image_container_dimensions;
        check_container(container.width)?;
        check_container(container.height)?;

        if !(self.press_move_threshold.is_finite() && self.press_move_threshold >= 0.0) {
            return Err(ConfigError::invalid_dimension(
                self.press_move_threshold.to_string(),
                "press move threshold must be a non-negative number",
            ));
        }

        Ok(ValidatedConfig {
            small_image,
            large_image,
            container,
            placement_override: self.enlarged_image_position,
            timings: ActivationTimings {
                hover_delay: Duration::from_millis(self.hover_delay_in_ms),
                hover_off_delay: Duration::from_millis(self.hover_off_delay_in_ms),
                press_duration: Duration::from_millis(self.press_duration),
                press_move_threshold: self.press_move_threshold,
                activate_on_touch: self.is_activated_on_touch,
            },
            fade_duration: Duration::from_millis(self.fade_duration_in_ms),
            hint: HintConfig {
                enabled: self.is_hint_enabled,
                hide_after_first_activation: self.should_hide_hint_after_first_activation,
                text_mouse: self.hint_text_mouse.clone(),
                text_touch: self.hint_text_touch.clone(),
            },
        })
    }
}

fn check_container(dimension: ContainerDimension) -> Result<()> {
    match dimension {
        ContainerDimension::Pixels(px) => ContainerDimension::pixels(px).map(|_| ()),
        ContainerDimension::Percent(percent) if !(percent.is_finite() && percent >= 0.0) => {
            let reason = "percentage must be a non-negative number";
            let value = dimension.to_string();
            Err(ConfigError::invalid_dimension(value, reason))
        }
        ContainerDimension::Percent(_) | ContainerDimension::MatchSmallImage => Ok(()),
    }
}

/// Configuration after validation, with defaults resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub small_image: ImageSize,
    pub large_image: Dimension,
    pub container: ContainerDimensions,
    pub placement_override: Option<Placement>,
    pub timings: ActivationTimings,
    pub fade_duration: Duration,
    pub hint: HintConfig,
}

impl ValidatedConfig {
    /// Whether the small image is measured from layout.
    pub fn is_fluid(&self) -> bool {
        self.small_image == ImageSize::Fluid
    }
}
