//! Enlarged viewport sizing.
//!
//! The host asks for the enlarged container's width and height as an
//! absolute pixel count, a percentage of the small image, or "match the
//! small image". Requests are parsed once at configuration time and then
//! resolved against the latest small-image measurement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::geometry::Dimension;
use crate::placement::Placement;

/// How one axis of the enlarged container should be sized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DimensionRequest", into = "DimensionRequest")]
pub enum ContainerDimension {
    /// Fixed size in pixels
    Pixels(f32),

    /// Percentage of the small image's size on the same axis
    Percent(f32),

    /// Same size as the small image
    MatchSmallImage,
}

impl ContainerDimension {
    /// Resolve against the small image's size on the same axis.
    pub fn resolve(&self, reference: f32) -> f32 {
        match self {
            ContainerDimension::Pixels(px) => *px,
            ContainerDimension::Percent(percent) => (reference * percent / 100.0).round(),
            ContainerDimension::MatchSmallImage => reference,
        }
    }

    /// Build an absolute request, rejecting non-finite or non-positive values.
    pub fn pixels(value: f32) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(ContainerDimension::Pixels(value))
        } else {
            Err(ConfigError::invalid_dimension(
                value.to_string(),
                "absolute size must be a finite positive number",
            ))
        }
    }
}

impl Default for ContainerDimension {
    fn default() -> Self {
        ContainerDimension::Percent(100.0)
    }
}

impl FromStr for ContainerDimension {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(ContainerDimension::MatchSmallImage);
        }
        let Some(number) = trimmed.strip_suffix('%') else {
            return Err(ConfigError::invalid_dimension(
                s,
                "expected a percentage such as \"50%\" or \"auto\"",
            ));
        };
        match number.trim().parse::<f32>() {
            Ok(percent) if percent.is_finite() && percent >= 0.0 => {
                Ok(ContainerDimension::Percent(percent))
            }
            _ => Err(ConfigError::invalid_dimension(
                s,
                "percentage must be a non-negative number",
            )),
        }
    }
}

impl fmt::Display for ContainerDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerDimension::Pixels(px) => write!(f, "{}px", px),
            ContainerDimension::Percent(percent) => write!(f, "{}%", percent),
            ContainerDimension::MatchSmallImage => write!(f, "auto"),
        }
    }
}

/// A container dimension as written by the host: a number, a string or
/// `null` for "match the small image".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionRequest {
    /// Absolute pixels
    Pixels(f64),
    /// Percentage string, e.g. `"50%"`
    Text(String),
    /// Match the small image
    Default,
}

impl TryFrom<DimensionRequest> for ContainerDimension {
    type Error = ConfigError;

    fn try_from(request: DimensionRequest) -> Result<Self> {
        ContainerDimension::try_from(&request)
    }
}

impl TryFrom<&DimensionRequest> for ContainerDimension {
    type Error = ConfigError;

    fn try_from(request: &DimensionRequest) -> Result<Self> {
        match request {
            DimensionRequest::Pixels(px) => ContainerDimension::pixels(*px as f32),
            DimensionRequest::Text(text) => text.parse(),
            DimensionRequest::Default => Ok(ContainerDimension::MatchSmallImage),
        }
    }
}

impl From<ContainerDimension> for DimensionRequest {
    fn from(dimension: ContainerDimension) -> Self {
        match dimension {
            ContainerDimension::Pixels(px) => DimensionRequest::Pixels(f64::from(px)),
            ContainerDimension::Percent(_) => DimensionRequest::Text(dimension.to_string()),
            ContainerDimension::MatchSmallImage => DimensionRequest::Default,
        }
    }
}

/// Resolve a raw host request against a reference size in one step.
///
/// `resolve_container_dimension(&"50%".into(), 800.0)` is `400.0`.
pub fn resolve_container_dimension(request: &DimensionRequest, reference: f32) -> Result<f32> {
    Ok(ContainerDimension::try_from(request)?.resolve(reference))
}

impl From<&str> for DimensionRequest {
    fn from(text: &str) -> Self {
        DimensionRequest::Text(text.to_string())
    }
}

impl From<f64> for DimensionRequest {
    fn from(px: f64) -> Self {
        DimensionRequest::Pixels(px)
    }
}

/// Width and height requests for the enlarged container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerDimensions {
    #[serde(default)]
    pub width: ContainerDimension,
    #[serde(default)]
    pub height: ContainerDimension,
}

impl ContainerDimensions {
    pub fn new(width: ContainerDimension, height: ContainerDimension) -> Self {
        Self { width, height }
    }

    /// Compute the enlarged viewport for the current small image size.
    ///
    /// In `Over` placement the viewport always covers the small image,
    /// whatever was requested.
    pub fn resolve(&self, small_image: Dimension, placement: Placement) -> Dimension {
        if placement == Placement::Over {
            return small_image;
        }
        Dimension::new(
            self.width.resolve(small_image.width),
            self.height.resolve(small_image.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(value: f64) -> DimensionRequest {
        DimensionRequest::Pixels(value)
    }

    #[test]
    fn test_percentage_of_reference() {
        assert_eq!(resolve_container_dimension(&"50%".into(), 800.0), Ok(400.0));
    }

    #[test]
    fn test_percentage_rounds_to_whole_pixels() {
        assert_eq!(resolve_container_dimension(&"33%".into(), 301.0), Ok(99.0));
    }

    #[test]
    fn test_absolute_ignores_reference() {
        assert_eq!(resolve_container_dimension(&px(250.0), 800.0), Ok(250.0));
        assert_eq!(resolve_container_dimension(&px(250.0), 0.0), Ok(250.0));
    }

    #[test]
    fn test_default_matches_reference() {
        let default = DimensionRequest::Default;
        assert_eq!(resolve_container_dimension(&default, 800.0), Ok(800.0));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = resolve_container_dimension(&"abc".into(), 800.0);
        assert!(matches!(result, Err(ConfigError::InvalidDimension { .. })));
        assert!(resolve_container_dimension(&"-5%".into(), 800.0).is_err());
        assert!(resolve_container_dimension(&"250".into(), 800.0).is_err());
    }

    #[test]
    fn test_non_positive_pixels_rejected() {
        let infinite = px(f64::INFINITY);
        assert!(resolve_container_dimension(&px(0.0), 800.0).is_err());
        assert!(resolve_container_dimension(&infinite, 800.0).is_err());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let d: ContainerDimension = "150%".parse().unwrap();
        assert_eq!(d.resolve(200.0), d.resolve(200.0));
        assert_eq!(d.resolve(200.0), 300.0);
    }

    #[test]
    fn test_auto_matches_small_image() {
        let auto: ContainerDimension = "auto".parse().unwrap();
        assert_eq!(auto, ContainerDimension::MatchSmallImage);
        assert_eq!(auto.to_string().parse::<ContainerDimension>(), Ok(auto));
        assert_eq!(resolve_container_dimension(&"auto".into(), 64.0), Ok(64.0));
    }

    #[test]
    fn test_display_parses_back() {
        for text in ["50%", "auto"] {
            let parsed: ContainerDimension = text.parse().unwrap();
            assert_eq!(parsed.to_string(), text);
        }
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let json = r#"{"width": 400, "height": "200%"}"#;
        let dims: ContainerDimensions = serde_json::from_str(json).unwrap();
        assert_eq!(dims.width, ContainerDimension::Pixels(400.0));
        assert_eq!(dims.height, ContainerDimension::Percent(200.0));

        let json = r#"{"width": null, "height": "auto"}"#;
        let dims: ContainerDimensions = serde_json::from_str(json).unwrap();
        assert_eq!(dims.width, ContainerDimension::MatchSmallImage);
        assert_eq!(dims.height, ContainerDimension::MatchSmallImage);

        let bad = serde_json::from_str::<ContainerDimensions>(r#"{"width": "wide"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_over_placement_uses_small_image() {
        let width = ContainerDimension::Pixels(600.0);
        let dims = ContainerDimensions::new(width, "200%".parse().unwrap());
        let small = Dimension::new(300.0, 450.0);
        assert_eq!(dims.resolve(small, Placement::Over), small);

        let beside = dims.resolve(small, Placement::Beside);
        assert_eq!(beside, Dimension::new(600.0, 900.0));
    }
}
