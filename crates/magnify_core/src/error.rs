//! Error types for configuration validation.

use thiserror::Error;

/// Errors raised while validating a magnifier configuration.
///
/// All of these are fatal to initialization. Nothing at runtime produces a
/// `ConfigError`: unmeasured layouts degrade to zero dimensions and
/// out-of-sequence pointer events are ignored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A container dimension request could not be interpreted
    #[error("Invalid dimension '{value}': {reason}")]
    InvalidDimension {
        /// The offending request as written by the host
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A fixed-size image is missing its width or height
    #[error("Missing {field} for {image} image")]
    MissingDimension {
        /// Which image ("small" or "large")
        image: &'static str,
        /// Which field ("width" or "height")
        field: &'static str,
    },

    /// A declared image dimension is zero, negative or not finite
    #[error("{image} image {field} must be positive, got {value}")]
    NonPositiveDimension {
        /// Which image ("small" or "large")
        image: &'static str,
        /// Which field ("width" or "height")
        field: &'static str,
        /// The declared value
        value: f32,
    },

    /// An image descriptor has an empty `src`
    #[error("Missing src for {image} image")]
    MissingSource {
        /// Which image ("small" or "large")
        image: &'static str,
    },
}

impl ConfigError {
    /// Create an invalid dimension error.
    pub fn invalid_dimension(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDimension {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
