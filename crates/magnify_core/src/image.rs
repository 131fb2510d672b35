//! Image descriptors supplied by the host.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::geometry::Dimension;

/// Describes one of the two images.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    /// Image source, opaque to the engine
    pub src: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_set: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,

    /// Declared width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,

    /// Declared height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,

    /// Size comes from measured layout instead of `width`/`height`
    #[serde(default)]
    pub is_fluid_width: bool,
}

impl ImageDescriptor {
    /// Create a fixed-size descriptor.
    pub fn fixed(src: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            src: src.into(),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Create a fluid-width descriptor.
    pub fn fluid(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            is_fluid_width: true,
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Validate a source and, unless fluid, its declared size.
    pub(crate) fn validate(&self, image: &'static str) -> Result<ImageSize> {
        if self.is_fluid_width {
            self.check_source(image)?;
            return Ok(ImageSize::Fluid);
        }
        self.validate_fixed(image).map(ImageSize::Fixed)
    }

    /// Validate an image whose size must always be declared.
    pub(crate) fn validate_fixed(&self, image: &'static str) -> Result<Dimension> {
        self.check_source(image)?;
        let width = declared(self.width, image, "width")?;
        let height = declared(self.height, image, "height")?;
        Ok(Dimension::new(width, height))
    }

    fn check_source(&self, image: &'static str) -> Result<()> {
        if self.src.trim().is_empty() {
            return Err(ConfigError::MissingSource { image });
        }
        Ok(())
    }
}

fn declared(value: Option<f32>, image: &'static str, field: &'static str) -> Result<f32> {
    let value = value.ok_or(ConfigError::MissingDimension { image, field })?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveDimension {
            image,
            field,
            value,
        })
    }
}

/// How an image's size is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageSize {
    /// Declared up front
    Fixed(Dimension),
    /// Measured from layout at runtime
    Fluid,
}
