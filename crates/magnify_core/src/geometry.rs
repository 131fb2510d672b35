//! Basic 2D geometry types shared by the engine.

use serde::{Deserialize, Serialize};

/// A resolved 2D size in pixels.
///
/// Components are never negative. A zero component means the size is not
/// measurable yet (e.g. a fluid image before its first layout pass).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f32,
    pub height: f32,
}

impl Dimension {
    /// Zero size constant.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a dimension, clamping invalid components to zero.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// True when either component is zero.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// A 2D point in pixels, relative to the small image's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Cursor location as a fraction of the small image's rendered box.
///
/// Both components are always within `[0, 1]`, deserialization included.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawPosition")]
pub struct NormalizedPosition {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct RawPosition {
    x: f32,
    y: f32,
}

impl From<RawPosition> for NormalizedPosition {
    fn from(raw: RawPosition) -> Self {
        NormalizedPosition::new(raw.x, raw.y)
    }
}

impl NormalizedPosition {
    /// Top-left corner of the box.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a position, clamping each component into `[0, 1]`.
    ///
    /// NaN components collapse to 0.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    /// Normalize a point in small-image pixels against the box size.
    ///
    /// An unmeasured box yields [`NormalizedPosition::ORIGIN`].
    pub fn from_point(point: Point, size: Dimension) -> Self {
        if size.is_empty() {
            return Self::ORIGIN;
        }
        Self::new(point.x / size.width, point.y / size.height)
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
