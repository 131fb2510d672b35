//! Coordinate transform from small-image space to large-image space.
//!
//! Given a normalized cursor position over the small image, this computes
//! the lens rectangle on the small image and the window into the large
//! image shown by the enlarged viewport.

use serde::{Deserialize, Serialize};

use crate::geometry::{Dimension, NormalizedPosition, Point, Rectangle};
use crate::placement::Placement;

/// Geometry handed to the renderer for one cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanGeometry {
    /// Lens on the small image, in small-image pixels. `None` when the
    /// enlarged view is overlaid on the small image.
    pub lens_rect: Option<Rectangle>,
    /// Top-left of the visible window into the large image, in large-image
    /// pixels. Always within `[0, large - viewport]` per axis.
    pub large_image_offset: Point,
}

impl PanGeometry {
    /// Neutral geometry used while any dimension is unmeasured.
    pub const ZERO: Self = Self {
        lens_rect: None,
        large_image_offset: Point { x: 0.0, y: 0.0 },
    };
}

/// Compute lens and pan offset for a cursor position.
///
/// Any zero-sized input yields [`PanGeometry::ZERO`] with a zero lens in
/// `Beside` placement.
pub fn compute_pan_geometry(
    position: NormalizedPosition,
    small_image: Dimension,
    large_image: Dimension,
    viewport: Dimension,
    placement: Placement,
) -> PanGeometry {
    if small_image.is_empty() || large_image.is_empty() || viewport.is_empty() {
        return match placement {
            Placement::Beside => PanGeometry {
                lens_rect: Some(Rectangle::ZERO),
                ..PanGeometry::ZERO
            },
            Placement::Over => PanGeometry::ZERO,
        };
    }

    let large_image_offset = Point::new(
        pan_offset(position.x(), large_image.width, viewport.width),
        pan_offset(position.y(), large_image.height, viewport.height),
    );

    let lens_rect = match placement {
        Placement::Beside => Some(lens_rect(position, small_image, large_image, viewport)),
        Placement::Over => None,
    };

    PanGeometry {
        lens_rect,
        large_image_offset,
    }
}

/// Window offset along one axis. No panning when the large image fits.
fn pan_offset(position: f32, large: f32, viewport: f32) -> f32 {
    let range = large - viewport;
    if range <= 0.0 {
        return 0.0;
    }
    (position * range).clamp(0.0, range)
}

/// Project the viewport back onto the small image, centered on the cursor
/// and kept inside the small image box.
fn lens_rect(
    position: NormalizedPosition,
    small_image: Dimension,
    large_image: Dimension,
    viewport: Dimension,
) -> Rectangle {
    let width = lens_extent(viewport.width, small_image.width, large_image.width);
    let height = lens_extent(viewport.height, small_image.height, large_image.height);

    let x = lens_origin(position.x(), small_image.width, width);
    let y = lens_origin(position.y(), small_image.height, height);

    Rectangle::new(x, y, width, height)
}

fn lens_extent(viewport: f32, small: f32, large: f32) -> f32 {
    (viewport * (small / large)).min(small)
}

fn lens_origin(position: f32, small: f32, lens: f32) -> f32 {
    let center = position * small;
    (center - lens / 2.0).clamp(0.0, small - lens)
}

/// Distance from the lens's top-left corner to its center, rounded to
/// whole pixels. Zero while any dimension is unmeasured.
pub fn lens_cursor_offset(
    small_image: Dimension,
    large_image: Dimension,
    viewport: Dimension,
) -> Point {
    if small_image.is_empty() || large_image.is_empty() {
        return Point::zero();
    }
    Point::new(
        (lens_extent(viewport.width, small_image.width, large_image.width) / 2.0).round(),
        (lens_extent(viewport.height, small_image.height, large_image.height) / 2.0).round(),
    )
}
