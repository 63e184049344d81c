use crate::foundation::error::{FramecamError, FramecamResult};

pub use kurbo::{Affine, Point, Vec2};

/// On-canvas geometry of one frame: center, extent and authored rotation.
///
/// Angles are in degrees, counter-clockwise as seen when viewing the canvas, and may
/// take any value (no normalization is applied on construction).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameGeometry {
    /// Center x in canvas user units.
    pub center_x: f64,
    /// Center y in canvas user units.
    pub center_y: f64,
    /// Frame width; must be > 0.
    pub width: f64,
    /// Frame height; must be > 0.
    pub height: f64,
    /// Authored rotation in degrees (ccw).
    pub angle: f64,
}

impl FrameGeometry {
    /// Geometry from a center point, extent and angle in degrees.
    pub fn new(center: Point, width: f64, height: f64, angle: f64) -> Self {
        Self {
            center_x: center.x,
            center_y: center.y,
            width,
            height,
            angle,
        }
    }

    /// Derive a frame's geometry from the first three corners of its outline.
    ///
    /// `p1 -> p2` runs along the frame's top edge and `p2 -> p3` along its right
    /// edge, so `p1` and `p3` are diagonally opposite.
    pub fn from_reference_points(id: &str, points: [Point; 3]) -> FramecamResult<Self> {
        let [p1, p2, p3] = points;
        let width = p1.distance(p2);
        let height = p3.distance(p2);
        let geometry = Self {
            center_x: p1.x / 2.0 + p3.x / 2.0,
            center_y: p1.y / 2.0 + p3.y / 2.0,
            width,
            height,
            angle: -(p2.y - p1.y).atan2(p2.x - p1.x).to_degrees(),
        };
        geometry.validate(id)?;
        Ok(geometry)
    }

    /// Center point.
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Rotation that cancels the frame's own rotation so it appears upright.
    pub fn align_angle(&self) -> f64 {
        -self.angle
    }

    /// Reject non-finite values and non-positive extents for frame `id`.
    pub fn validate(&self, id: &str) -> FramecamResult<()> {
        let finite = [
            self.center_x,
            self.center_y,
            self.width,
            self.height,
            self.angle,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(FramecamError::degenerate_geometry(id));
        }
        Ok(())
    }
}

/// Viewport dimensions in pixels, queried from the renderer on every transform.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ViewportSize {
    /// Viewport of `width` x `height` pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center point, as an offset from the top-left corner.
    pub fn center(self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
