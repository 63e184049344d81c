//! Camera transform for a position between two frames.

use crate::foundation::{
    core::{Affine, FrameGeometry, Vec2, ViewportSize},
    math::{lerp, smallest_angle_diff},
};

/// Decomposed camera transform mapping canvas coordinates to viewport pixels.
///
/// Applied right to left: translate the blended frame center to the origin, rotate,
/// scale, then translate the origin to the viewport center. Rotation therefore pivots
/// around the interpolated center.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraTransform {
    /// Viewport center in pixels.
    pub viewport_center: Vec2,
    /// Uniform scale factor.
    pub scale: f64,
    /// Clockwise on-screen rotation in degrees.
    pub rotation_deg: f64,
    /// Negated blended frame center.
    pub origin: Vec2,
}

impl CameraTransform {
    /// Transform that shows `geometry` alone, upright and fitted to the viewport.
    pub fn at_frame(geometry: &FrameGeometry, viewport: ViewportSize) -> Self {
        compute_transform(geometry, geometry, 0.0, viewport)
    }

    /// Canvas-to-screen affine: translate to the origin, rotate, scale, then center.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.viewport_center)
            * Affine::scale(self.scale)
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::translate(self.origin)
    }
}

/// Largest scale that fits the frame inside the viewport without clipping.
pub fn scale_factor(geometry: &FrameGeometry, viewport: ViewportSize) -> f64 {
    let sx = viewport.width / geometry.width;
    let sy = viewport.height / geometry.height;
    sx.min(sy)
}

/// Size in pixels of a frame when shown fitted to the viewport.
pub fn frame_on_screen_size(geometry: &FrameGeometry, viewport: ViewportSize) -> ViewportSize {
    let factor = scale_factor(geometry, viewport);
    ViewportSize::new(geometry.width * factor, geometry.height * factor)
}

/// Rotation (ccw, degrees) interpolated between two frames' align angles the short way.
pub fn blended_align_angle(a: &FrameGeometry, b: &FrameGeometry, fraction: f64) -> f64 {
    let from = a.align_angle();
    from + smallest_angle_diff(b.align_angle(), from) * fraction
}

/// Camera transform at blend `fraction` between frame `a` (0) and frame `b` (1).
///
/// Pure: the same inputs always produce the same transform. `fraction` is clamped to
/// `[0, 1]`.
pub fn compute_transform(
    a: &FrameGeometry,
    b: &FrameGeometry,
    fraction: f64,
    viewport: ViewportSize,
) -> CameraTransform {
    let t = fraction.clamp(0.0, 1.0);

    let origin = Vec2::new(
        lerp(-a.center_x, -b.center_x, t),
        lerp(-a.center_y, -b.center_y, t),
    );
    let scale = lerp(scale_factor(a, viewport), scale_factor(b, viewport), t);

    CameraTransform {
        viewport_center: viewport.center(),
        scale,
        // negated: ccw authoring convention -> cw on screen
        rotation_deg: -blended_align_angle(a, b, t),
        origin,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/camera.rs"]
mod tests;
