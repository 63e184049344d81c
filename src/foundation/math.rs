//! Scalar helpers for interpolation and angle wrapping (degrees).

/// Linear interpolation; exact at both endpoints.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Equivalent angle in `[0, 360)`.
pub fn normalized_angle(angle: f64) -> f64 {
    let r = angle.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to 360.0
    if r >= 360.0 { 0.0 } else { r }
}

/// Difference `angle1 - angle2` with the smallest magnitude, in `(-180, 180]`.
///
/// - `200, 180 -> 20`
/// - `180, 200 -> -20`
/// - `10, 350 -> 20`
pub fn smallest_angle_diff(angle1: f64, angle2: f64) -> f64 {
    let diff = normalized_angle(angle1 - angle2);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
