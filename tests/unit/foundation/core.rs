use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn axis_aligned_outline_has_zero_angle() {
    let g = FrameGeometry::from_reference_points(
        "f",
        [
            Point::new(10.0, 20.0),
            Point::new(50.0, 20.0),
            Point::new(50.0, 40.0),
        ],
    )
    .unwrap();
    assert!(close(g.center_x, 30.0));
    assert!(close(g.center_y, 30.0));
    assert!(close(g.width, 40.0));
    assert!(close(g.height, 20.0));
    assert!(close(g.angle, 0.0));
}

#[test]
fn outline_rising_to_the_right_is_counter_clockwise() {
    // y grows downwards on the canvas, so a top edge pointing up-right is a ccw turn.
    let g = FrameGeometry::from_reference_points(
        "f",
        [
            Point::new(0.0, 0.0),
            Point::new(10.0, -10.0),
            Point::new(20.0, 0.0),
        ],
    )
    .unwrap();
    assert!(close(g.angle, 45.0));
    assert!(close(g.align_angle(), -45.0));
    assert!(close(g.width, 200f64.sqrt()));
}

#[test]
fn collapsed_outline_is_degenerate() {
    let err = FrameGeometry::from_reference_points(
        "flat",
        [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, FramecamError::DegenerateGeometry(id) if id == "flat"));
}

#[test]
fn validate_rejects_non_finite_values() {
    let mut g = FrameGeometry::new(Point::new(0.0, 0.0), 10.0, 10.0, 0.0);
    assert!(g.validate("g").is_ok());
    g.angle = f64::NAN;
    assert!(g.validate("g").is_err());
}

#[test]
fn viewport_center_is_half_extent() {
    assert_eq!(
        ViewportSize::new(800.0, 600.0).center(),
        Vec2::new(400.0, 300.0)
    );
}
