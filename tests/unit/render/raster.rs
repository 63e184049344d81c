use super::*;
use crate::{foundation::core::FrameGeometry, geometry::store::GeometryProvider};

// Frame `a` is a stroked outline around a red square; `mark` is not a frame.
const CANVAS: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
  <rect x="0" y="0" width="200" height="100" fill="#0000ff"/>
  <rect x="10" y="10" width="40" height="40" fill="#ff0000"/>
  <polygon id="a" points="10,10 50,10 50,50 10,50" fill="none" stroke="#000000" stroke-width="4"/>
  <rect id="mark" x="58" y="26" width="8" height="8" fill="#000000"/>
</svg>"##;

fn canvas() -> SvgCanvas {
    SvgCanvas::from_data(CANVAS.as_bytes()).unwrap()
}

fn path() -> FramePath {
    FramePath::new(vec!["a".to_string()]).unwrap()
}

fn frame_a(canvas: &SvgCanvas) -> FrameGeometry {
    canvas.frame_geometry("a").unwrap().unwrap()
}

fn pixel(frame: &FrameRgba, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn frame_is_centered_and_fitted() {
    let canvas = canvas();
    let mut r = SvgRasterizer::new(&canvas, &path(), 80, 40, [0, 255, 0, 255]).unwrap();
    let t = CameraTransform::at_frame(&frame_a(&canvas), r.viewport_size());
    r.apply_transform(&t);

    let frame = r.frame();
    assert_eq!((frame.width, frame.height), (80, 40));
    assert_eq!(pixel(&frame, 40, 20), [255, 0, 0, 255]);
    // left of the canvas edge
    assert_eq!(pixel(&frame, 2, 20), [0, 255, 0, 255]);
    // right of the frame, still on the canvas
    assert_eq!(pixel(&frame, 64, 20), [0, 0, 255, 255]);
    assert_eq!(r.last_transform(), Some(&t));
    assert_eq!(r.frames_drawn(), 1);
}

#[test]
fn empty_viewport_is_rejected() {
    let canvas = canvas();
    assert!(SvgRasterizer::new(&canvas, &path(), 0, 10, [0, 0, 0, 255]).is_err());
    let mut r = SvgRasterizer::new(&canvas, &path(), 10, 10, [0, 0, 0, 255]).unwrap();
    assert!(r.resize(10, 0).is_err());
    r.resize(30, 20).unwrap();
    assert_eq!(r.viewport_size(), ViewportSize::new(30.0, 20.0));
}

#[test]
fn save_png_writes_a_readable_image() {
    let canvas = canvas();
    let mut r = SvgRasterizer::new(&canvas, &path(), 16, 8, [0, 0, 0, 255]).unwrap();
    r.apply_transform(&CameraTransform::at_frame(&frame_a(&canvas), r.viewport_size()));

    let dir = std::env::temp_dir().join(format!("framecam_raster_{}", std::process::id()));
    let out = dir.join("nested").join("frame.png");
    r.save_png(&out).unwrap();
    let img = image::open(&out).unwrap();
    assert_eq!((img.width(), img.height()), (16, 8));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn frame_outlines_on_the_path_are_hidden() {
    let canvas = canvas();
    let mut r = SvgRasterizer::new(&canvas, &path(), 80, 40, [0, 255, 0, 255]).unwrap();
    r.apply_transform(&CameraTransform::at_frame(&frame_a(&canvas), r.viewport_size()));
    let frame = r.frame();

    // on the outline's left and right edges
    assert_eq!(pixel(&frame, 20, 20), [255, 0, 0, 255]);
    assert_eq!(pixel(&frame, 59, 20), [255, 0, 0, 255]);
    // non-frame elements still draw
    assert_eq!(pixel(&frame, 72, 20), [0, 0, 0, 255]);

    // geometry still comes from the unhidden canvas
    assert!(canvas.frame_geometry("a").unwrap().is_some());

    // with no frames hidden the outline shows
    let other = FramePath::new(vec!["mark".to_string()]).unwrap();
    let mut r = SvgRasterizer::new(&canvas, &other, 80, 40, [0, 255, 0, 255]).unwrap();
    r.apply_transform(&CameraTransform::at_frame(&frame_a(&canvas), r.viewport_size()));
    assert_eq!(pixel(&r.frame(), 20, 20), [0, 0, 0, 255]);
}
