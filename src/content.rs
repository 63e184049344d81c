//! Per-frame content around the camera: captions and media overlays.

pub mod overlay;
pub mod texts;
