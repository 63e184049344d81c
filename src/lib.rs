//! Framecam drives camera-path presentations over a single SVG canvas.
//!
//! A presentation is an authored path of frame ids. Each frame is a region of the
//! canvas; moving along the path pans, zooms and rotates a virtual camera from one
//! region to the next. The crate is organized around:
//!
//! - [`SvgCanvas`] and [`GeometryStore`]: frame geometry extraction and caching
//! - [`compute_transform`]: the pure camera transform between two frames
//! - [`PathMotion`]: constant-speed movement toward a destination position
//! - [`Presentation`]: startup join, navigation, render loop and peer synchronization
//! - [`SvgRasterizer`]: a CPU renderer for headless output
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod animation;
pub(crate) mod content;
mod foundation;
pub(crate) mod geometry;
pub(crate) mod presentation;
pub(crate) mod sync;
pub(crate) mod transform;

/// Presentation documents.
pub mod config;
/// Offscreen rendering.
pub mod render;

pub use crate::animation::clock::{Clock, ManualClock, SystemClock, TickFlag, TickScheduler};
pub use crate::animation::motion::{AnimationSpeed, MIN_ANIMATION_SPEED, MotionPhase, PathMotion};
pub use crate::config::PresentationConfig;
pub use crate::content::overlay::{MediaOverlay, OverlayConfig, OverlayMode, OverlayState};
pub use crate::content::texts::{
    CaptionBlend, DirTextSource, FrameTexts, StaticTextSource, TextSource, caption_blend,
    load_texts, not_loaded_message,
};
pub use crate::foundation::barrier::JoinBarrier;
pub use crate::foundation::core::{Affine, FrameGeometry, Point, Vec2, ViewportSize};
pub use crate::foundation::error::{FramecamError, FramecamResult};
pub use crate::foundation::math::{lerp, normalized_angle, smallest_angle_diff};
pub use crate::geometry::store::{GeometryProvider, GeometryStore, PresetGeometries};
pub use crate::geometry::svg::SvgCanvas;
pub use crate::presentation::controller::{Presentation, PresentationSettings};
pub use crate::presentation::hooks::{
    ErrorSink, Hooks, LogErrors, NoObserver, NoOverlay, OverlayProvider, PositionObserver,
    Renderer,
};
pub use crate::presentation::path::{FramePath, Segment};
pub use crate::render::raster::{FrameRgba, SvgRasterizer};
pub use crate::sync::peer::{PeerHandle, PollPolicy, SyncAction, SyncPeer, SyncPoll, Synchronizer};
pub use crate::transform::camera::{
    CameraTransform, blended_align_angle, compute_transform, frame_on_screen_size, scale_factor,
};
