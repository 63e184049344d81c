//! Collaborators a presentation drives: renderer, overlay, observers, error reporting.

use std::{cell::RefCell, rc::Rc};

use crate::{
    animation::clock::{TickFlag, TickScheduler},
    content::texts::CaptionBlend,
    foundation::core::ViewportSize,
    transform::camera::CameraTransform,
};

/// Draws the canvas through a camera transform.
pub trait Renderer {
    /// Current viewport size in pixels. Queried on every transform computation.
    fn viewport_size(&self) -> ViewportSize;

    /// Show the canvas through `transform`.
    fn apply_transform(&mut self, transform: &CameraTransform);

    /// Show the captions for the current position.
    fn show_captions(&mut self, _captions: &CaptionBlend<'_>) {}
}

/// Lets the host keep a handle on a renderer the presentation drives.
impl<R: Renderer> Renderer for Rc<RefCell<R>> {
    fn viewport_size(&self) -> ViewportSize {
        self.borrow().viewport_size()
    }

    fn apply_transform(&mut self, transform: &CameraTransform) {
        self.borrow_mut().apply_transform(transform);
    }

    fn show_captions(&mut self, captions: &CaptionBlend<'_>) {
        self.borrow_mut().show_captions(captions);
    }
}

impl<O: OverlayProvider> OverlayProvider for Rc<RefCell<O>> {
    fn update(&mut self, frame_id: &str, on_screen: ViewportSize) {
        self.borrow_mut().update(frame_id, on_screen);
    }

    fn hide(&mut self) {
        self.borrow_mut().hide();
    }
}

/// Per-frame media overlay. Shown only while exactly at a frame.
pub trait OverlayProvider {
    /// `on_screen` is the frame's size in pixels when fitted to the viewport.
    fn update(&mut self, frame_id: &str, on_screen: ViewportSize);

    /// Remove the overlay.
    fn hide(&mut self);
}

/// Receives position notifications, e.g. to keep URL state or a slider in sync.
pub trait PositionObserver {
    /// Called after every change of the current position.
    fn position_changed(&mut self, position: f64);

    /// Startup finished; controls may be enabled.
    fn ready(&mut self) {}
}

/// Consumer-facing error reporting hook; receives human-readable messages.
pub trait ErrorSink {
    /// Deliver `message` to the user.
    fn report(&mut self, message: &str);
}

/// Overlay that is never shown.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverlay;

impl OverlayProvider for NoOverlay {
    fn update(&mut self, _frame_id: &str, _on_screen: ViewportSize) {}

    fn hide(&mut self) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl PositionObserver for NoObserver {
    fn position_changed(&mut self, _position: f64) {}
}

/// Error sink that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogErrors;

impl ErrorSink for LogErrors {
    fn report(&mut self, message: &str) {
        tracing::error!("{message}");
    }
}

/// The full set of collaborators owned by one presentation.
pub struct Hooks {
    /// Draws the canvas.
    pub renderer: Box<dyn Renderer>,
    /// Shows media at frames.
    pub overlay: Box<dyn OverlayProvider>,
    /// Receives position changes.
    pub observer: Box<dyn PositionObserver>,
    /// Receives user-facing errors.
    pub errors: Box<dyn ErrorSink>,
    /// Asks the host for the next render loop tick.
    pub scheduler: Box<dyn TickScheduler>,
}

impl Hooks {
    /// Hooks with the given renderer and inert defaults for everything else.
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self {
            renderer: Box::new(renderer),
            overlay: Box::new(NoOverlay),
            observer: Box::new(NoObserver),
            errors: Box::new(LogErrors),
            scheduler: Box::new(TickFlag::new()),
        }
    }

    /// Replace the overlay.
    pub fn with_overlay(mut self, overlay: impl OverlayProvider + 'static) -> Self {
        self.overlay = Box::new(overlay);
        self
    }

    /// Replace the position observer.
    pub fn with_observer(mut self, observer: impl PositionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Replace the error sink.
    pub fn with_errors(mut self, errors: impl ErrorSink + 'static) -> Self {
        self.errors = Box::new(errors);
        self
    }

    /// Replace the tick scheduler.
    pub fn with_scheduler(mut self, scheduler: impl TickScheduler + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }
}
