use std::{cell::RefCell, rc::Rc};

use crate::{
    animation::{
        clock::Clock,
        motion::{AnimationSpeed, MotionPhase, PathMotion},
    },
    content::texts::{FrameTexts, caption_blend},
    foundation::{barrier::JoinBarrier, core::FrameGeometry, error::FramecamResult},
    geometry::store::{GeometryProvider, GeometryStore},
    presentation::{hooks::Hooks, path::FramePath},
    sync::peer::{PeerHandle, PollPolicy, SyncAction, SyncPeer, Synchronizer},
    transform::camera::{CameraTransform, compute_transform, frame_on_screen_size},
};

/// Startup and navigation settings for one presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PresentationSettings {
    /// Transition speed.
    pub speed: AnimationSpeed,
    /// Position shown once startup completes.
    pub initial_position: f64,
    /// How the peer is polled for readiness.
    pub poll: PollPolicy,
}

/// One presentation: owns its path, geometry cache and motion state, and drives its
/// hooks.
///
/// Navigation is ignored until both geometries and texts have been delivered. The
/// externally visible position (what a URL or slider shows) only changes through
/// [`Presentation::animate_to`], which makes repeated requests for the same position
/// no-ops.
pub struct Presentation {
    path: FramePath,
    geometries: GeometryStore,
    texts: FrameTexts,
    motion: PathMotion,
    visible: f64,
    startup: JoinBarrier,
    geometries_loaded: bool,
    texts_loaded: bool,
    ready: bool,
    hooks: Hooks,
    clock: Rc<dyn Clock>,
    sync: Synchronizer,
}

impl Presentation {
    /// Presentation that starts once geometries and texts have both been delivered.
    pub fn new(
        path: FramePath,
        settings: PresentationSettings,
        hooks: Hooks,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let motion = PathMotion::new(&path, settings.initial_position, settings.speed);
        Self {
            visible: motion.position(),
            path,
            geometries: GeometryStore::new(),
            texts: FrameTexts::new(),
            motion,
            startup: JoinBarrier::new(2),
            geometries_loaded: false,
            texts_loaded: false,
            ready: false,
            hooks,
            clock,
            sync: Synchronizer::new(settings.poll),
        }
    }

    /// Wrap in the shared handle used for synchronization.
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Keep `a` and `b` in step with each other.
    pub fn connect(a: &Rc<RefCell<Self>>, b: &Rc<RefCell<Self>>) {
        let a_dyn: Rc<RefCell<dyn SyncPeer>> = a.clone();
        let b_dyn: Rc<RefCell<dyn SyncPeer>> = b.clone();
        a.borrow_mut().attach_peer(Rc::downgrade(&b_dyn));
        b.borrow_mut().attach_peer(Rc::downgrade(&a_dyn));
    }

    /// Mirror navigation onto `peer`. Replaces any earlier peer.
    pub fn attach_peer(&mut self, peer: PeerHandle) {
        self.sync.attach(peer);
    }

    /// Stop mirroring and drop queued actions.
    pub fn detach_peer(&mut self) {
        self.sync.detach();
    }

    /// Cache the geometry of every frame on the path.
    ///
    /// A missing or degenerate frame is reported through the error hook and returned;
    /// the presentation does not become ready until a later call succeeds. Geometries
    /// cached before the failure are kept.
    pub fn load_geometries(&mut self, provider: &dyn GeometryProvider) -> FramecamResult<()> {
        if self.geometries_loaded {
            return Ok(());
        }
        if let Err(err) = self.geometries.populate(&self.path, provider) {
            tracing::warn!(error = %err, "presentation cannot start");
            self.hooks.errors.report(&err.to_string());
            return Err(err);
        }
        self.geometries_loaded = true;
        self.arrive();
        Ok(())
    }

    /// Hand over the loaded frame texts. Only the first delivery is used.
    pub fn deliver_texts(&mut self, texts: FrameTexts) {
        if self.texts_loaded {
            return;
        }
        self.texts = texts;
        self.texts_loaded = true;
        self.arrive();
    }

    fn arrive(&mut self) {
        if !self.startup.arrive() {
            return;
        }
        self.ready = true;
        tracing::debug!(position = self.motion.position(), "presentation ready");
        self.render_or_report();
        self.hooks.observer.ready();
        self.hooks.scheduler.request_tick();
    }

    /// Whether startup has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// The path being presented.
    pub fn path(&self) -> &FramePath {
        &self.path
    }

    /// Frame geometries cached so far.
    pub fn geometries(&self) -> &GeometryStore {
        &self.geometries
    }

    /// Frame texts, empty until delivered.
    pub fn texts(&self) -> &FrameTexts {
        &self.texts
    }

    /// Current position on the path.
    pub fn position(&self) -> f64 {
        self.motion.position()
    }

    /// Position the current transition is heading to.
    pub fn destination(&self) -> f64 {
        self.motion.destination()
    }

    /// Position last requested through [`Self::animate_to`] (or the initial one).
    pub fn visible_position(&self) -> f64 {
        self.visible
    }

    /// Whether a transition is running.
    pub fn phase(&self) -> MotionPhase {
        self.motion.phase()
    }

    /// Change the transition speed, including one already running.
    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.motion.set_speed(speed);
    }

    /// Actions waiting for the peer.
    pub fn pending_sync(&self) -> usize {
        self.sync.pending()
    }

    /// Move to `pos` immediately, without animating. Not propagated to a peer.
    pub fn jump_to(&mut self, pos: f64) {
        if !self.ready {
            return;
        }
        if self.motion.set_position(pos) {
            self.position_changed();
        }
    }

    /// Target of [`Self::step_to_previous`]; `None` before startup.
    pub fn previous_frame_position(&self) -> Option<f64> {
        self.ready
            .then(|| self.path.previous_frame_position(self.motion.position()))
    }

    /// Target of [`Self::step_to_next`]; `None` before startup.
    pub fn next_frame_position(&self) -> Option<f64> {
        self.ready
            .then(|| self.path.next_frame_position(self.motion.position()))
    }

    /// Animate to the previous frame.
    pub fn step_to_previous(&mut self) {
        if let Some(pos) = self.previous_frame_position() {
            self.animate_to(pos);
        }
    }

    /// Animate to the next frame.
    pub fn step_to_next(&mut self) {
        if let Some(pos) = self.next_frame_position() {
            self.animate_to(pos);
        }
    }

    /// Start an animated transition to `pos` and mirror it on the peer.
    ///
    /// Ignored before startup and when `pos` equals the visible position.
    pub fn animate_to(&mut self, pos: f64) {
        if let Some(pos) = self.retarget(pos) {
            let now = self.clock.now_ms();
            self.sync.propagate(SyncAction::AnimateTo(pos), now);
        }
    }

    // Moves the visible marker and destination to `pos`. Returns the clamped position
    // when the marker changed.
    fn retarget(&mut self, pos: f64) -> Option<f64> {
        if !self.ready || pos.is_nan() {
            return None;
        }
        let pos = self.path.clamp(pos);
        if pos == self.visible {
            return None;
        }
        self.visible = pos;
        if self.motion.set_destination(pos) {
            tracing::debug!(
                from = self.motion.position(),
                to = pos,
                "transition started"
            );
        }
        Some(pos)
    }

    /// End of a direct manipulation (e.g. slider release): jump to `pos` on both
    /// sides, then settle on the nearest frame.
    pub fn settle_from_drag(&mut self, pos: f64) {
        if !self.ready || pos.is_nan() {
            return;
        }
        self.jump_to(pos);
        let now = self.clock.now_ms();
        self.sync.propagate(SyncAction::JumpTo(pos), now);
        self.animate_to(pos.round());
    }

    /// Re-render at the current position, e.g. after a viewport resize.
    pub fn redraw(&mut self) {
        if self.ready {
            self.render_or_report();
        }
    }

    /// One step of the render loop. Always asks for the next tick once started.
    pub fn tick(&mut self) {
        if !self.ready {
            return;
        }
        let now = self.clock.now_ms();
        self.sync.poll(now);
        if self.motion.tick(now).is_some() {
            self.position_changed();
        }
        self.hooks.scheduler.request_tick();
    }

    /// Deliver queued peer actions if a poll is due.
    pub fn poll_sync(&mut self) {
        let now = self.clock.now_ms();
        self.sync.poll(now);
    }

    /// Camera transform at the current position.
    pub fn current_transform(&self) -> FramecamResult<CameraTransform> {
        let segment = self.path.segment(self.motion.position());
        let a = self.frame_geometry(segment.from)?;
        let b = self.frame_geometry(segment.to)?;
        let viewport = self.hooks.renderer.viewport_size();
        Ok(compute_transform(&a, &b, segment.fraction, viewport))
    }

    fn frame_geometry(&self, index: usize) -> FramecamResult<FrameGeometry> {
        let id = self.path.frame_id(index).unwrap_or_default();
        self.geometries.require(id)
    }

    fn position_changed(&mut self) {
        let pos = self.motion.position();
        tracing::trace!(position = pos, "position changed");
        self.hooks.observer.position_changed(pos);
        self.render_or_report();
    }

    fn render_or_report(&mut self) {
        if let Err(err) = self.render() {
            tracing::warn!(error = %err, "render failed");
            self.hooks.errors.report(&err.to_string());
        }
    }

    fn render(&mut self) -> FramecamResult<()> {
        let segment = self.path.segment(self.motion.position());
        let transform = self.current_transform()?;
        self.hooks.renderer.apply_transform(&transform);

        let captions = caption_blend(&self.path, &self.texts, segment);
        self.hooks.renderer.show_captions(&captions);

        if segment.is_at_frame() {
            let geometry = self.frame_geometry(segment.from)?;
            let viewport = self.hooks.renderer.viewport_size();
            let id = self.path.frame_id(segment.from).unwrap_or_default();
            self.hooks
                .overlay
                .update(id, frame_on_screen_size(&geometry, viewport));
        } else {
            self.hooks.overlay.hide();
        }
        Ok(())
    }
}

impl SyncPeer for Presentation {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn animate_to(&mut self, position: f64) {
        self.retarget(position);
    }

    fn jump_to(&mut self, position: f64) {
        Presentation::jump_to(self, position);
    }
}

impl std::fmt::Debug for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presentation")
            .field("path", &self.path)
            .field("position", &self.motion.position())
            .field("destination", &self.motion.destination())
            .field("visible", &self.visible)
            .field("ready", &self.ready)
            .field("sync", &self.sync)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/presentation/controller.rs"]
mod tests;
