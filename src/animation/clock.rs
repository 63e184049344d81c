use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

/// Millisecond time source sampled once per animation tick.
pub trait Clock {
    /// Current time in milliseconds. Only differences between samples matter.
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock starting at zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Synthetic clock advanced explicitly; used for headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<f64>,
}

impl ManualClock {
    /// Clock reading `start_ms` until moved.
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Set the current time.
    pub fn set(&self, ms: f64) {
        self.now_ms.set(ms);
    }

    /// Move the current time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now_ms.set(self.now_ms.get() + by.as_secs_f64() * 1000.0);
    }

    /// Move the current time forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: f64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

/// Host hook for the continuous render loop: asks for one more tick.
///
/// A browser host maps this to `requestAnimationFrame`, a native host to its event
/// loop redraw request.
pub trait TickScheduler {
    /// Ask for one more call to the presentation's `tick`.
    fn request_tick(&mut self);
}

/// Scheduler that only records requests; the owner polls it from its own loop.
#[derive(Clone, Debug, Default)]
pub struct TickFlag {
    pending: Rc<Cell<u64>>,
}

impl TickFlag {
    /// Flag with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume outstanding requests. Returns whether any were pending.
    pub fn take(&self) -> bool {
        self.pending.replace(0) > 0
    }

    /// Number of outstanding requests.
    pub fn pending(&self) -> u64 {
        self.pending.get()
    }
}

impl TickScheduler for TickFlag {
    fn request_tick(&mut self) {
        self.pending.set(self.pending.get() + 1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
