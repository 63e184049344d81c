use crate::presentation::path::FramePath;

/// Lowest accepted animation speed, in path positions per second.
pub const MIN_ANIMATION_SPEED: f64 = 0.001;

/// Relative slack on the last step, absorbing rounding from summed steps.
const STEP_TOLERANCE: f64 = 1e-9;

/// Animation speed in path positions per second, never below [`MIN_ANIMATION_SPEED`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct AnimationSpeed(f64);

impl AnimationSpeed {
    /// Speed of `positions_per_sec`, raised to the floor. Non-finite input maps to the floor.
    pub fn new(positions_per_sec: f64) -> Self {
        if positions_per_sec.is_finite() {
            Self(positions_per_sec.max(MIN_ANIMATION_SPEED))
        } else {
            Self(MIN_ANIMATION_SPEED)
        }
    }

    /// Speed in path positions per second.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for AnimationSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f64> for AnimationSpeed {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

impl From<AnimationSpeed> for f64 {
    fn from(v: AnimationSpeed) -> Self {
        v.0
    }
}

/// Whether a [`PathMotion`] is moving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionPhase {
    /// Current position equals the destination; nothing to draw.
    Idle,
    /// Current position is moving toward the destination.
    Animating,
}

/// Current and destination path positions plus the clock state that drives one
/// toward the other at constant speed.
///
/// Both positions are clamped into `[0, len - 1]` on every write. NaN writes are
/// ignored.
#[derive(Clone, Debug)]
pub struct PathMotion {
    max_position: f64,
    current: f64,
    destination: f64,
    last_tick_ms: Option<f64>,
    speed: AnimationSpeed,
}

impl PathMotion {
    /// Idle at `initial` (clamped to the path).
    pub fn new(path: &FramePath, initial: f64, speed: AnimationSpeed) -> Self {
        let current = path.clamp(initial);
        Self {
            max_position: path.max_position(),
            current,
            destination: current,
            last_tick_ms: None,
            speed,
        }
    }

    fn clamp(&self, pos: f64) -> f64 {
        pos.clamp(0.0, self.max_position)
    }

    /// Current position.
    pub fn position(&self) -> f64 {
        self.current
    }

    /// Position being animated toward.
    pub fn destination(&self) -> f64 {
        self.destination
    }

    /// Current speed.
    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    /// Takes effect from the next tick.
    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.speed = speed;
    }

    /// Timestamp of the previous tick, if any.
    pub fn last_tick_ms(&self) -> Option<f64> {
        self.last_tick_ms
    }

    /// Idle once the position reaches the destination.
    pub fn phase(&self) -> MotionPhase {
        if self.current == self.destination {
            MotionPhase::Idle
        } else {
            MotionPhase::Animating
        }
    }

    /// Write the current position directly, bypassing animation.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set_position(&mut self, pos: f64) -> bool {
        if pos.is_nan() {
            return false;
        }
        let pos = self.clamp(pos);
        if pos == self.current {
            return false;
        }
        self.current = pos;
        true
    }

    /// Retarget the animation. Any in-flight movement continues from where it is
    /// toward the new destination. Returns `true` if the destination changed.
    pub fn set_destination(&mut self, pos: f64) -> bool {
        if pos.is_nan() {
            return false;
        }
        let pos = self.clamp(pos);
        if pos == self.destination {
            return false;
        }
        self.destination = pos;
        true
    }

    /// Forget the last tick timestamp; the next tick only re-establishes a baseline.
    pub fn reset_clock(&mut self) {
        self.last_tick_ms = None;
    }

    /// Advance toward the destination by the time elapsed since the previous tick.
    ///
    /// Returns the new position when it moved. The first tick after construction (or
    /// [`Self::reset_clock`]) only records `now_ms`. The timestamp is refreshed on every
    /// call, moving or not, and backwards clock jumps count as zero elapsed time. A
    /// distance of `d` at step `s` arrives in exactly `ceil(d / s)` ticks.
    pub fn tick(&mut self, now_ms: f64) -> Option<f64> {
        let last = self.last_tick_ms.replace(now_ms);
        if self.phase() == MotionPhase::Idle {
            return None;
        }
        let last = last?;

        let dt = (now_ms - last).max(0.0);
        let step = dt * self.speed.get() / 1000.0;
        let remaining = (self.destination - self.current).abs();
        let next = if step > 0.0 && remaining <= step * (1.0 + STEP_TOLERANCE) {
            self.destination
        } else if self.destination > self.current {
            self.current + step
        } else {
            self.current - step
        };

        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
