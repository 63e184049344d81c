use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::{Rc, Weak},
    time::Duration,
};

/// Entry points a synchronized presentation exposes to its peer.
pub trait SyncPeer {
    /// Whether startup has completed; actions wait until it has.
    fn is_ready(&self) -> bool;

    /// Apply an animated move received from the peer, without sending it back.
    fn animate_to(&mut self, position: f64);

    /// Apply a jump received from the peer.
    fn jump_to(&mut self, position: f64);
}

/// Shared handle to a peer presentation.
pub type PeerHandle = Weak<RefCell<dyn SyncPeer>>;

/// How often, and how many times, to check whether the peer became ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Time between readiness checks.
    #[serde(rename = "poll_interval_ms", with = "duration_ms")]
    pub interval: Duration,
    /// `None` polls until the peer is ready or gone.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_attempts: None,
        }
    }
}

impl PollPolicy {
    fn interval_ms(&self) -> f64 {
        self.interval.as_secs_f64() * 1000.0
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Navigation mirrored onto a peer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SyncAction {
    /// Animated move to a position.
    AnimateTo(f64),
    /// Immediate move to a position.
    JumpTo(f64),
}

impl SyncAction {
    fn apply(self, peer: &mut dyn SyncPeer) {
        match self {
            Self::AnimateTo(pos) => peer.animate_to(pos),
            Self::JumpTo(pos) => peer.jump_to(pos),
        }
    }
}

/// Outcome of one synchronizer poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPoll {
    /// Nothing pending.
    Idle,
    /// Pending actions remain; the peer was not checked or not ready.
    Waiting,
    /// Pending actions were handed to the peer.
    Delivered(usize),
    /// Pending actions were dropped: the peer is gone or attempts ran out.
    Dropped(usize),
}

/// Keeps a peer presentation's destination in step with this one.
///
/// Actions are queued in issue order and handed to the peer on the first poll where
/// it is alive and ready. There is no acknowledgement and no conflict resolution:
/// the latest delivered action wins on the peer.
#[derive(Default)]
pub struct Synchronizer {
    peer: Option<PeerHandle>,
    policy: PollPolicy,
    pending: VecDeque<SyncAction>,
    next_poll_ms: Option<f64>,
    attempts: u32,
}

impl Synchronizer {
    /// Synchronizer with no peer attached.
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Polling policy in use.
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Follow `peer` from now on.
    pub fn attach(&mut self, peer: PeerHandle) {
        self.peer = Some(peer);
    }

    /// Forget the peer and everything queued for it.
    pub fn detach(&mut self) {
        self.peer = None;
        self.reset_pending();
    }

    /// Whether a peer is attached and still alive.
    pub fn peer_exists(&self) -> bool {
        self.peer
            .as_ref()
            .is_some_and(|peer| peer.strong_count() > 0)
    }

    /// Number of queued actions.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queue `action` for the peer and try to deliver right away. No-op without a
    /// live peer.
    pub fn propagate(&mut self, action: SyncAction, now_ms: f64) -> SyncPoll {
        if !self.peer_exists() {
            return SyncPoll::Idle;
        }
        self.pending.push_back(action);
        if self.pending.len() == 1 {
            self.next_poll_ms = None;
            self.attempts = 0;
        }
        self.poll(now_ms)
    }

    /// Check the peer if a poll is due, delivering everything pending once it is ready.
    pub fn poll(&mut self, now_ms: f64) -> SyncPoll {
        if self.pending.is_empty() {
            return SyncPoll::Idle;
        }
        if self.next_poll_ms.is_some_and(|due| now_ms < due) {
            return SyncPoll::Waiting;
        }

        let Some(peer) = self.peer.as_ref().and_then(Weak::upgrade) else {
            let dropped = self.reset_pending();
            tracing::debug!(dropped, "sync peer gone; dropping pending actions");
            return SyncPoll::Dropped(dropped);
        };

        if let Some(delivered) = self.try_deliver(&peer) {
            tracing::debug!(delivered, "sync actions delivered to peer");
            return SyncPoll::Delivered(delivered);
        }

        self.attempts += 1;
        if self
            .policy
            .max_attempts
            .is_some_and(|max| self.attempts >= max)
        {
            let attempts = self.attempts;
            let dropped = self.reset_pending();
            tracing::warn!(dropped, attempts, "sync peer never became ready");
            return SyncPoll::Dropped(dropped);
        }
        self.next_poll_ms = Some(now_ms + self.policy.interval_ms());
        SyncPoll::Waiting
    }

    // A peer that is already borrowed is in the middle of its own update and counts
    // as not ready.
    fn try_deliver(&mut self, peer: &Rc<RefCell<dyn SyncPeer>>) -> Option<usize> {
        let mut guard = peer.try_borrow_mut().ok()?;
        if !guard.is_ready() {
            return None;
        }
        let n = self.pending.len();
        let actions: Vec<SyncAction> = self.pending.drain(..).collect();
        self.next_poll_ms = None;
        self.attempts = 0;
        for action in actions {
            action.apply(&mut *guard);
        }
        Some(n)
    }

    fn reset_pending(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        self.next_poll_ms = None;
        self.attempts = 0;
        n
    }
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("peer_exists", &self.peer_exists())
            .field("policy", &self.policy)
            .field("pending", &self.pending)
            .field("next_poll_ms", &self.next_poll_ms)
            .field("attempts", &self.attempts)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sync/peer.rs"]
mod tests;
