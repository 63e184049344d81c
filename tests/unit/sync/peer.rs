use super::*;

#[derive(Default)]
struct FakePeer {
    ready: bool,
    received: Vec<SyncAction>,
}

impl SyncPeer for FakePeer {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn animate_to(&mut self, position: f64) {
        self.received.push(SyncAction::AnimateTo(position));
    }

    fn jump_to(&mut self, position: f64) {
        self.received.push(SyncAction::JumpTo(position));
    }
}

fn attached(policy: PollPolicy, ready: bool) -> (Rc<RefCell<FakePeer>>, Synchronizer) {
    let peer = Rc::new(RefCell::new(FakePeer {
        ready,
        ..FakePeer::default()
    }));
    let dyn_peer: Rc<RefCell<dyn SyncPeer>> = peer.clone();
    let mut sync = Synchronizer::new(policy);
    sync.attach(Rc::downgrade(&dyn_peer));
    (peer, sync)
}

#[test]
fn ready_peer_receives_action_immediately() {
    let (peer, mut sync) = attached(PollPolicy::default(), true);
    assert_eq!(
        sync.propagate(SyncAction::AnimateTo(2.0), 0.0),
        SyncPoll::Delivered(1)
    );
    assert_eq!(peer.borrow().received, vec![SyncAction::AnimateTo(2.0)]);
    assert_eq!(sync.pending(), 0);
}

#[test]
fn unready_peer_is_polled_at_the_interval() {
    let (peer, mut sync) = attached(PollPolicy::default(), false);
    assert_eq!(
        sync.propagate(SyncAction::AnimateTo(2.0), 0.0),
        SyncPoll::Waiting
    );

    assert_eq!(sync.poll(50.0), SyncPoll::Waiting);
    assert_eq!(sync.poll(100.0), SyncPoll::Waiting);

    peer.borrow_mut().ready = true;
    // next check is due at 200 ms
    assert_eq!(sync.poll(150.0), SyncPoll::Waiting);
    assert!(peer.borrow().received.is_empty());
    assert_eq!(sync.poll(200.0), SyncPoll::Delivered(1));
    assert_eq!(peer.borrow().received, vec![SyncAction::AnimateTo(2.0)]);
}

#[test]
fn queued_actions_arrive_in_issue_order() {
    let (peer, mut sync) = attached(PollPolicy::default(), false);
    sync.propagate(SyncAction::JumpTo(1.5), 0.0);
    sync.propagate(SyncAction::AnimateTo(2.0), 10.0);
    assert_eq!(sync.pending(), 2);

    peer.borrow_mut().ready = true;
    assert_eq!(sync.poll(100.0), SyncPoll::Delivered(2));
    assert_eq!(
        peer.borrow().received,
        vec![SyncAction::JumpTo(1.5), SyncAction::AnimateTo(2.0)]
    );
}

#[test]
fn vanished_peer_drops_pending_actions() {
    let (peer, mut sync) = attached(PollPolicy::default(), false);
    sync.propagate(SyncAction::AnimateTo(1.0), 0.0);
    drop(peer);
    assert!(!sync.peer_exists());
    assert_eq!(sync.poll(100.0), SyncPoll::Dropped(1));
    assert_eq!(sync.poll(200.0), SyncPoll::Idle);
}

#[test]
fn no_peer_makes_propagation_a_no_op() {
    let mut sync = Synchronizer::default();
    assert!(!sync.peer_exists());
    assert_eq!(sync.propagate(SyncAction::AnimateTo(1.0), 0.0), SyncPoll::Idle);
    assert_eq!(sync.pending(), 0);
}

#[test]
fn attempts_limit_gives_up() {
    let policy = PollPolicy {
        interval: Duration::from_millis(100),
        max_attempts: Some(3),
    };
    let (peer, mut sync) = attached(policy, false);
    assert_eq!(sync.propagate(SyncAction::AnimateTo(1.0), 0.0), SyncPoll::Waiting);
    assert_eq!(sync.poll(100.0), SyncPoll::Waiting);
    assert_eq!(sync.poll(200.0), SyncPoll::Dropped(1));

    peer.borrow_mut().ready = true;
    assert_eq!(sync.poll(300.0), SyncPoll::Idle);
    assert!(peer.borrow().received.is_empty());
}

#[test]
fn busy_peer_counts_as_not_ready() {
    let (peer, mut sync) = attached(PollPolicy::default(), true);
    {
        let _busy = peer.borrow_mut();
        assert_eq!(
            sync.propagate(SyncAction::AnimateTo(3.0), 0.0),
            SyncPoll::Waiting
        );
    }
    assert_eq!(sync.poll(100.0), SyncPoll::Delivered(1));
}

#[test]
fn detach_clears_the_queue() {
    let (_peer, mut sync) = attached(PollPolicy::default(), false);
    sync.propagate(SyncAction::AnimateTo(1.0), 0.0);
    sync.detach();
    assert_eq!(sync.pending(), 0);
    assert_eq!(sync.poll(100.0), SyncPoll::Idle);
}

#[test]
fn policy_reads_interval_in_milliseconds() {
    let policy: PollPolicy =
        serde_json::from_str(r#"{"poll_interval_ms": 250, "max_attempts": 4}"#).unwrap();
    assert_eq!(policy.interval, Duration::from_millis(250));
    assert_eq!(policy.max_attempts, Some(4));

    let policy: PollPolicy = serde_json::from_str("{}").unwrap();
    assert_eq!(policy, PollPolicy::default());
}
