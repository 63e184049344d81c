use super::*;

#[test]
fn manual_clock_moves_only_when_told() {
    let clock = ManualClock::new(5.0);
    assert_eq!(clock.now_ms(), 5.0);
    clock.advance_ms(10.0);
    clock.advance(Duration::from_millis(20));
    assert_eq!(clock.now_ms(), 35.0);
    clock.set(1.0);
    assert_eq!(clock.now_ms(), 1.0);
}

#[test]
fn system_clock_is_monotonic() {
    let clock = SystemClock::new();
    let a = clock.now_ms();
    let b = clock.now_ms();
    assert!(b >= a);
    assert!(a >= 0.0);
}

#[test]
fn tick_flag_clones_share_requests() {
    let flag = TickFlag::new();
    let mut handle = flag.clone();
    assert!(!flag.take());
    handle.request_tick();
    handle.request_tick();
    assert_eq!(flag.pending(), 2);
    assert!(flag.take());
    assert!(!flag.take());
}
