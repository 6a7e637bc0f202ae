use super::*;

#[test]
fn manual_clock_is_shared_across_clones() {
    let clock = ManualClock::new();
    let other = clock.clone();
    clock.advance(250.0);
    assert_eq!(other.now_ms(), 250.0);
    other.set(1000.0);
    assert_eq!(clock.now_ms(), 1000.0);
}

#[test]
fn system_clock_is_monotonic() {
    let clock = SystemClock::new();
    let a = clock.now_ms();
    let b = clock.now_ms();
    assert!(a >= 0.0);
    assert!(b >= a);
}

#[test]
fn scheduler_rejects_bad_intervals() {
    assert!(FrameScheduler::new(0.0).is_err());
    assert!(FrameScheduler::new(-16.0).is_err());
    assert!(FrameScheduler::new(f64::NAN).is_err());
}

#[test]
fn ticks_become_due_once_per_interval() {
    let mut sched = FrameScheduler::new(16.0).unwrap();
    assert!(!sched.poll(100.0), "not started yet");

    sched.start(0.0);
    assert!(sched.is_running());
    assert!(!sched.poll(10.0));
    assert!(sched.poll(16.0));
    assert!(!sched.poll(20.0), "next tick not due yet");
    assert!(sched.poll(32.5));
}

#[test]
fn suspended_intervals_collapse_to_one_tick() {
    let mut sched = FrameScheduler::new(16.0).unwrap();
    sched.start(0.0);
    // The driver slept for ~10 ticks; only one fires, then cadence resumes.
    assert!(sched.poll(160.0));
    assert!(!sched.poll(161.0));
    assert!(sched.poll(176.0));
}

#[test]
fn cancel_is_idempotent_and_restartable() {
    let mut sched = FrameScheduler::new(16.0).unwrap();
    sched.start(0.0);
    sched.cancel();
    sched.cancel();
    assert!(!sched.is_running());
    assert!(!sched.poll(1000.0));

    sched.start(1000.0);
    assert!(sched.poll(1016.0));
}
