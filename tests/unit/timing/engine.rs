use super::*;
use crate::route::model::PathConfig;
use crate::route::pipeline::build_route_path;

fn drive(timer: &mut AnimationTimer, from_ms: f64, to_ms: f64, step_ms: f64) {
    let mut t = from_ms;
    while t <= to_ms {
        timer.tick(t);
        t += step_ms;
    }
}

fn count_completes(events: &[TimingEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, TimingEvent::Complete))
        .count()
}

#[test]
fn invalid_construction_is_rejected() {
    assert!(AnimationTimer::new(f64::NAN).is_err());
    assert!(AnimationTimer::new(-1.0).is_err());
    assert!(AnimationTimer::new(0.0).is_ok());
}

#[test]
fn driving_through_the_duration_completes_exactly_once() {
    let mut timer = AnimationTimer::new(1000.0).unwrap();
    timer.play(0.0);
    drive(&mut timer, 0.0, 1200.0, 50.0);

    assert_eq!(timer.phase(), PlaybackPhase::Paused);
    assert_eq!(timer.progress(), 1.0);
    let events = timer.drain_events();
    assert_eq!(count_completes(&events), 1);
    assert!(events.contains(&TimingEvent::Play));

    // More ticks at the end do not re-complete.
    drive(&mut timer, 1300.0, 1500.0, 50.0);
    assert_eq!(count_completes(&timer.drain_events()), 0);
}

#[test]
fn tick_deltas_are_clamped() {
    let mut timer = AnimationTimer::new(60_000.0).unwrap();
    timer.play(0.0);
    timer.tick(0.0);
    // A 10 s suspend contributes at most the clamp.
    timer.tick(10_000.0);
    assert_eq!(timer.state().current_time_ms, MAX_TICK_DELTA_MS);
}

#[test]
fn speed_multiplier_scales_tick_deltas() {
    let mut timer = AnimationTimer::new(10_000.0).unwrap();
    timer.set_speed_multiplier(2.0).unwrap();
    timer.play(0.0);
    timer.tick(0.0);
    timer.tick(100.0);
    assert_eq!(timer.state().current_time_ms, 200.0);

    assert!(timer.set_speed_multiplier(0.0).is_err());
    assert!(timer.set_speed_multiplier(f64::NAN).is_err());
}

#[test]
fn waypoint_wait_freezes_effective_progress() {
    let mut timer = AnimationTimer::new(2000.0).unwrap();
    timer
        .set_pause_marks(vec![PauseMark {
            waypoint: 1,
            progress: 0.5,
            duration_ms: 1000.0,
        }])
        .unwrap();
    timer.play(0.0);
    drive(&mut timer, 0.0, 1000.0, 100.0);

    // Reached the mark: waiting, snapshot frozen at 0.5.
    let state = timer.state();
    assert!(state.is_waiting_at_waypoint);
    assert_eq!(state.pause_waypoint_index, Some(1));
    assert_eq!(state.effective_progress, 0.5);
    assert_eq!(state.waypoint_progress_snapshot, Some(0.5));

    // A full second of wall clock passes; nothing creeps.
    drive(&mut timer, 1100.0, 1900.0, 100.0);
    assert_eq!(timer.effective_progress(), 0.5);
    assert_eq!(timer.state().current_time_ms, 1000.0);

    // The wait elapses, playback resumes, and the held time never leaked.
    timer.tick(2000.0);
    assert_eq!(timer.phase(), PlaybackPhase::Playing);
    timer.tick(2100.0);
    assert!((timer.state().current_time_ms - 1100.0).abs() < 1e-9);

    let events = timer.drain_events();
    assert!(events.contains(&TimingEvent::WaitStart { waypoint: 1 }));
    assert!(events.contains(&TimingEvent::WaitEnd { waypoint: 1 }));
}

#[test]
fn wait_fires_once_per_traversal_and_rearms_on_stop() {
    let mut timer = AnimationTimer::new(1000.0).unwrap();
    timer
        .set_pause_marks(vec![PauseMark {
            waypoint: 0,
            progress: 0.5,
            duration_ms: 200.0,
        }])
        .unwrap();
    timer.play(0.0);
    drive(&mut timer, 0.0, 600.0, 50.0);
    assert_eq!(timer.phase(), PlaybackPhase::Waiting);

    timer.stop();
    timer.play(5000.0);
    drive(&mut timer, 5000.0, 5600.0, 50.0);
    assert_eq!(timer.phase(), PlaybackPhase::Waiting, "mark re-armed by stop");
}

#[test]
fn zero_duration_marks_never_enter_waiting() {
    let mut timer = AnimationTimer::new(1000.0).unwrap();
    timer
        .set_pause_marks(vec![PauseMark {
            waypoint: 2,
            progress: 0.3,
            duration_ms: 0.0,
        }])
        .unwrap();
    timer.play(0.0);
    drive(&mut timer, 0.0, 1100.0, 50.0);
    let events = timer.drain_events();
    assert!(!events.iter().any(|e| matches!(e, TimingEvent::WaitStart { .. })));
    assert_eq!(count_completes(&events), 1);
}

#[test]
fn set_duration_preserves_the_progress_fraction() {
    let mut timer = AnimationTimer::new(5000.0).unwrap();
    timer.seek_ms(1500.0).unwrap();
    assert!((timer.progress() - 0.3).abs() < 1e-12);

    timer.set_duration(10_000.0).unwrap();
    assert!((timer.state().current_time_ms - 3000.0).abs() < 1e-9);
    assert!((timer.progress() - 0.3).abs() < 1e-12);
}

#[test]
fn seeks_clamp_and_reject_non_finite_input() {
    let mut timer = AnimationTimer::new(1000.0).unwrap();
    timer.seek_ms(5000.0).unwrap();
    assert_eq!(timer.state().current_time_ms, 1000.0);
    timer.seek_ms(-50.0).unwrap();
    assert_eq!(timer.state().current_time_ms, 0.0);

    timer.seek_progress(0.25).unwrap();
    assert_eq!(timer.state().current_time_ms, 250.0);

    assert!(timer.seek_ms(f64::NAN).is_err());
    assert!(timer.seek_progress(f64::INFINITY).is_err());
}

#[test]
fn seeking_past_a_mark_suppresses_its_wait() {
    let mut timer = AnimationTimer::new(1000.0).unwrap();
    timer
        .set_pause_marks(vec![PauseMark {
            waypoint: 1,
            progress: 0.5,
            duration_ms: 500.0,
        }])
        .unwrap();
    timer.seek_progress(0.8).unwrap();
    timer.play(0.0);
    drive(&mut timer, 0.0, 300.0, 50.0);

    let events = timer.drain_events();
    assert!(!events.iter().any(|e| matches!(e, TimingEvent::WaitStart { .. })));
    assert_eq!(count_completes(&events), 1);
}

#[test]
fn zero_duration_never_divides() {
    let mut timer = AnimationTimer::new(0.0).unwrap();
    timer.play(0.0);
    drive(&mut timer, 0.0, 500.0, 50.0);
    assert_eq!(timer.progress(), 0.0);
    assert_eq!(timer.effective_progress(), 0.0);
    assert_eq!(count_completes(&timer.drain_events()), 0);
}

#[test]
fn pause_freezes_and_resume_reanchors() {
    let mut timer = AnimationTimer::new(10_000.0).unwrap();
    timer.play(0.0);
    timer.tick(0.0);
    timer.tick(100.0);
    assert_eq!(timer.state().current_time_ms, 100.0);

    timer.pause();
    assert_eq!(timer.phase(), PlaybackPhase::Paused);
    timer.tick(5000.0);
    assert_eq!(timer.state().current_time_ms, 100.0);

    timer.play(6000.0);
    timer.tick(6100.0);
    assert_eq!(timer.state().current_time_ms, 200.0);
}

#[test]
fn playing_a_completed_timer_restarts() {
    let mut timer = AnimationTimer::new(500.0).unwrap();
    timer.play(0.0);
    drive(&mut timer, 0.0, 600.0, 50.0);
    assert_eq!(timer.progress(), 1.0);

    timer.play(1000.0);
    assert_eq!(timer.progress(), 0.0);
    drive(&mut timer, 1000.0, 1600.0, 50.0);
    assert_eq!(count_completes(&timer.drain_events()), 2);
}

#[test]
fn speed_derived_durations_round_to_the_slider_step() {
    let mut timer = AnimationTimer::new(0.0).unwrap();
    timer.set_path_length(1000.0).unwrap();
    timer.set_speed_with_step(47.0, 5.0).unwrap();

    let state = timer.state();
    assert_eq!(state.base_speed_px_s, Some(45.0));
    assert!((state.duration_ms - 1000.0 / 45.0 * 1000.0).abs() < 1e-9);

    // Updated path length re-derives the duration at the same speed.
    timer.set_path_length(450.0).unwrap();
    assert!((timer.state().duration_ms - 10_000.0).abs() < 1e-9);

    let events = timer.drain_events();
    assert!(events.iter().any(|e| matches!(e, TimingEvent::SpeedChange { .. })));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, TimingEvent::DurationChange { .. }))
    );
}

#[test]
fn invalid_marks_are_rejected() {
    let mut timer = AnimationTimer::new(1000.0).unwrap();
    assert!(
        timer
            .set_pause_marks(vec![PauseMark {
                waypoint: 0,
                progress: 1.5,
                duration_ms: 100.0,
            }])
            .is_err()
    );
    assert!(
        timer
            .set_pause_marks(vec![PauseMark {
                waypoint: 0,
                progress: 0.5,
                duration_ms: f64::NAN,
            }])
            .is_err()
    );
}

#[test]
fn marks_collect_from_major_waypoints_only() {
    let waypoints = [
        Waypoint::major(0.0, 0.0),
        Waypoint::major(50.0, 0.0).with_pause(500.0),
        Waypoint::minor(75.0, 0.0).with_pause(999.0),
        Waypoint::major(100.0, 0.0).with_pause(250.0),
    ];
    let path = build_route_path(&waypoints, &PathConfig::default()).unwrap();
    let marks = PauseMark::collect(&waypoints, &path);

    assert_eq!(marks.len(), 2);
    assert_eq!(marks[0].waypoint, 1);
    assert!((marks[0].progress - 0.5).abs() < 0.05);
    assert_eq!(marks[0].duration_ms, 500.0);
    assert_eq!(marks[1].waypoint, 3);
    assert_eq!(marks[1].progress, 1.0);
}
