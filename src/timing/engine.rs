use crate::foundation::error::{WaylineError, WaylineResult};
use crate::route::model::{RoutePath, Waypoint};

/// Largest real-time delta a single tick may contribute, absorbing
/// tab-suspend/resume jumps in the driving scheduler.
pub const MAX_TICK_DELTA_MS: f64 = 100.0;

/// Default slider resolution used by [`AnimationTimer::set_speed`].
const DEFAULT_SPEED_STEP_PX_S: f64 = 5.0;

/// Playback phase of the timing state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum PlaybackPhase {
    /// Clock reset; nothing advances.
    Stopped,
    /// Clock advances on every scheduled tick.
    Playing,
    /// User-initiated pause (also the terminal state after completion).
    Paused,
    /// Path-initiated hold at a waypoint carrying a pause directive.
    Waiting,
}

/// Notification emitted by timer transitions, drained by the caller.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum TimingEvent {
    /// Playback started or resumed.
    Play,
    /// Playback paused by the user.
    Pause,
    /// Playback stopped and reset.
    Stop,
    /// Position was set directly.
    Seek {
        /// Progress after the seek.
        progress: f64,
    },
    /// Total duration changed (progress fraction preserved).
    DurationChange {
        /// New duration in milliseconds.
        duration_ms: f64,
    },
    /// Base speed or playback multiplier changed.
    SpeedChange {
        /// Step-rounded base speed in px/s, when duration is speed-derived.
        base_speed_px_s: Option<f64>,
        /// Current playback speed multiplier.
        multiplier: f64,
    },
    /// A waypoint wait began.
    WaitStart {
        /// Index of the pausing waypoint.
        waypoint: usize,
    },
    /// A waypoint wait ended and playback resumed.
    WaitEnd {
        /// Index of the pausing waypoint.
        waypoint: usize,
    },
    /// Playback reached the end of the timeline.
    Complete,
}

/// A pause directive anchored to a progress position on the path.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PauseMark {
    /// Index of the waypoint carrying the pause.
    pub waypoint: usize,
    /// Progress at which the waypoint is reached.
    pub progress: f64,
    /// How long playback holds there, in milliseconds.
    pub duration_ms: f64,
}

impl PauseMark {
    /// Read the pause directives off a waypoint list, anchoring each to the
    /// progress position where its waypoint is reached on `path`.
    ///
    /// Only major waypoints with a positive pause produce marks; a pause on
    /// the final waypoint anchors to progress 1.
    pub fn collect(waypoints: &[Waypoint], path: &RoutePath) -> Vec<PauseMark> {
        if path.len() < 2 {
            return Vec::new();
        }
        let denom = (path.len() - 1) as f64;
        waypoints
            .iter()
            .enumerate()
            .filter_map(|(i, wp)| {
                if !wp.is_major {
                    return None;
                }
                let pause = wp.pause_ms.filter(|&p| p > 0.0)?;
                // First final point belonging to the segment starting at
                // waypoint `i`; past the last segment this is the path end.
                let idx = path
                    .points
                    .partition_point(|p| p.segment_index < i)
                    .min(path.len() - 1);
                Some(PauseMark {
                    waypoint: i,
                    progress: idx as f64 / denom,
                    duration_ms: pause,
                })
            })
            .collect()
    }
}

/// Point-in-time snapshot of the timer, for UI panels and frame recorders.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct TimingState {
    /// Clock position in milliseconds.
    pub current_time_ms: f64,
    /// Total duration in milliseconds.
    pub duration_ms: f64,
    /// Live ratio `current_time / duration`, 0 when duration is 0.
    pub progress: f64,
    /// Progress consumers should render; frozen during a waypoint wait.
    pub effective_progress: f64,
    /// `true` while in [`PlaybackPhase::Playing`].
    pub is_playing: bool,
    /// `true` while in [`PlaybackPhase::Paused`].
    pub is_paused: bool,
    /// `true` while in [`PlaybackPhase::Waiting`].
    pub is_waiting_at_waypoint: bool,
    /// Waypoint currently waited at, if any.
    pub pause_waypoint_index: Option<usize>,
    /// Progress frozen for the duration of the active wait, if any.
    pub waypoint_progress_snapshot: Option<f64>,
    /// Playback speed multiplier.
    pub speed_multiplier: f64,
    /// Step-rounded base speed in px/s, when duration is speed-derived.
    pub base_speed_px_s: Option<f64>,
}

/// The animation timing engine.
///
/// A state machine over a progress clock, driven by scheduled ticks.
/// It knows the path only through its total length and pause marks; how the
/// resulting progress is drawn is entirely the consumers' concern. All
/// transitions happen through these methods on one logical thread.
#[derive(Debug)]
pub struct AnimationTimer {
    phase: PlaybackPhase,
    current_ms: f64,
    duration_ms: f64,
    speed_multiplier: f64,
    base_speed_px_s: Option<f64>,
    path_length: f64,
    last_tick_ms: Option<f64>,
    marks: Vec<PauseMark>,
    fired: Vec<bool>,
    waiting_mark: Option<usize>,
    wait_snapshot: f64,
    wait_until_ms: f64,
    completed: bool,
    events: Vec<TimingEvent>,
}

impl AnimationTimer {
    /// Create a stopped timer with a fixed duration in milliseconds.
    pub fn new(duration_ms: f64) -> WaylineResult<Self> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(WaylineError::timing("duration must be finite and >= 0"));
        }
        Ok(Self {
            phase: PlaybackPhase::Stopped,
            current_ms: 0.0,
            duration_ms,
            speed_multiplier: 1.0,
            base_speed_px_s: None,
            path_length: 0.0,
            last_tick_ms: None,
            marks: Vec::new(),
            fired: Vec::new(),
            waiting_mark: None,
            wait_snapshot: 0.0,
            wait_until_ms: 0.0,
            completed: false,
            events: Vec::new(),
        })
    }

    /// Current playback phase.
    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Live progress ratio in `[0, 1]`; 0 when duration is 0.
    pub fn progress(&self) -> f64 {
        if self.duration_ms > 0.0 {
            (self.current_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Progress that consumers must render.
    ///
    /// While waiting at a waypoint this is the frozen snapshot, not the live
    /// ratio, so the rendered marker cannot creep during the hold.
    pub fn effective_progress(&self) -> f64 {
        if self.phase == PlaybackPhase::Waiting {
            self.wait_snapshot
        } else {
            self.progress()
        }
    }

    /// Replace the pause directives. Marks re-arm from scratch; an active
    /// wait is abandoned.
    pub fn set_pause_marks(&mut self, mut marks: Vec<PauseMark>) -> WaylineResult<()> {
        for m in &marks {
            if !m.progress.is_finite() || !(0.0..=1.0).contains(&m.progress) {
                return Err(WaylineError::timing("pause mark progress must be in [0, 1]"));
            }
            if !m.duration_ms.is_finite() || m.duration_ms < 0.0 {
                return Err(WaylineError::timing(
                    "pause mark duration must be finite and >= 0",
                ));
            }
        }
        marks.sort_by(|a, b| a.progress.total_cmp(&b.progress));
        self.fired = vec![false; marks.len()];
        self.marks = marks;
        if self.phase == PlaybackPhase::Waiting {
            self.waiting_mark = None;
            self.phase = PlaybackPhase::Playing;
            self.last_tick_ms = None;
        }
        Ok(())
    }

    /// Start or resume playback, recording `now_ms` as the tick reference.
    ///
    /// Playing a completed timer restarts from zero.
    pub fn play(&mut self, now_ms: f64) {
        if self.phase == PlaybackPhase::Playing {
            return;
        }
        if self.completed && self.progress() >= 1.0 {
            self.current_ms = 0.0;
            self.completed = false;
            self.rearm_marks(0.0);
        }
        self.phase = PlaybackPhase::Playing;
        self.last_tick_ms = Some(now_ms);
        tracing::debug!(now_ms, "playback started");
        self.events.push(TimingEvent::Play);
    }

    /// Pause playback, freezing the clock. A pending waypoint wait is
    /// abandoned (its mark stays fired).
    pub fn pause(&mut self) {
        if self.phase != PlaybackPhase::Playing && self.phase != PlaybackPhase::Waiting {
            return;
        }
        self.waiting_mark = None;
        self.phase = PlaybackPhase::Paused;
        tracing::debug!(current_ms = self.current_ms, "playback paused");
        self.events.push(TimingEvent::Pause);
    }

    /// Stop playback and reset the clock to zero. All marks re-arm.
    pub fn stop(&mut self) {
        self.phase = PlaybackPhase::Stopped;
        self.current_ms = 0.0;
        self.last_tick_ms = None;
        self.waiting_mark = None;
        self.completed = false;
        self.rearm_marks(-1.0);
        tracing::debug!("playback stopped");
        self.events.push(TimingEvent::Stop);
    }

    /// Advance the state machine for one scheduled tick at `now_ms`.
    ///
    /// While playing, the elapsed real time since the previous tick is
    /// clamped to [`MAX_TICK_DELTA_MS`], scaled by the speed multiplier, and
    /// added to the clock. Reaching an armed pause mark enters the waiting
    /// phase; reaching the duration completes playback.
    pub fn tick(&mut self, now_ms: f64) {
        if !now_ms.is_finite() {
            return;
        }
        match self.phase {
            PlaybackPhase::Stopped | PlaybackPhase::Paused => {}
            PlaybackPhase::Waiting => {
                if now_ms >= self.wait_until_ms {
                    let waypoint = self
                        .waiting_mark
                        .take()
                        .map(|i| self.marks[i].waypoint)
                        .unwrap_or_default();
                    self.phase = PlaybackPhase::Playing;
                    // Re-anchor so the held interval never reaches the clock.
                    self.last_tick_ms = Some(now_ms);
                    tracing::debug!(waypoint, "waypoint wait ended");
                    self.events.push(TimingEvent::WaitEnd { waypoint });
                }
            }
            PlaybackPhase::Playing => {
                let last = self.last_tick_ms.unwrap_or(now_ms);
                let delta = (now_ms - last).clamp(0.0, MAX_TICK_DELTA_MS) * self.speed_multiplier;
                self.last_tick_ms = Some(now_ms);
                self.current_ms += delta;

                if self.enter_due_wait(now_ms) {
                    return;
                }
                if self.duration_ms > 0.0 && self.current_ms >= self.duration_ms {
                    self.current_ms = self.duration_ms;
                    self.phase = PlaybackPhase::Paused;
                    if !self.completed {
                        self.completed = true;
                        tracing::debug!("playback complete");
                        self.events.push(TimingEvent::Complete);
                    }
                }
            }
        }
    }

    /// Set the clock position directly, clamped to `[0, duration]`.
    pub fn seek_ms(&mut self, time_ms: f64) -> WaylineResult<()> {
        if !time_ms.is_finite() {
            return Err(WaylineError::timing("seek time must be finite"));
        }
        self.apply_seek(time_ms.clamp(0.0, self.duration_ms));
        Ok(())
    }

    /// Set the progress fraction directly, clamped to `[0, 1]`.
    pub fn seek_progress(&mut self, progress: f64) -> WaylineResult<()> {
        if !progress.is_finite() {
            return Err(WaylineError::timing("seek progress must be finite"));
        }
        self.apply_seek(progress.clamp(0.0, 1.0) * self.duration_ms);
        Ok(())
    }

    fn apply_seek(&mut self, time_ms: f64) {
        if self.phase == PlaybackPhase::Waiting {
            self.waiting_mark = None;
            self.phase = PlaybackPhase::Playing;
            self.last_tick_ms = None;
        }
        self.current_ms = time_ms;
        self.completed = false;
        let progress = self.progress();
        self.rearm_marks(progress);
        tracing::debug!(time_ms, progress, "seek");
        self.events.push(TimingEvent::Seek { progress });
    }

    /// Change the duration, preserving the current progress *fraction* so a
    /// scrub position survives path-length or speed changes.
    pub fn set_duration(&mut self, duration_ms: f64) -> WaylineResult<()> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(WaylineError::timing("duration must be finite and >= 0"));
        }
        let progress = self.progress();
        self.duration_ms = duration_ms;
        self.current_ms = progress * duration_ms;
        self.events.push(TimingEvent::DurationChange { duration_ms });
        Ok(())
    }

    /// Record the path length used to derive durations from a base speed.
    pub fn set_path_length(&mut self, length: f64) -> WaylineResult<()> {
        if !length.is_finite() || length < 0.0 {
            return Err(WaylineError::timing("path length must be finite and >= 0"));
        }
        self.path_length = length;
        if let Some(speed) = self.base_speed_px_s {
            self.set_duration(duration_from_speed(self.path_length, speed))?;
        }
        Ok(())
    }

    /// Set the base speed in px/s with the default slider step.
    pub fn set_speed(&mut self, px_per_sec: f64) -> WaylineResult<()> {
        self.set_speed_with_step(px_per_sec, DEFAULT_SPEED_STEP_PX_S)
    }

    /// Set the base speed in px/s, rounded to `step` (the UI slider
    /// resolution) to avoid floating jitter, and re-derive the duration from
    /// the recorded path length.
    pub fn set_speed_with_step(&mut self, px_per_sec: f64, step: f64) -> WaylineResult<()> {
        if !px_per_sec.is_finite() || px_per_sec <= 0.0 {
            return Err(WaylineError::timing("speed must be finite and > 0"));
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(WaylineError::timing("speed step must be finite and > 0"));
        }
        let rounded = ((px_per_sec / step).round() * step).max(step);
        self.base_speed_px_s = Some(rounded);
        if self.path_length > 0.0 {
            self.set_duration(duration_from_speed(self.path_length, rounded))?;
        }
        self.events.push(TimingEvent::SpeedChange {
            base_speed_px_s: Some(rounded),
            multiplier: self.speed_multiplier,
        });
        Ok(())
    }

    /// Set the playback speed multiplier applied to every tick delta.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) -> WaylineResult<()> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(WaylineError::timing(
                "speed multiplier must be finite and > 0",
            ));
        }
        self.speed_multiplier = multiplier;
        self.events.push(TimingEvent::SpeedChange {
            base_speed_px_s: self.base_speed_px_s,
            multiplier,
        });
        Ok(())
    }

    /// Snapshot the timer for UI panels and frame recorders.
    pub fn state(&self) -> TimingState {
        let waiting = self.phase == PlaybackPhase::Waiting;
        TimingState {
            current_time_ms: self.current_ms,
            duration_ms: self.duration_ms,
            progress: self.progress(),
            effective_progress: self.effective_progress(),
            is_playing: self.phase == PlaybackPhase::Playing,
            is_paused: self.phase == PlaybackPhase::Paused,
            is_waiting_at_waypoint: waiting,
            pause_waypoint_index: self.waiting_mark.map(|i| self.marks[i].waypoint),
            waypoint_progress_snapshot: waiting.then_some(self.wait_snapshot),
            speed_multiplier: self.speed_multiplier,
            base_speed_px_s: self.base_speed_px_s,
        }
    }

    /// Take all events queued since the previous drain, in order.
    pub fn drain_events(&mut self) -> Vec<TimingEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter the waiting phase when an armed mark has been reached.
    fn enter_due_wait(&mut self, now_ms: f64) -> bool {
        let live = self.progress();
        let due = self
            .marks
            .iter()
            .enumerate()
            .find(|(i, m)| !self.fired[*i] && live >= m.progress);
        let Some((idx, mark)) = due else {
            return false;
        };
        let mark = *mark;
        self.fired[idx] = true;
        if mark.duration_ms <= 0.0 {
            return false;
        }
        self.wait_snapshot = live;
        self.wait_until_ms = now_ms + mark.duration_ms;
        self.waiting_mark = Some(idx);
        self.phase = PlaybackPhase::Waiting;
        tracing::debug!(
            waypoint = mark.waypoint,
            duration_ms = mark.duration_ms,
            "waypoint wait started"
        );
        self.events.push(TimingEvent::WaitStart {
            waypoint: mark.waypoint,
        });
        true
    }

    /// Re-arm marks past `progress`; marks at or before it stay fired so
    /// seeking over them does not trigger a wait.
    fn rearm_marks(&mut self, progress: f64) {
        for (i, m) in self.marks.iter().enumerate() {
            self.fired[i] = m.progress <= progress;
        }
    }
}

/// Duration of a path of `length` units traveled at `px_per_sec`.
fn duration_from_speed(length: f64, px_per_sec: f64) -> f64 {
    length / px_per_sec * 1000.0
}

#[cfg(test)]
#[path = "../../tests/unit/timing/engine.rs"]
mod tests;
