//! Workout engine implementation.
//!
//! The workout engine is a wall-clock-based state machine. It does not
//! use internal threads - the caller is responsible for calling
//! `tick()` periodically. The tick is only a wake-up signal: elapsed
//! time is always recomputed as `now - phase_started_at`, so a host
//! that suspends ticking (backgrounding) loses nothing; on resume the
//! engine reports time as if ticking never stopped.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Exercising <-> Resting
//!   ^          |             |
//!   +---- stop / reset ------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = WorkoutEngine::new();
//! engine.start_exercise();
//! // In a loop:
//! engine.tick(); // Returns CueFired events as offsets are crossed
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::cue::{CueKind, CueSink, NullSink};
use crate::events::Event;

/// Offset into a resting phase at which the one-shot rest cue fires.
pub const REST_CUE_MS: u64 = 90_000;
/// Period of the "still running" tactile pulse, both active phases.
pub const PULSE_PERIOD_MS: u64 = 30_000;
/// Period of the audio tick, gated on the audio toggle.
pub const AUDIO_PERIOD_MS: u64 = 60_000;

/// Current workout phase. Exactly one holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ready,
    Exercising,
    Resting,
}

/// Core workout engine.
///
/// Operates on wall-clock deltas -- no internal thread. The caller is
/// responsible for calling `tick()` periodically. Every operation is
/// total: an operation whose precondition is unmet is a silent no-op
/// returning `None`, never an error.
#[derive(Debug)]
pub struct WorkoutEngine {
    phase: Phase,
    /// Number of exercise phases started this session.
    current_set: u32,
    /// Epoch-ms instant the current phase began. `None` iff `Ready`.
    phase_started_at: Option<u64>,
    audio_enabled: bool,
    /// One-shot guard for the rest cue; reset on entry to `Resting`.
    rest_cue_fired: bool,
    /// Count of pulse boundaries already honoured this phase.
    pulse_periods_fired: u64,
    /// Count of audio boundaries already honoured this phase.
    audio_periods_fired: u64,
    clock: Arc<dyn Clock>,
    sink: Box<dyn CueSink>,
}

impl WorkoutEngine {
    /// Create an engine on the system clock with cues discarded.
    ///
    /// Starts in `Ready` with a zero set counter and audio enabled.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(SystemClock), Box::new(NullSink))
    }

    /// Create an engine with an explicit clock and feedback sink.
    pub fn with_parts(clock: Arc<dyn Clock>, sink: Box<dyn CueSink>) -> Self {
        Self {
            phase: Phase::Ready,
            current_set: 0,
            phase_started_at: None,
            audio_enabled: true,
            rest_cue_fired: false,
            pulse_periods_fired: 0,
            audio_periods_fired: 0,
            clock,
            sink,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Milliseconds into the current phase; `0` while `Ready`.
    ///
    /// Always derived from the clock, never from tick counting.
    pub fn elapsed_ms(&self) -> u64 {
        match self.phase_started_at {
            Some(started) => self.clock.now_ms().saturating_sub(started),
            None => 0,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            current_set: self.current_set,
            elapsed_ms: self.elapsed_ms(),
            audio_enabled: self.audio_enabled,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a set. No-op while already `Exercising`: the running
    /// phase clock and set counter are left untouched.
    pub fn start_exercise(&mut self) -> Option<Event> {
        if self.phase == Phase::Exercising {
            return None;
        }
        Some(self.enter_exercising())
    }

    /// Finish the current set and begin resting. No-op unless
    /// `Exercising`.
    pub fn complete_set(&mut self) -> Option<Event> {
        if self.phase != Phase::Exercising {
            return None;
        }
        self.phase = Phase::Resting;
        self.phase_started_at = Some(self.clock.now_ms());
        self.rest_cue_fired = false;
        self.clear_period_marks();
        self.sink.play_cue(CueKind::Success);
        Some(Event::SetCompleted {
            set: self.current_set,
            at: Utc::now(),
        })
    }

    /// Move straight from `Resting` into the next set, with no
    /// observable intermediate state. No-op unless `Resting`.
    pub fn start_next_set(&mut self) -> Option<Event> {
        if self.phase != Phase::Resting {
            return None;
        }
        Some(self.enter_exercising())
    }

    /// Return to `Ready` and zero the set counter.
    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Ready;
        self.current_set = 0;
        self.phase_started_at = None;
        self.clear_period_marks();
        self.sink.play_cue(CueKind::Reset);
        Some(Event::EngineReset { at: Utc::now() })
    }

    /// Return to `Ready`, preserving the set counter.
    pub fn stop(&mut self) -> Option<Event> {
        self.phase = Phase::Ready;
        self.phase_started_at = None;
        self.clear_period_marks();
        self.sink.play_cue(CueKind::Stop);
        Some(Event::Stopped {
            set: self.current_set,
            at: Utc::now(),
        })
    }

    /// Flip the audio toggle. Plays no cue.
    pub fn toggle_audio(&mut self) -> Option<Event> {
        self.set_audio_enabled(!self.audio_enabled)
    }

    /// Set the audio toggle directly.
    ///
    /// Enabling mid-phase re-anchors the audio schedule to the next
    /// 60-second boundary after the current elapsed time; boundaries
    /// that passed while audio was off are never fired retroactively.
    pub fn set_audio_enabled(&mut self, enabled: bool) -> Option<Event> {
        self.audio_enabled = enabled;
        if enabled {
            if let Some(started) = self.phase_started_at {
                let elapsed = self.clock.now_ms().saturating_sub(started);
                self.audio_periods_fired = elapsed / AUDIO_PERIOD_MS;
            }
        }
        Some(Event::AudioToggled {
            enabled: self.audio_enabled,
            at: Utc::now(),
        })
    }

    /// Call periodically. Snapshots `now` once, evaluates every cue
    /// schedule against that one elapsed value, plays whatever crossed
    /// its threshold and returns the matching `CueFired` events.
    ///
    /// Returns an empty vec while `Ready`. Thresholds are `>=`
    /// comparisons, so tick jitter can delay a cue but never drop or
    /// duplicate it. A tick that discovers several missed periodic
    /// boundaries fires once and jumps the mark to the current
    /// boundary; there is no catch-up burst.
    pub fn tick(&mut self) -> Vec<Event> {
        let Some(started) = self.phase_started_at else {
            return Vec::new();
        };
        let elapsed = self.clock.now_ms().saturating_sub(started);
        let mut fired = Vec::new();

        let pulse_periods = elapsed / PULSE_PERIOD_MS;
        if pulse_periods > self.pulse_periods_fired {
            self.pulse_periods_fired = pulse_periods;
            fired.push(self.fire(CueKind::PeriodicPulse, elapsed));
        }

        if self.audio_enabled {
            let audio_periods = elapsed / AUDIO_PERIOD_MS;
            if audio_periods > self.audio_periods_fired {
                self.audio_periods_fired = audio_periods;
                fired.push(self.fire(CueKind::AudioTick, elapsed));
            }
        }

        if self.phase == Phase::Resting && !self.rest_cue_fired && elapsed >= REST_CUE_MS {
            self.rest_cue_fired = true;
            fired.push(self.fire(CueKind::Notification, elapsed));
        }

        fired
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_exercising(&mut self) -> Event {
        self.phase = Phase::Exercising;
        self.current_set += 1;
        self.phase_started_at = Some(self.clock.now_ms());
        self.clear_period_marks();
        self.sink.play_cue(CueKind::Start);
        Event::SetStarted {
            set: self.current_set,
            at: Utc::now(),
        }
    }

    /// Forget all periodic-boundary bookkeeping. Called on every phase
    /// entry and exit so no cue from a previous phase can leak.
    fn clear_period_marks(&mut self) {
        self.pulse_periods_fired = 0;
        self.audio_periods_fired = 0;
    }

    fn fire(&self, kind: CueKind, elapsed_ms: u64) -> Event {
        self.sink.play_cue(kind);
        Event::CueFired {
            kind,
            elapsed_ms,
            at: Utc::now(),
        }
    }
}

impl Default for WorkoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::cue::RecordingSink;

    fn engine_with_clock() -> (WorkoutEngine, Arc<ManualClock>, RecordingSink) {
        let clock = Arc::new(ManualClock::new(0));
        let sink = RecordingSink::new();
        let engine = WorkoutEngine::with_parts(clock.clone(), Box::new(sink.clone()));
        (engine, clock, sink)
    }

    #[test]
    fn starts_ready_with_zero_sets() {
        let engine = WorkoutEngine::new();
        assert_eq!(engine.phase(), Phase::Ready);
        assert_eq!(engine.current_set(), 0);
        assert_eq!(engine.elapsed_ms(), 0);
        assert!(engine.audio_enabled());
    }

    #[test]
    fn start_complete_next_cycle() {
        let (mut engine, _clock, sink) = engine_with_clock();

        assert!(engine.start_exercise().is_some());
        assert_eq!(engine.phase(), Phase::Exercising);
        assert_eq!(engine.current_set(), 1);

        assert!(engine.complete_set().is_some());
        assert_eq!(engine.phase(), Phase::Resting);
        assert_eq!(engine.current_set(), 1);

        assert!(engine.start_next_set().is_some());
        assert_eq!(engine.phase(), Phase::Exercising);
        assert_eq!(engine.current_set(), 2);

        assert_eq!(
            sink.played(),
            vec![CueKind::Start, CueKind::Success, CueKind::Start]
        );
    }

    #[test]
    fn wrong_phase_operations_are_noops() {
        let (mut engine, _clock, _sink) = engine_with_clock();
        assert!(engine.complete_set().is_none());
        assert!(engine.start_next_set().is_none());

        engine.start_exercise();
        assert!(engine.start_next_set().is_none());
        assert_eq!(engine.phase(), Phase::Exercising);
    }

    #[test]
    fn start_while_exercising_is_guarded() {
        let (mut engine, clock, _sink) = engine_with_clock();
        engine.start_exercise();
        clock.advance_ms(4_000);

        assert!(engine.start_exercise().is_none());
        assert_eq!(engine.current_set(), 1);
        assert_eq!(engine.elapsed_ms(), 4_000);
    }

    #[test]
    fn stop_preserves_set_counter_reset_clears_it() {
        let (mut engine, _clock, _sink) = engine_with_clock();
        engine.start_exercise();
        engine.complete_set();
        engine.start_next_set();
        assert_eq!(engine.current_set(), 2);

        engine.stop();
        assert_eq!(engine.phase(), Phase::Ready);
        assert_eq!(engine.current_set(), 2);
        assert_eq!(engine.elapsed_ms(), 0);

        engine.start_exercise();
        engine.reset();
        assert_eq!(engine.phase(), Phase::Ready);
        assert_eq!(engine.current_set(), 0);
    }

    #[test]
    fn tick_in_ready_does_nothing() {
        let (mut engine, clock, sink) = engine_with_clock();
        clock.advance_ms(500_000);
        assert!(engine.tick().is_empty());
        assert!(sink.played().is_empty());
    }

    #[test]
    fn snapshot_reflects_state() {
        let (mut engine, clock, _sink) = engine_with_clock();
        engine.start_exercise();
        clock.advance_ms(12_345);
        match engine.snapshot() {
            Event::StateSnapshot {
                phase,
                current_set,
                elapsed_ms,
                audio_enabled,
                ..
            } => {
                assert_eq!(phase, Phase::Exercising);
                assert_eq!(current_set, 1);
                assert_eq!(elapsed_ms, 12_345);
                assert!(audio_enabled);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }
}
