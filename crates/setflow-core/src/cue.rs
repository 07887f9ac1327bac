//! Feedback cues and the sink they are played on.
//!
//! A cue is a discrete feedback event (haptic pulse, audio tone,
//! notification). The engine fires cues into a [`CueSink`] as
//! fire-and-forget calls: no return value, no failure surfaced back. A
//! missed haptic is not an engine-level error.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Kind of feedback cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    /// A set (or next set) began.
    Start,
    /// A set was completed.
    Success,
    /// The session was stopped.
    Stop,
    /// The session was reset.
    Reset,
    /// Rest has lasted long enough to move on.
    Notification,
    /// Periodic "still running" pulse.
    PeriodicPulse,
    /// Periodic audio tick, gated on the audio toggle.
    AudioTick,
}

/// Device-level feedback capability.
///
/// Implementations map cue kinds to haptics, tones, or notifications.
pub trait CueSink: fmt::Debug + Send {
    fn play_cue(&self, kind: CueKind);
}

/// Sink that discards every cue. Default for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl CueSink for NullSink {
    fn play_cue(&self, _kind: CueKind) {}
}

/// Sink that records every cue played, for tests.
///
/// Clones share the same underlying log, so a test can hand one clone
/// to the engine and keep another for assertions.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    played: Arc<Mutex<Vec<CueKind>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All cues played so far, in order.
    pub fn played(&self) -> Vec<CueKind> {
        self.played.lock().expect("cue log poisoned").clone()
    }

    /// How many times `kind` has been played.
    pub fn count_of(&self, kind: CueKind) -> usize {
        self.played
            .lock()
            .expect("cue log poisoned")
            .iter()
            .filter(|k| **k == kind)
            .count()
    }

    pub fn clear(&self) {
        self.played.lock().expect("cue log poisoned").clear();
    }
}

impl CueSink for RecordingSink {
    fn play_cue(&self, kind: CueKind) {
        self.played.lock().expect("cue log poisoned").push(kind);
    }
}
