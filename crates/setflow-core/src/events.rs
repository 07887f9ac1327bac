use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cue::CueKind;
use crate::timer::Phase;

/// Every observable state change in the engine produces an Event.
/// The presentation layer renders from these; mutating operations
/// return them and `tick()` yields one per cue fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SetStarted {
        set: u32,
        at: DateTime<Utc>,
    },
    SetCompleted {
        set: u32,
        at: DateTime<Utc>,
    },
    /// Session stopped; the set counter is preserved.
    Stopped {
        set: u32,
        at: DateTime<Utc>,
    },
    /// Session reset; the set counter returns to zero.
    EngineReset {
        at: DateTime<Utc>,
    },
    AudioToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
    /// A scheduled cue fired at the given offset into the phase.
    CueFired {
        kind: CueKind,
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        current_set: u32,
        elapsed_ms: u64,
        audio_enabled: bool,
        at: DateTime<Utc>,
    },
}
