//! # Setflow Core Library
//!
//! Core business logic for Setflow, an interval timer for structured
//! exercise. A session alternates between timed "exercising" and
//! "resting" phases while a set counter climbs, and the engine emits
//! feedback cues (haptic/audio) at fixed offsets into each phase.
//!
//! ## Architecture
//!
//! - **Workout Engine**: A wall-clock-based state machine that requires
//!   the caller to periodically invoke `tick()` for cue evaluation. The
//!   tick is only a wake-up signal; elapsed time is always derived from
//!   the clock, so suspended ticking never loses time.
//! - **Cues**: Device feedback lives behind the narrow [`CueSink`]
//!   trait, so the engine has zero platform dependency.
//! - **Clock**: Wall time lives behind [`Clock`], so tests drive
//!   simulated time through [`ManualClock`].
//!
//! ## Key Components
//!
//! - [`WorkoutEngine`]: Core workout state machine
//! - [`Event`]: Observable state-change events for the presentation layer
//! - [`Config`]: Session start-up configuration

pub mod clock;
pub mod config;
pub mod cue;
pub mod error;
pub mod events;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use cue::{CueKind, CueSink, NullSink, RecordingSink};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use timer::{Phase, WorkoutEngine};
