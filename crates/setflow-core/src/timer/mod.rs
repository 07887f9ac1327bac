mod engine;

pub use engine::{Phase, WorkoutEngine, AUDIO_PERIOD_MS, PULSE_PERIOD_MS, REST_CUE_MS};
