//! Playback of step sequences against a visual element set.
//!
//! - `speed` - slider-to-delay mapping
//! - `engine` - the cursor/counter state machine and its timed drivers

pub mod engine;
pub mod speed;

pub use engine::{Advance, Counters, PauseSignal, Playback, PlaybackState, RunOutcome};
pub use speed::Speed;
