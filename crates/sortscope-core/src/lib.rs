pub mod advisor;
pub mod bars;
pub mod config;
pub mod error;
pub mod playback;
pub mod producers;
pub mod session;
pub mod steps;

pub use bars::{BarSet, Tag, VisualElements};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use playback::{Advance, Counters, Playback, PlaybackState, RunOutcome, Speed};
pub use producers::Algorithm;
pub use session::Session;
pub use steps::Step;
