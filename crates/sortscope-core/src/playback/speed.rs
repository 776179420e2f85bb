//! Animation speed: the slider value the user controls and the per-step
//! delay it maps to.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lowest slider value (slowest playback).
pub const MIN_SLIDER: u32 = 10;
/// Highest slider value (fastest playback).
pub const MAX_SLIDER: u32 = 500;
/// Delay at the slowest setting.
pub const MAX_DELAY_MS: u64 = 500;

/// Map a slider value to a per-step delay.
///
/// Linear and inverted: every slider unit above the minimum takes one
/// millisecond off the slowest delay.
#[inline]
pub fn delay_for_slider(slider: u32) -> Duration {
    let offset = slider.saturating_sub(MIN_SLIDER) as u64;
    Duration::from_millis(MAX_DELAY_MS.saturating_sub(offset))
}

/// Slider position, kept inside `[MIN_SLIDER, MAX_SLIDER]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Speed(u32);

impl Speed {
    pub fn from_slider(slider: u32) -> Self {
        Self(slider.clamp(MIN_SLIDER, MAX_SLIDER))
    }

    pub fn slider(&self) -> u32 {
        self.0
    }

    pub fn delay(&self) -> Duration {
        delay_for_slider(self.0)
    }

    pub fn faster(&self, amount: u32) -> Self {
        Self::from_slider(self.0.saturating_add(amount))
    }

    pub fn slower(&self, amount: u32) -> Self {
        Self::from_slider(self.0.saturating_sub(amount))
    }
}

impl Default for Speed {
    fn default() -> Self {
        // 50ms per step
        Self(460)
    }
}
