//! The position slider.
//!
//! A [`Scrubber`] describes a continuous range control over `[0, duration]`
//! with a 0.01 s step, and maps raw slider input to a playback time.

use std::time::Duration;

/// Slider granularity in seconds.
pub const SCRUB_STEP_SECONDS: f64 = 0.01;

/// Range control bounded by the media duration.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use framegrab::Scrubber;
///
/// let scrubber = Scrubber::new(Duration::from_secs(10));
/// assert_eq!(scrubber.value_for(3.204), Duration::from_millis(3200));
/// assert_eq!(scrubber.value_for(42.0), Duration::from_secs(10));
/// assert_eq!(scrubber.value_for(-1.0), Duration::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scrubber {
    max: Duration,
}

impl Scrubber {
    /// A scrubber over `[0, duration]`.
    pub fn new(duration: Duration) -> Self {
        Self { max: duration }
    }

    /// Lower bound, always zero.
    pub fn min(&self) -> Duration {
        Duration::ZERO
    }

    /// Upper bound: the media duration.
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Step between slider values.
    pub fn step(&self) -> Duration {
        Duration::from_secs_f64(SCRUB_STEP_SECONDS)
    }

    /// Map a raw slider value in seconds to a playback time.
    ///
    /// Non-finite and negative input maps to zero, input past the end maps
    /// to the end, anything else snaps to the nearest step.
    pub fn value_for(&self, seconds: f64) -> Duration {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        let max_seconds = self.max.as_secs_f64();
        if seconds >= max_seconds {
            return self.max;
        }
        // Whole hundredths keep the value free of float drift.
        let steps = (seconds / SCRUB_STEP_SECONDS).round() as u64;
        Duration::from_millis(steps * 10).min(self.max)
    }
}
