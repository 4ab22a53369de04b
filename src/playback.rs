//! Playback position tracking.
//!
//! [`PlaybackPosition`] mirrors the current time and duration reported by
//! whatever is playing the video. [`Playback`] pairs it with the play/pause
//! [`PlaybackState`] and is the only place either is mutated.

use std::time::Duration;

use crate::error::CaptureError;

/// Current time and total duration of the loaded media.
///
/// A zero duration means "not known yet". Once the duration is known,
/// `current_time <= duration` holds after every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackPosition {
    current_time: Duration,
    duration: Duration,
}

impl PlaybackPosition {
    /// A position at zero with unknown duration.
    pub const fn new() -> Self {
        Self {
            current_time: Duration::ZERO,
            duration: Duration::ZERO,
        }
    }

    /// Current playback time.
    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    /// Total duration, `Duration::ZERO` while unknown.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the duration has been reported.
    pub fn is_duration_known(&self) -> bool {
        !self.duration.is_zero()
    }

    /// Set the duration, pulling the current time back into range.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.set_duration(duration);
        self
    }

    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
        self.current_time = self.clamp(self.current_time);
    }

    /// Set the current time, clamped to the duration once it is known.
    pub fn set_current_time(&mut self, time: Duration) {
        self.current_time = self.clamp(time);
    }

    fn clamp(&self, time: Duration) -> Duration {
        if self.is_duration_known() {
            time.min(self.duration)
        } else {
            time
        }
    }
}

/// Whether the media is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not advancing. This is the state after loading.
    #[default]
    Paused,
    /// Advancing; the host reports progress through time updates.
    Playing,
}

/// What a capture records before moving the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    /// Position to return to.
    pub current_time: Duration,
    /// State to return to.
    pub state: PlaybackState,
}

/// Position plus play/pause state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Playback {
    position: PlaybackPosition,
    state: PlaybackState,
}

impl Playback {
    /// Paused at zero with unknown duration.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tracked position.
    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    /// The play/pause state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Mirror a time-progress report.
    pub fn on_time_update(&mut self, time: Duration) {
        self.position.set_current_time(time);
    }

    /// Mirror a metadata-loaded report.
    pub fn on_loaded_metadata(&mut self, duration: Duration) {
        self.position.set_duration(duration);
    }

    /// Move the position directly.
    pub fn seek(&mut self, time: Duration) {
        self.position.set_current_time(time);
    }

    /// Start playing.
    ///
    /// # Errors
    ///
    /// [`CaptureError::PlaybackEnded`] when the duration is known and the
    /// position already sits at the end.
    pub fn play(&mut self) -> Result<(), CaptureError> {
        if self.position.is_duration_known()
            && self.position.current_time() >= self.position.duration()
        {
            return Err(CaptureError::PlaybackEnded);
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Stop playing.
    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Record the current position and state.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_time: self.position.current_time(),
            state: self.state,
        }
    }

    /// Return to `snapshot`. Resumes playback when it was playing.
    ///
    /// Returns whether playback is in the recorded state afterwards. A
    /// failed resume is logged and otherwise ignored.
    pub fn restore(&mut self, snapshot: PlaybackSnapshot) -> bool {
        self.position.set_current_time(snapshot.current_time);
        match snapshot.state {
            PlaybackState::Paused => {
                self.pause();
                true
            }
            PlaybackState::Playing => match self.play() {
                Ok(()) => true,
                Err(error) => {
                    log::warn!("Could not resume playback after capture: {error}");
                    false
                }
            },
        }
    }

    /// Back to paused at zero with unknown duration.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
