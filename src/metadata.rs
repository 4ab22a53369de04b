//! Video metadata.
//!
//! [`VideoMetadata`] is read once when a [`MediaReference`](crate::MediaReference)
//! is opened and cached for its lifetime.

use std::time::Duration;

/// Metadata for the video stream of a loaded file.
///
/// # Example
///
/// ```no_run
/// use framegrab::{MediaLoader, MediaSource};
///
/// let media = MediaLoader::new().load(MediaSource::Picked("input.mp4".into())).unwrap();
/// let metadata = media.metadata();
/// println!("{}x{} over {:?}", metadata.width, metadata.height, metadata.duration);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Native frame width in pixels.
    pub width: u32,
    /// Native frame height in pixels.
    pub height: u32,
    /// Frames per second (approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Container duration. `Duration::ZERO` when the container does not say.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format: String,
}

impl VideoMetadata {
    /// Duration of a single frame, if the frame rate is known.
    pub fn frame_interval(&self) -> Option<Duration> {
        if self.frames_per_second > 0.0 && self.frames_per_second.is_finite() {
            Duration::try_from_secs_f64(1.0 / self.frames_per_second).ok()
        } else {
            None
        }
    }
}
