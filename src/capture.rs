//! Frame export.
//!
//! [`FrameExporter`] runs one capture: it records the playback position and
//! state, moves to the target time, waits for the frame there, rasterizes it
//! at the video's native size, encodes it as PNG, hands it to an
//! [`ExportSink`], and then puts the position and state back. The restore
//! step runs whether or not the capture succeeded.
//!
//! The decoder sits behind the [`FrameSource`] trait;
//! [`MediaReference`](crate::MediaReference) is the FFmpeg implementation.

use std::{path::PathBuf, time::Duration};

use image::{DynamicImage, imageops::FilterType};

use crate::{
    configuration::CaptureOptions,
    error::CaptureError,
    export::{ExportSink, encode_png, png_data_uri},
    metadata::VideoMetadata,
    playback::{Playback, PlaybackPosition},
    progress::CaptureStage,
};

/// Something that can produce the frame shown at a given time.
pub trait FrameSource {
    /// Metadata of the video being decoded.
    fn metadata(&self) -> &VideoMetadata;

    /// Decode the frame on screen at `timestamp`.
    ///
    /// Implementations honour the seek timeout and cancellation token in
    /// `options` while waiting for the frame, and return it in
    /// `options.pixel_format()`.
    fn decode_frame_at(
        &mut self,
        timestamp: Duration,
        options: &CaptureOptions,
    ) -> Result<DynamicImage, CaptureError>;
}

/// Which time to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget {
    /// Time zero.
    First,
    /// The tracked current time.
    Current,
    /// The tracked duration.
    Last,
    /// An explicit time.
    At(Duration),
}

impl CaptureTarget {
    /// Resolve against the tracked position.
    ///
    /// # Errors
    ///
    /// [`CaptureError::InvalidTimestamp`] when an explicit time lies past a
    /// known duration.
    pub fn resolve(&self, position: &PlaybackPosition) -> Result<Duration, CaptureError> {
        match *self {
            CaptureTarget::First => Ok(Duration::ZERO),
            CaptureTarget::Current => Ok(position.current_time()),
            CaptureTarget::Last => Ok(position.duration()),
            CaptureTarget::At(time) => {
                if position.is_duration_known() && time > position.duration() {
                    Err(CaptureError::InvalidTimestamp(time))
                } else {
                    Ok(time)
                }
            }
        }
    }
}

/// File name for a frame captured at `timestamp`: `frame_at_<N>s.png` with
/// `N` the timestamp rounded to the nearest whole second, halves rounding up.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// assert_eq!(framegrab::frame_file_name(Duration::from_millis(3200)), "frame_at_3s.png");
/// assert_eq!(framegrab::frame_file_name(Duration::from_millis(2500)), "frame_at_3s.png");
/// ```
pub fn frame_file_name(timestamp: Duration) -> String {
    let seconds = (timestamp.as_secs_f64() + 0.5).floor() as u64;
    format!("frame_at_{seconds}s.png")
}

/// A rasterized, encoded frame.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Time the frame was captured at.
    pub timestamp: Duration,
    /// Generated export name.
    pub file_name: String,
    /// The rasterized frame at native resolution.
    pub image: DynamicImage,
    /// PNG encoding of `image`.
    pub png: Vec<u8>,
}

impl CapturedFrame {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The PNG as a `data:image/png;base64,` URI.
    pub fn data_uri(&self) -> String {
        png_data_uri(&self.png)
    }
}

/// Result of a completed capture.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    /// The exported frame.
    pub frame: CapturedFrame,
    /// Where the sink stored it.
    pub destination: PathBuf,
    /// Position after restoring; equal to the pre-capture position.
    pub restored_position: Duration,
    /// Whether the pre-capture play/pause state was re-established. `false`
    /// only when playback had to resume and could not.
    pub state_restored: bool,
}

/// Runs captures against a frame source, a playback state, and a sink.
pub struct FrameExporter<'a> {
    source: &'a mut dyn FrameSource,
    playback: &'a mut Playback,
    sink: &'a mut dyn ExportSink,
}

impl<'a> FrameExporter<'a> {
    /// Borrow the three collaborators for the duration of a capture.
    pub fn new(
        source: &'a mut dyn FrameSource,
        playback: &'a mut Playback,
        sink: &'a mut dyn ExportSink,
    ) -> Self {
        Self {
            source,
            playback,
            sink,
        }
    }

    /// Capture the frame at `timestamp`.
    ///
    /// # Errors
    ///
    /// Decoding, encoding and sink errors are returned after the playback
    /// position and state have been restored.
    pub fn capture(
        &mut self,
        timestamp: Duration,
        options: &CaptureOptions,
    ) -> Result<CaptureOutcome, CaptureError> {
        let snapshot = self.playback.snapshot();
        log::debug!(
            "Capturing {:.3}s (was at {:.3}s, {:?})",
            timestamp.as_secs_f64(),
            snapshot.current_time.as_secs_f64(),
            snapshot.state,
        );

        self.playback.pause();
        options.notify(CaptureStage::Seeking);
        self.playback.seek(timestamp);

        let exported = self.grab(timestamp, options);

        options.notify(CaptureStage::Restoring);
        let state_restored = self.playback.restore(snapshot);

        let (frame, destination) = exported?;
        Ok(CaptureOutcome {
            frame,
            destination,
            restored_position: self.playback.position().current_time(),
            state_restored,
        })
    }

    fn grab(
        &mut self,
        timestamp: Duration,
        options: &CaptureOptions,
    ) -> Result<(CapturedFrame, PathBuf), CaptureError> {
        let decoded = self.source.decode_frame_at(timestamp, options)?;
        let frame = finish_frame(decoded, timestamp, self.source.metadata(), options)?;

        options.notify(CaptureStage::Exporting);
        let destination = self.sink.export(&frame.file_name, &frame.png)?;
        Ok((frame, destination))
    }
}

/// Rasterize a decoded frame at native size and encode it.
pub(crate) fn finish_frame(
    decoded: DynamicImage,
    timestamp: Duration,
    metadata: &VideoMetadata,
    options: &CaptureOptions,
) -> Result<CapturedFrame, CaptureError> {
    options.notify(CaptureStage::Rasterizing);
    let image = rasterize(decoded, metadata, options);

    options.notify(CaptureStage::Encoding);
    let png = encode_png(&image)?;

    Ok(CapturedFrame {
        timestamp,
        file_name: frame_file_name(timestamp),
        image,
        png,
    })
}

/// Draw `decoded` onto a surface of the video's native size in the
/// configured pixel format.
fn rasterize(decoded: DynamicImage, metadata: &VideoMetadata, options: &CaptureOptions) -> DynamicImage {
    let (width, height) = (metadata.width, metadata.height);
    let sized = if decoded.width() == width && decoded.height() == height {
        decoded
    } else {
        log::debug!(
            "Scaling decoded {}x{} frame to {width}x{height}",
            decoded.width(),
            decoded.height()
        );
        decoded.resize_exact(width, height, FilterType::Triangle)
    };
    options.pixel_format().convert(sized)
}
