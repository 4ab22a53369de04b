//! Error types for the `framegrab` crate.
//!
//! [`CaptureError`] is returned by every fallible operation: loading a file,
//! decoding a frame, encoding the PNG, and handing it to an export sink.
//! Its `Display` text is meant to be shown to the user as-is.

use std::{io::Error as IoError, path::PathBuf, time::Duration};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framegrab` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CaptureError {
    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the loader.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The supplied file does not declare a `video/*` media type.
    #[error("{path} is not a video file (declared type {media_type})")]
    NotAVideo {
        /// Path of the rejected file.
        path: PathBuf,
        /// The declared MIME type.
        media_type: String,
    },

    /// A drop event carried no files.
    #[error("No file was dropped")]
    EmptyDrop,

    /// The file opened but contains no video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// An operation needs loaded media but none is loaded.
    #[error("No video is loaded")]
    NoMediaLoaded,

    /// Playback cannot start because the position is at the end.
    #[error("Cannot play: already at the end of the video")]
    PlaybackEnded,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The requested capture time is not a usable timestamp.
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(Duration),

    /// The seek to the capture target did not settle in time.
    #[error("Seek to {target:?} did not complete within {timeout:?}")]
    SeekTimeout {
        /// The capture target.
        target: Duration,
        /// The configured bound.
        timeout: Duration,
    },

    /// The capture was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Capture cancelled")]
    Cancelled,

    /// The export destination already exists and overwriting is disabled.
    #[error("Output already exists: {0} (enable overwrite to replace it)")]
    OutputExists(PathBuf),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while writing the exported image.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while building or encoding the frame.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for CaptureError {
    fn from(error: FfmpegError) -> Self {
        CaptureError::FfmpegError(error.to_string())
    }
}
