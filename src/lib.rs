//! # framegrab
//!
//! Load a local video, scrub to a point in time, and export the frame shown
//! there as a PNG.
//!
//! The crate is built around [`FrameCaptureWidget`], a state container that
//! holds at most one loaded video ([`MediaReference`]), the tracked
//! [`PlaybackPosition`] and play/pause state, and an [`ExportSink`] that
//! receives exported images. Decoding goes through FFmpeg via
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next); rasterized frames are
//! [`image::DynamicImage`] values encoded with the `image` crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framegrab::{CaptureOptions, CaptureTarget, FrameCaptureWidget, MediaSource};
//!
//! let mut widget = FrameCaptureWidget::in_directory("frames");
//! widget.load(MediaSource::Picked("input.mp4".into()))?;
//!
//! // First frame, current frame, last frame.
//! let options = CaptureOptions::new();
//! widget.capture(CaptureTarget::First, &options)?;
//! widget.scrub(3.2)?;
//! widget.capture(CaptureTarget::Current, &options)?;
//! widget.capture(CaptureTarget::Last, &options)?;
//! # Ok::<(), framegrab::CaptureError>(())
//! ```
//!
//! ## Capture sequence
//!
//! 1. Record the position and play/pause state.
//! 2. Seek to the target.
//! 3. Decode until the frame on screen at the target is known, bounded by a
//!    timeout and a [`CancellationToken`].
//! 4. Rasterize at the native width and height.
//! 5. Encode as PNG.
//! 6. Export as `frame_at_<N>s.png` (`N` = target rounded to whole seconds).
//! 7. Restore the recorded position and resume playback if it was playing.
//!
//! Step 7 also runs when an earlier step fails.
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | `capture_async` and [`CaptureFuture`] via Tokio |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on the system.

pub mod capture;
pub mod configuration;
mod conversion;
pub mod error;
pub mod export;
pub mod ffmpeg;
pub mod loader;
pub mod media;
pub mod media_type;
pub mod metadata;
pub mod playback;
pub mod progress;
pub mod scrubber;
#[cfg(feature = "async")]
pub mod stream;
pub mod widget;

pub use capture::{
    CaptureOutcome, CaptureTarget, CapturedFrame, FrameExporter, FrameSource, frame_file_name,
};
pub use configuration::{CaptureOptions, DEFAULT_SEEK_TIMEOUT, PixelFormat};
pub use error::CaptureError;
pub use export::{DirectorySink, ExportSink, MemorySink, encode_png, png_data_uri};
pub use ffmpeg::{FfmpegLogLevel, get_ffmpeg_log_level, set_ffmpeg_log_level};
pub use loader::{MediaLoader, MediaSource};
pub use media::{MediaId, MediaReference};
pub use media_type::MediaType;
pub use metadata::VideoMetadata;
pub use playback::{Playback, PlaybackPosition, PlaybackSnapshot, PlaybackState};
pub use progress::{CancellationToken, CaptureObserver, CaptureStage};
pub use scrubber::Scrubber;
#[cfg(feature = "async")]
pub use stream::{CaptureFuture, capture_frame_async};
pub use widget::FrameCaptureWidget;
