//! The loaded video: [`MediaReference`].
//!
//! A `MediaReference` owns the FFmpeg demuxer for one local file together
//! with the cached [`VideoMetadata`]. It is created by the
//! [`MediaLoader`](crate::MediaLoader) and released when dropped, which is
//! what happens when the widget loads a replacement or is torn down.

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    mem,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::context::Input,
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::DynamicImage;

use crate::{
    capture::FrameSource,
    configuration::CaptureOptions,
    conversion::{duration_to_seek_timestamp, frame_to_buffer, pts_to_seconds, start_to_micros},
    error::CaptureError,
    metadata::VideoMetadata,
};

/// Frames presented this close after the target still count as on screen.
const PTS_TOLERANCE_SECONDS: f64 = 0.0005;

static NEXT_MEDIA_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`MediaReference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(u64);

impl MediaId {
    fn next() -> Self {
        Self(NEXT_MEDIA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for MediaId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "media#{}", self.0)
    }
}

/// Handle to a loaded, playable video.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use framegrab::{CaptureOptions, FrameSource, MediaLoader, MediaSource};
///
/// let mut media = MediaLoader::new().load(MediaSource::Picked("input.mp4".into()))?;
/// let frame = media.decode_frame_at(Duration::from_secs(1), &CaptureOptions::new())?;
/// assert_eq!(frame.width(), media.metadata().width);
/// # Ok::<(), framegrab::CaptureError>(())
/// ```
pub struct MediaReference {
    id: MediaId,
    input_context: Input,
    video_stream_index: usize,
    metadata: VideoMetadata,
    path: PathBuf,
}

impl Debug for MediaReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaReference")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("video_stream_index", &self.video_stream_index)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl MediaReference {
    /// Open `path` with FFmpeg and cache its video metadata.
    ///
    /// Callers go through [`MediaLoader`](crate::MediaLoader), which checks
    /// the declared media type first.
    pub(crate) fn open(path: &Path) -> Result<Self, CaptureError> {
        let path_buf = path.to_path_buf();
        log::debug!("Opening media file: {}", path_buf.display());

        ffmpeg_next::init().map_err(|error| CaptureError::FileOpen {
            path: path_buf.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| CaptureError::FileOpen {
                path: path_buf.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(CaptureError::NoVideoStream)?;
        let video_stream_index = stream.index();

        let decoder_context =
            CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                CaptureError::FileOpen {
                    path: path_buf.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| CaptureError::FileOpen {
                path: path_buf.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let frames_per_second = rational_to_f64(stream.avg_frame_rate())
            .or_else(|| rational_to_f64(stream.rate()))
            .unwrap_or(0.0);

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            duration,
            codec,
            format: input_context.format().name().to_string(),
        };

        if metadata.width == 0 || metadata.height == 0 {
            return Err(CaptureError::FileOpen {
                path: path_buf,
                reason: "video stream reports zero frame dimensions".to_string(),
            });
        }

        let id = MediaId::next();
        log::info!(
            "Opened {id}: {} ({}x{}, {:.2} fps, {:.2}s, codec={})",
            path_buf.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.duration.as_secs_f64(),
            metadata.codec,
        );

        Ok(Self {
            id,
            input_context,
            video_stream_index,
            metadata,
            path: path_buf,
        })
    }

    /// Identity of this handle.
    pub fn id(&self) -> MediaId {
        self.id
    }

    /// Path of the file this handle was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached video metadata.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }
}

impl Drop for MediaReference {
    fn drop(&mut self) {
        log::debug!("Releasing {id} ({})", self.path.display(), id = self.id);
    }
}

impl FrameSource for MediaReference {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Seek to the keyframe at or before `timestamp`, then decode forward to
    /// the frame that is on screen at `timestamp`: the last frame presented
    /// at or before it. When the stream ends first, the last decoded frame
    /// is used.
    fn decode_frame_at(
        &mut self,
        timestamp: Duration,
        options: &CaptureOptions,
    ) -> Result<DynamicImage, CaptureError> {
        let started = Instant::now();
        let video_stream_index = self.video_stream_index;
        let width = self.metadata.width;
        let height = self.metadata.height;
        let pixel_format = options.pixel_format;

        let stream = self
            .input_context
            .stream(video_stream_index)
            .ok_or(CaptureError::NoVideoStream)?;
        let time_base = stream.time_base();
        let stream_start = stream.start_time();
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            pixel_format.to_ffmpeg_pixel(),
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let seek_timestamp =
            duration_to_seek_timestamp(timestamp, start_to_micros(stream_start, time_base));
        self.input_context.seek(seek_timestamp, ..seek_timestamp)?;
        log::debug!("{}: seeking to {:.3}s", self.id, timestamp.as_secs_f64());

        let mut pending = PendingFrame::new(timestamp.as_secs_f64(), stream_start, time_base);

        for (stream, packet) in self.input_context.packets() {
            options.check_wait(started, timestamp)?;
            if stream.index() != video_stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            if pending.drain(&mut decoder) {
                break;
            }
        }

        if !pending.settled {
            options.check_wait(started, timestamp)?;
            decoder.send_eof()?;
            pending.drain(&mut decoder);
        }

        let frame = pending.into_frame().ok_or_else(|| {
            CaptureError::VideoDecodeError(format!(
                "No frame could be decoded near {:.3}s",
                timestamp.as_secs_f64()
            ))
        })?;

        let mut converted = VideoFrame::empty();
        scaler.run(&frame, &mut converted)?;
        let buffer = frame_to_buffer(&converted, width, height, pixel_format.bytes_per_pixel());
        pixel_format.buffer_to_image(width, height, buffer)
    }
}

/// Tracks the best candidate frame while decoding toward a target time.
struct PendingFrame {
    target_seconds: f64,
    stream_start: i64,
    time_base: Rational,
    scratch: VideoFrame,
    held: VideoFrame,
    has_held: bool,
    settled: bool,
}

impl PendingFrame {
    fn new(target_seconds: f64, stream_start: i64, time_base: Rational) -> Self {
        Self {
            target_seconds,
            stream_start,
            time_base,
            scratch: VideoFrame::empty(),
            held: VideoFrame::empty(),
            has_held: false,
            settled: false,
        }
    }

    /// Pull every frame the decoder has ready. Returns `true` once a frame
    /// past the target has been seen, which settles the choice.
    fn drain(&mut self, decoder: &mut VideoDecoder) -> bool {
        while decoder.receive_frame(&mut self.scratch).is_ok() {
            let pts = self
                .scratch
                .timestamp()
                .or_else(|| self.scratch.pts())
                .unwrap_or(0);
            let seconds = pts_to_seconds(pts, self.stream_start, self.time_base);

            if seconds <= self.target_seconds + PTS_TOLERANCE_SECONDS {
                mem::swap(&mut self.scratch, &mut self.held);
                self.has_held = true;
                continue;
            }

            // Nothing precedes the target (e.g. it falls before the first
            // presentation time), so the first later frame is on screen.
            if !self.has_held {
                mem::swap(&mut self.scratch, &mut self.held);
                self.has_held = true;
            }
            self.settled = true;
            return true;
        }
        false
    }

    fn into_frame(self) -> Option<VideoFrame> {
        self.has_held.then_some(self.held)
    }
}

fn rational_to_f64(rational: Rational) -> Option<f64> {
    if rational.denominator() != 0 && rational.numerator() > 0 {
        Some(rational.numerator() as f64 / rational.denominator() as f64)
    } else {
        None
    }
}
