// Each test binary only uses part of this module.
#![allow(unused)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use framegrab::{
    CaptureError, CaptureObserver, CaptureOptions, CaptureStage, FrameSource, PixelFormat,
    VideoMetadata,
};
use image::{DynamicImage, Rgba, RgbaImage};

pub fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

/// The same clip as [`sample_video_path`], muxed as MPEG-TS. Its streams
/// start well after zero.
pub fn sample_transport_stream_path() -> &'static str {
    "tests/fixtures/sample_video.ts"
}

pub fn metadata(width: u32, height: u32, seconds: u64) -> VideoMetadata {
    VideoMetadata {
        width,
        height,
        frames_per_second: 25.0,
        duration: Duration::from_secs(seconds),
        codec: "synthetic".to_string(),
        format: "synthetic".to_string(),
    }
}

/// How a [`SyntheticVideo`] answers decode requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    /// Return a frame immediately.
    Decode,
    /// Fail with a decode error.
    Fail,
    /// Never settle; wait until cancelled or timed out.
    Stall,
}

/// A video whose frame at time `t` is filled with the colour
/// `(frame_index % 256, 0, 0, 255)`, where `frame_index = floor(t * fps)`.
pub struct SyntheticVideo {
    pub metadata: VideoMetadata,
    pub behaviour: Behaviour,
    /// Decode at half resolution to exercise rasterization scaling.
    pub half_resolution: bool,
    pub requests: Arc<Mutex<Vec<Duration>>>,
    pub drops: Arc<AtomicUsize>,
}

impl SyntheticVideo {
    pub fn new(width: u32, height: u32, seconds: u64) -> Self {
        Self {
            metadata: metadata(width, height, seconds),
            behaviour: Behaviour::Decode,
            half_resolution: false,
            requests: Arc::new(Mutex::new(Vec::new())),
            drops: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn frame_index(&self, timestamp: Duration) -> u64 {
        (timestamp.as_secs_f64() * self.metadata.frames_per_second) as u64
    }
}

impl Drop for SyntheticVideo {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl FrameSource for SyntheticVideo {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn decode_frame_at(
        &mut self,
        timestamp: Duration,
        options: &CaptureOptions,
    ) -> Result<DynamicImage, CaptureError> {
        self.requests.lock().unwrap().push(timestamp);

        match self.behaviour {
            Behaviour::Decode => {}
            Behaviour::Fail => {
                return Err(CaptureError::VideoDecodeError("synthetic failure".to_string()));
            }
            Behaviour::Stall => {
                let started = Instant::now();
                loop {
                    if options.is_cancelled() {
                        return Err(CaptureError::Cancelled);
                    }
                    if started.elapsed() > options.seek_timeout() {
                        return Err(CaptureError::SeekTimeout {
                            target: timestamp,
                            timeout: options.seek_timeout(),
                        });
                    }
                    thread::sleep(Duration::from_millis(1));
                }
            }
        }

        let (width, height) = if self.half_resolution {
            (self.metadata.width / 2, self.metadata.height / 2)
        } else {
            (self.metadata.width, self.metadata.height)
        };
        let shade = (self.frame_index(timestamp) % 256) as u8;
        let image = RgbaImage::from_pixel(width, height, Rgba([shade, 0, 0, 255]));
        let image = DynamicImage::ImageRgba8(image);

        Ok(match options.pixel_format() {
            PixelFormat::Rgba8 => image,
            PixelFormat::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
            PixelFormat::Gray8 => DynamicImage::ImageLuma8(image.to_luma8()),
        })
    }
}

/// Records every stage it is told about.
#[derive(Default)]
pub struct RecordingObserver {
    pub stages: Mutex<Vec<CaptureStage>>,
}

impl CaptureObserver for RecordingObserver {
    fn on_stage(&self, stage: CaptureStage) {
        self.stages.lock().unwrap().push(stage);
    }
}
