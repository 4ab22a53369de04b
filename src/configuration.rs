//! Capture configuration.
//!
//! [`CaptureOptions`] is a builder that carries the seek timeout, an optional
//! cancellation token, a stage observer, and the output pixel format through
//! a capture without widening every signature.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use framegrab::{CancellationToken, CaptureOptions, PixelFormat};
//!
//! let token = CancellationToken::new();
//! let options = CaptureOptions::new()
//!     .with_seek_timeout(Duration::from_secs(3))
//!     .with_cancellation(token.clone())
//!     .with_pixel_format(PixelFormat::Rgb8);
//! assert_eq!(options.seek_timeout(), Duration::from_secs(3));
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
    time::{Duration, Instant},
};

use ffmpeg_next::format::Pixel;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::{
    error::CaptureError,
    progress::{CancellationToken, CaptureObserver, CaptureStage, NoOpObserver},
};

/// Default bound on how long a capture waits for its seek to settle.
pub const DEFAULT_SEEK_TIMEOUT: Duration = Duration::from_secs(10);

/// Pixel layout of the rasterized frame and of the exported PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGBA with opaque alpha, like a 2D canvas. This is the default.
    #[default]
    Rgba8,
    /// 8-bit RGB.
    Rgb8,
    /// 8-bit grayscale.
    Gray8,
}

impl PixelFormat {
    /// Map to the FFmpeg pixel format the scaler converts into.
    pub(crate) fn to_ffmpeg_pixel(self) -> Pixel {
        match self {
            PixelFormat::Rgba8 => Pixel::RGBA,
            PixelFormat::Rgb8 => Pixel::RGB24,
            PixelFormat::Gray8 => Pixel::GRAY8,
        }
    }

    pub(crate) fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 => 1,
        }
    }

    /// Wrap a tightly-packed buffer in the matching image type.
    pub(crate) fn buffer_to_image(
        self,
        width: u32,
        height: u32,
        buffer: Vec<u8>,
    ) -> Result<DynamicImage, CaptureError> {
        let image = match self {
            PixelFormat::Rgba8 => RgbaImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgba8),
            PixelFormat::Rgb8 => RgbImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgb8),
            PixelFormat::Gray8 => GrayImage::from_raw(width, height, buffer).map(DynamicImage::ImageLuma8),
        };
        image.ok_or_else(|| {
            CaptureError::VideoDecodeError(format!(
                "Decoded frame data does not fill a {width}x{height} {self:?} image"
            ))
        })
    }

    /// Convert an arbitrary image into this layout.
    pub(crate) fn convert(self, image: DynamicImage) -> DynamicImage {
        match (self, image) {
            (PixelFormat::Rgba8, image @ DynamicImage::ImageRgba8(_)) => image,
            (PixelFormat::Rgb8, image @ DynamicImage::ImageRgb8(_)) => image,
            (PixelFormat::Gray8, image @ DynamicImage::ImageLuma8(_)) => image,
            (PixelFormat::Rgba8, image) => DynamicImage::ImageRgba8(image.to_rgba8()),
            (PixelFormat::Rgb8, image) => DynamicImage::ImageRgb8(image.to_rgb8()),
            (PixelFormat::Gray8, image) => DynamicImage::ImageLuma8(image.to_luma8()),
        }
    }
}

/// Settings for a single capture.
#[derive(Clone)]
pub struct CaptureOptions {
    pub(crate) seek_timeout: Duration,
    pub(crate) cancellation: Option<CancellationToken>,
    pub(crate) observer: Arc<dyn CaptureObserver>,
    pub(crate) pixel_format: PixelFormat,
}

impl Debug for CaptureOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CaptureOptions")
            .field("seek_timeout", &self.seek_timeout)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("pixel_format", &self.pixel_format)
            .finish()
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureOptions {
    /// Defaults: 10 second seek timeout, no cancellation, no observer, RGBA.
    pub fn new() -> Self {
        Self {
            seek_timeout: DEFAULT_SEEK_TIMEOUT,
            cancellation: None,
            observer: Arc::new(NoOpObserver),
            pixel_format: PixelFormat::default(),
        }
    }

    /// Bound the wait for the seek to settle. A zero timeout is raised to
    /// one millisecond.
    #[must_use]
    pub fn with_seek_timeout(mut self, timeout: Duration) -> Self {
        self.seek_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Attach a cancellation token.
    ///
    /// Cancelling it makes the capture return
    /// [`CaptureError::Cancelled`](crate::CaptureError::Cancelled) after
    /// restoring the playback position.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Attach a stage observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CaptureObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the pixel layout of the exported frame.
    #[must_use]
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /// The configured seek timeout.
    pub fn seek_timeout(&self) -> Duration {
        self.seek_timeout
    }

    /// The configured pixel format.
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
    }

    /// Returns `true` if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    pub(crate) fn notify(&self, stage: CaptureStage) {
        self.observer.on_stage(stage);
    }

    /// Fail if the wait that began at `started` was cancelled or has run
    /// past the seek timeout.
    pub(crate) fn check_wait(&self, started: Instant, target: Duration) -> Result<(), CaptureError> {
        if self.is_cancelled() {
            return Err(CaptureError::Cancelled);
        }
        if started.elapsed() > self.seek_timeout {
            return Err(CaptureError::SeekTimeout {
                target,
                timeout: self.seek_timeout,
            });
        }
        Ok(())
    }
}
