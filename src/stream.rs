//! Async frame capture.
//!
//! [`CaptureFuture`] decodes the frame at a timestamp on a
//! `tokio::task::spawn_blocking` thread, from a fresh demuxer opened on the
//! source path, so the async runtime is never blocked by FFmpeg work. The
//! future carries its own deadline: once the seek timeout elapses it cancels
//! the worker and resolves to [`CaptureError::SeekTimeout`]. Dropping the
//! future cancels the worker as well.
//!
//! Must be created inside a Tokio runtime with the time driver enabled.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framegrab::{CaptureOptions, CaptureTarget, FrameCaptureWidget, MediaSource};
//!
//! # async fn example() -> Result<(), framegrab::CaptureError> {
//! let mut widget = FrameCaptureWidget::in_directory("frames");
//! widget.load(MediaSource::Picked("input.mp4".into()))?;
//! let options = CaptureOptions::new().with_seek_timeout(Duration::from_secs(2));
//! let outcome = widget.capture_async(CaptureTarget::Last, &options).await?;
//! println!("saved {}", outcome.destination.display());
//! # Ok(())
//! # }
//! ```

use std::{
    future::Future,
    path::PathBuf,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use image::DynamicImage;
use tokio::{task::JoinHandle, time::Sleep};

use crate::{
    capture::FrameSource, configuration::CaptureOptions, error::CaptureError,
    loader::{MediaLoader, MediaSource}, progress::CancellationToken,
};

/// A decode running on a blocking worker, bounded by the seek timeout.
pub struct CaptureFuture {
    handle: JoinHandle<Result<DynamicImage, CaptureError>>,
    deadline: Pin<Box<Sleep>>,
    token: CancellationToken,
    target: Duration,
    timeout: Duration,
}

impl Future for CaptureFuture {
    type Output = Result<DynamicImage, CaptureError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Poll::Ready(joined) = Pin::new(&mut self.handle).poll(cx) {
            return Poll::Ready(joined.unwrap_or_else(|error| {
                Err(CaptureError::VideoDecodeError(format!(
                    "Capture worker stopped: {error}"
                )))
            }));
        }

        if self.deadline.as_mut().poll(cx).is_ready() {
            log::warn!(
                "Seek to {:.3}s did not settle within {:?}; cancelling",
                self.target.as_secs_f64(),
                self.timeout,
            );
            self.token.cancel();
            return Poll::Ready(Err(CaptureError::SeekTimeout {
                target: self.target,
                timeout: self.timeout,
            }));
        }

        Poll::Pending
    }
}

impl Drop for CaptureFuture {
    fn drop(&mut self) {
        // Stops a worker whose result nobody will read.
        self.token.cancel();
    }
}

/// Decode the frame on screen at `timestamp` in the video at `path`.
///
/// The worker observes a child of the caller's cancellation token, so a
/// timeout or drop stops the worker without cancelling the caller's token.
pub fn capture_frame_async(path: PathBuf, timestamp: Duration, options: CaptureOptions) -> CaptureFuture {
    let token = options
        .cancellation
        .as_ref()
        .map(CancellationToken::child_token)
        .unwrap_or_default();
    let timeout = options.seek_timeout;
    let worker_options = options.with_cancellation(token.clone());

    let handle = tokio::task::spawn_blocking(move || {
        let mut media = MediaLoader::new().load(MediaSource::Picked(path))?;
        media.decode_frame_at(timestamp, &worker_options)
    });

    CaptureFuture {
        handle,
        deadline: Box::pin(tokio::time::sleep(timeout)),
        token,
        target: timestamp,
        timeout,
    }
}
