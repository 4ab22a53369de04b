//! Capture progress reporting and cancellation.
//!
//! A capture runs through a fixed set of [`CaptureStage`]s. Attach a
//! [`CaptureObserver`] to [`CaptureOptions`](crate::CaptureOptions) to be told
//! when each stage starts, and a [`CancellationToken`] to abandon a capture
//! while it waits for the seek to settle.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framegrab::{CaptureObserver, CaptureOptions, CaptureStage, CaptureTarget};
//! use framegrab::{FrameCaptureWidget, MediaSource};
//!
//! struct PrintStage;
//!
//! impl CaptureObserver for PrintStage {
//!     fn on_stage(&self, stage: CaptureStage) {
//!         println!("{stage:?}");
//!     }
//! }
//!
//! let mut widget = FrameCaptureWidget::in_directory("frames");
//! widget.load(MediaSource::Picked("input.mp4".into()))?;
//! let options = CaptureOptions::new().with_observer(Arc::new(PrintStage));
//! widget.capture(CaptureTarget::First, &options)?;
//! # Ok::<(), framegrab::CaptureError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// The step a capture is currently performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CaptureStage {
    /// Moving to the target time and waiting for the frame there.
    Seeking,
    /// Drawing the decoded frame into a pixel buffer.
    Rasterizing,
    /// Encoding the pixel buffer as PNG.
    Encoding,
    /// Handing the PNG to the export sink.
    Exporting,
    /// Putting the playback position and state back.
    Restoring,
}

/// Receives a notification as each capture stage begins.
///
/// Implementations must be [`Send`] and [`Sync`] because async captures
/// decode on a blocking worker thread.
pub trait CaptureObserver: Send + Sync {
    /// Called when `stage` starts.
    fn on_stage(&self, stage: CaptureStage);
}

/// Observer that ignores every notification. This is the default.
pub(crate) struct NoOpObserver;

impl CaptureObserver for NoOpObserver {
    fn on_stage(&self, _stage: CaptureStage) {}
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clones share state; cancelling any clone cancels them all. The decoder
/// checks the token before each packet while it waits for the target frame.
///
/// # Example
///
/// ```
/// use framegrab::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    parent: Option<Box<CancellationToken>>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            parent: None,
        }
    }

    /// A token that is cancelled when either it or `self` is cancelled.
    /// Cancelling the child leaves `self` untouched.
    ///
    /// ```
    /// use framegrab::CancellationToken;
    ///
    /// let parent = CancellationToken::new();
    /// let child = parent.child_token();
    /// child.cancel();
    /// assert!(!parent.is_cancelled());
    ///
    /// let other = parent.child_token();
    /// parent.cancel();
    /// assert!(other.is_cancelled());
    /// ```
    pub fn child_token(&self) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            parent: Some(Box::new(self.clone())),
        }
    }

    /// Request cancellation.
    ///
    /// All clones of this token observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.is_cancelled())
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
