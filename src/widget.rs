//! The frame capture widget.
//!
//! [`FrameCaptureWidget`] is the state container behind a frame-capture UI:
//! it owns at most one loaded video, the tracked playback position and
//! play/pause state, and the sink exports go to. Hosts feed it user input
//! (load, scrub, play, pause, capture) and player events (time updates,
//! metadata loaded).
//!
//! The widget is in one of two states: no media loaded, or media loaded.
//! Everything except loading needs media and returns
//! [`CaptureError::NoMediaLoaded`] otherwise.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use framegrab::{CaptureOptions, CaptureTarget, FrameCaptureWidget, MediaSource};
//!
//! let mut widget = FrameCaptureWidget::in_directory("frames");
//! widget.load(MediaSource::Picked("input.mp4".into()))?;
//! widget.scrub(3.2)?;
//!
//! let outcome = widget.capture(CaptureTarget::Current, &CaptureOptions::new())?;
//! assert_eq!(outcome.frame.file_name, "frame_at_3s.png");
//! assert_eq!(widget.position().current_time(), Duration::from_millis(3200));
//! # Ok::<(), framegrab::CaptureError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    time::Duration,
};

use crate::{
    capture::{CaptureOutcome, CaptureTarget, FrameExporter, FrameSource},
    configuration::CaptureOptions,
    error::CaptureError,
    export::{DirectorySink, ExportSink},
    loader::{MediaLoader, MediaSource},
    media::MediaReference,
    metadata::VideoMetadata,
    playback::{Playback, PlaybackPosition, PlaybackState},
    scrubber::Scrubber,
};

/// State container for loading a video, tracking its position, and
/// exporting frames.
pub struct FrameCaptureWidget<M = MediaReference, S = DirectorySink> {
    loader: MediaLoader,
    media: Option<M>,
    playback: Playback,
    sink: S,
}

impl<M: FrameSource, S> Debug for FrameCaptureWidget<M, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FrameCaptureWidget")
            .field("media", &self.media.as_ref().map(|media| media.metadata()))
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

impl FrameCaptureWidget {
    /// A widget that exports into `directory`.
    pub fn in_directory<P: AsRef<Path>>(directory: P) -> Self {
        Self::new(DirectorySink::new(directory))
    }
}

impl<S: ExportSink> FrameCaptureWidget<MediaReference, S> {
    /// Load a user-supplied file, replacing whatever was loaded.
    ///
    /// On success the previous [`MediaReference`] is released, the position
    /// resets to zero, playback is paused, and the new duration is mirrored
    /// as if the player had reported its metadata. On failure the widget is
    /// left exactly as it was.
    ///
    /// # Errors
    ///
    /// See [`MediaLoader::load`].
    pub fn load(&mut self, source: MediaSource) -> Result<&VideoMetadata, CaptureError> {
        let media = self.loader.load(source)?;
        Ok(self.attach(media))
    }

    /// Capture asynchronously, decoding on a blocking worker thread.
    ///
    /// Runs the same steps as [`capture`](FrameCaptureWidget::capture). The
    /// decode runs on its own demuxer and leaves the tracked position alone
    /// while it is awaited; the pause, seek, export and restore all happen
    /// after it resolves, without another suspension point. Dropping the
    /// returned future therefore cancels the worker and leaves the widget
    /// exactly as it was.
    ///
    /// The wait is bounded by the seek timeout; on expiry the worker is
    /// cancelled and [`CaptureError::SeekTimeout`] is returned. The widget
    /// stays mutably borrowed until the capture resolves, so captures never
    /// overlap.
    #[cfg(feature = "async")]
    pub async fn capture_async(
        &mut self,
        target: CaptureTarget,
        options: &CaptureOptions,
    ) -> Result<CaptureOutcome, CaptureError> {
        use crate::{capture::finish_frame, progress::CaptureStage};

        let media = self.media.as_ref().ok_or(CaptureError::NoMediaLoaded)?;
        let path = media.path().to_path_buf();
        let metadata = media.metadata().clone();
        let timestamp = target.resolve(&self.playback.position())?;

        options.notify(CaptureStage::Seeking);
        let decoded =
            crate::stream::capture_frame_async(path, timestamp, options.clone()).await;

        let snapshot = self.playback.snapshot();
        self.playback.pause();
        self.playback.seek(timestamp);

        let exported = decoded
            .and_then(|decoded| finish_frame(decoded, timestamp, &metadata, options))
            .and_then(|frame| {
                options.notify(CaptureStage::Exporting);
                let destination = self.sink.export(&frame.file_name, &frame.png)?;
                Ok((frame, destination))
            });

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
}

impl<M: FrameSource, S: ExportSink> FrameCaptureWidget<M, S> {
    /// An empty widget exporting to `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            loader: MediaLoader::new(),
            media: None,
            playback: Playback::new(),
            sink,
        }
    }

    /// Install an already-opened source, releasing the previous one.
    ///
    /// Resets the position and pauses, then mirrors the source's duration.
    pub fn attach(&mut self, media: M) -> &VideoMetadata {
        self.release();
        self.playback.reset();
        let duration = media.metadata().duration;
        let media = self.media.insert(media);
        self.playback.on_loaded_metadata(duration);
        media.metadata()
    }

    /// Release the loaded media and return to the empty state.
    pub fn unload(&mut self) {
        self.release();
        self.playback.reset();
    }

    fn release(&mut self) {
        if let Some(previous) = self.media.take() {
            log::debug!(
                "Replacing loaded media ({}x{})",
                previous.metadata().width,
                previous.metadata().height
            );
            drop(previous);
        }
    }

    /// Whether media is loaded.
    pub fn is_loaded(&self) -> bool {
        self.media.is_some()
    }

    /// The loaded media.
    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    /// The tracked position.
    pub fn position(&self) -> PlaybackPosition {
        self.playback.position()
    }

    /// The play/pause state.
    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// The slider for the loaded media.
    pub fn scrubber(&self) -> Option<Scrubber> {
        self.media
            .as_ref()
            .map(|_| Scrubber::new(self.playback.position().duration()))
    }

    /// The export sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The export sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn require_media(&self) -> Result<(), CaptureError> {
        if self.media.is_some() {
            Ok(())
        } else {
            Err(CaptureError::NoMediaLoaded)
        }
    }

    /// Mirror a time-progress report from the player.
    pub fn on_time_update(&mut self, time: Duration) -> Result<(), CaptureError> {
        self.require_media()?;
        self.playback.on_time_update(time);
        Ok(())
    }

    /// Mirror a metadata-loaded report from the player.
    pub fn on_loaded_metadata(&mut self, duration: Duration) -> Result<(), CaptureError> {
        self.require_media()?;
        self.playback.on_loaded_metadata(duration);
        Ok(())
    }

    /// Apply raw slider input in seconds and return the resulting time.
    pub fn scrub(&mut self, seconds: f64) -> Result<Duration, CaptureError> {
        self.require_media()?;
        let time = Scrubber::new(self.playback.position().duration()).value_for(seconds);
        self.playback.seek(time);
        Ok(self.playback.position().current_time())
    }

    /// Start playback.
    pub fn play(&mut self) -> Result<(), CaptureError> {
        self.require_media()?;
        self.playback.play()
    }

    /// Pause playback.
    pub fn pause(&mut self) -> Result<(), CaptureError> {
        self.require_media()?;
        self.playback.pause();
        Ok(())
    }

    /// Export the frame at `target`.
    ///
    /// The position and play/pause state are recorded first and restored
    /// afterwards, also when the capture fails. See
    /// [`FrameExporter::capture`].
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoMediaLoaded`], target resolution errors, and any
    /// decode, encode or sink error.
    pub fn capture(
        &mut self,
        target: CaptureTarget,
        options: &CaptureOptions,
    ) -> Result<CaptureOutcome, CaptureError> {
        let media = self.media.as_mut().ok_or(CaptureError::NoMediaLoaded)?;
        let timestamp = target.resolve(&self.playback.position())?;
        FrameExporter::new(media, &mut self.playback, &mut self.sink).capture(timestamp, options)
    }
}
