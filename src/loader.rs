//! Media loading.
//!
//! A [`MediaSource`] is what the user supplied, either through a file picker
//! or a drop. [`MediaLoader`] checks the declared media type and opens the
//! file as a [`MediaReference`].

use std::path::{Path, PathBuf};

use crate::{error::CaptureError, media::MediaReference, media_type::MediaType};

/// A user-supplied file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// Chosen through a file picker.
    Picked(PathBuf),
    /// Dropped onto the widget. Only the first file is used.
    Dropped(Vec<PathBuf>),
}

impl MediaSource {
    /// The file this source refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            MediaSource::Picked(path) => Some(path),
            MediaSource::Dropped(paths) => paths.first().map(PathBuf::as_path),
        }
    }
}

/// Validates and opens user-supplied files.
///
/// # Example
///
/// ```no_run
/// use framegrab::{MediaLoader, MediaSource};
///
/// let loader = MediaLoader::new();
/// let media = loader.load(MediaSource::Dropped(vec!["clip.webm".into()]))?;
/// println!("{:?}", media.metadata());
/// # Ok::<(), framegrab::CaptureError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaLoader;

impl MediaLoader {
    /// Create a loader.
    pub fn new() -> Self {
        Self
    }

    /// Check that `source` declares a video type, without opening it.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::EmptyDrop`] for a drop with no files.
    /// - [`CaptureError::NotAVideo`] when the declared type is not `video/*`.
    pub fn accept<'s>(&self, source: &'s MediaSource) -> Result<&'s Path, CaptureError> {
        let path = source.path().ok_or(CaptureError::EmptyDrop)?;
        let media_type = MediaType::from_path(path);
        if !media_type.is_video() {
            log::debug!("Rejecting {} ({media_type})", path.display());
            return Err(CaptureError::NotAVideo {
                path: path.to_path_buf(),
                media_type: media_type.to_string(),
            });
        }
        Ok(path)
    }

    /// Accept `source` and open it.
    ///
    /// # Errors
    ///
    /// Everything [`accept`](MediaLoader::accept) returns, plus
    /// [`CaptureError::FileOpen`] when FFmpeg cannot read the file and
    /// [`CaptureError::NoVideoStream`] when it holds no video.
    pub fn load(&self, source: MediaSource) -> Result<MediaReference, CaptureError> {
        let path = self.accept(&source)?;
        MediaReference::open(path)
    }
}
