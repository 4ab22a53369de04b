//! Declared media type of a user-supplied file.
//!
//! The loader only accepts files whose declared type is `video/*`. The
//! declared type is derived from the file extension, the same way a file
//! picker reports it, so no bytes are read at this stage.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::Path,
};

/// MIME type reported for files with an unknown extension.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// A declared MIME type such as `video/mp4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType(String);

impl MediaType {
    /// Derive the declared type of `path` from its extension.
    ///
    /// # Example
    ///
    /// ```
    /// use framegrab::MediaType;
    ///
    /// assert!(MediaType::from_path("clip.MP4").is_video());
    /// assert!(!MediaType::from_path("notes.txt").is_video());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        let mime = match extension.as_deref() {
            Some("mp4") | Some("m4v") => "video/mp4",
            Some("mov") => "video/quicktime",
            Some("webm") => "video/webm",
            Some("mkv") => "video/x-matroska",
            Some("avi") => "video/x-msvideo",
            Some("ogv") => "video/ogg",
            Some("mpeg") | Some("mpg") => "video/mpeg",
            Some("ts") => "video/mp2t",
            Some("3gp") => "video/3gpp",
            Some("flv") => "video/x-flv",
            Some("wmv") => "video/x-ms-wmv",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("mp3") => "audio/mpeg",
            Some("wav") => "audio/wav",
            Some("flac") => "audio/flac",
            Some("ogg") => "audio/ogg",
            Some("txt") => "text/plain",
            _ => UNKNOWN_MEDIA_TYPE,
        };

        Self(mime.to_string())
    }

    /// The MIME string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this type names a video.
    pub fn is_video(&self) -> bool {
        self.0.starts_with("video/")
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
