//! PNG encoding and export destinations.
//!
//! A capture ends by encoding the rasterized frame as PNG and handing the
//! bytes to an [`ExportSink`] under a generated file name. [`DirectorySink`]
//! writes into a directory; [`MemorySink`] keeps the exports in memory.

use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageEncoder, codecs::png::PngEncoder};

use crate::error::CaptureError;

/// Encode `image` as a PNG byte stream in its own colour type.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CaptureError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_bytes(),
        image.width(),
        image.height(),
        image.color().into(),
    )?;
    Ok(bytes)
}

/// Wrap PNG bytes in a `data:image/png;base64,` URI.
///
/// # Example
///
/// ```
/// let uri = framegrab::png_data_uri(&[0x89, b'P', b'N', b'G']);
/// assert_eq!(uri, "data:image/png;base64,iVBORw==");
/// ```
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(png))
}

/// Destination for exported frames.
pub trait ExportSink {
    /// Store `png` under `file_name` and return where it went.
    fn export(&mut self, file_name: &str, png: &[u8]) -> Result<PathBuf, CaptureError>;
}

/// Writes exports into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    /// Export into `directory`. Existing files are not replaced.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            overwrite: false,
        }
    }

    /// Allow replacing files that already exist.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The target directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ExportSink for DirectorySink {
    fn export(&mut self, file_name: &str, png: &[u8]) -> Result<PathBuf, CaptureError> {
        fs::create_dir_all(&self.directory)?;
        let destination = self.directory.join(file_name);

        if self.overwrite {
            fs::write(&destination, png)?;
        } else {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&destination)
                .map_err(|error| match error.kind() {
                    ErrorKind::AlreadyExists => CaptureError::OutputExists(destination.clone()),
                    _ => CaptureError::IoError(error),
                })?;
            write_or_discard(&destination, file, png)?;
        }

        log::info!("Exported {} ({} bytes)", destination.display(), png.len());
        Ok(destination)
    }
}

/// Write `png` into a freshly created `destination`, removing the file
/// again if the write fails so a retry is not refused as `OutputExists`.
fn write_or_discard<W: Write>(
    destination: &Path,
    mut file: W,
    png: &[u8],
) -> Result<(), CaptureError> {
    let written = file.write_all(png).and_then(|()| file.flush());
    drop(file);

    if let Err(error) = written {
        if let Err(cleanup) = fs::remove_file(destination) {
            log::warn!("Could not remove partial {}: {}", destination.display(), cleanup);
        }
        return Err(CaptureError::IoError(error));
    }
    Ok(())
}

/// Keeps every export in memory, in order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    exports: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(file_name, png)` pair exported so far.
    pub fn exports(&self) -> &[(String, Vec<u8>)] {
        &self.exports
    }

    /// The most recent export.
    pub fn last(&self) -> Option<&(String, Vec<u8>)> {
        self.exports.last()
    }
}

impl ExportSink for MemorySink {
    fn export(&mut self, file_name: &str, png: &[u8]) -> Result<PathBuf, CaptureError> {
        self.exports.push((file_name.to_string(), png.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}

impl<S: ExportSink + ?Sized> ExportSink for Box<S> {
    fn export(&mut self, file_name: &str, png: &[u8]) -> Result<PathBuf, CaptureError> {
        (**self).export(file_name, png)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::StorageFull, "no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_removes_partial_file() {
        let directory = tempfile::tempdir().unwrap();
        let destination = directory.path().join("frame_at_3s.png");
        fs::write(&destination, b"\x89PN").unwrap();

        let result = write_or_discard(&destination, FullDisk, b"\x89PNG\r\n\x1a\n");

        assert!(matches!(result, Err(CaptureError::IoError(_))));
        assert!(!destination.exists());

        let mut sink = DirectorySink::new(directory.path());
        sink.export("frame_at_3s.png", b"png").unwrap();
        assert_eq!(fs::read(&destination).unwrap(), b"png");
    }

    #[test]
    fn successful_write_keeps_file() {
        let directory = tempfile::tempdir().unwrap();
        let destination = directory.path().join("frame_at_0s.png");
        let file = fs::File::create(&destination).unwrap();

        write_or_discard(&destination, file, b"png").unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"png");
    }
}
