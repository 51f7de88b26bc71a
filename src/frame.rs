//! Still images handed to the classifier and the camera seam that produces them.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// MIME type assumed for camera snapshots.
pub const JPEG_MIME: &str = "image/jpeg";

/// An encoded still image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// The image source could not produce a frame.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Could not access the camera. Please check permissions and try again.")]
    CameraUnavailable(String),
    #[error("Please select a valid image file.")]
    NotAnImage,
    #[error("Failed to read image {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Frame {
    /// Wrap a camera snapshot that is already JPEG-encoded.
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: JPEG_MIME.to_string(),
        }
    }

    /// Accept user-supplied bytes only when they sniff as a known image format.
    pub fn from_image_bytes(bytes: Vec<u8>) -> Result<Self, AcquisitionError> {
        let format = image::guess_format(&bytes).map_err(|_| AcquisitionError::NotAnImage)?;
        Ok(Self {
            bytes,
            mime_type: format.to_mime_type().to_string(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, AcquisitionError> {
        let bytes = std::fs::read(path).map_err(|source| AcquisitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_image_bytes(bytes)
    }
}

/// A live video source owned by the host.
///
/// Implementations grab and encode frames; the controller only decides when.
pub trait CameraFeed: Send {
    fn start(&mut self) -> Result<(), AcquisitionError>;
    fn capture(&mut self) -> Result<Frame, AcquisitionError>;
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];

    #[test]
    fn sniffs_mime_type_from_magic_bytes() {
        let png = Frame::from_image_bytes(PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(png.mime_type, "image/png");
        let jpeg = Frame::from_image_bytes(JPEG_MAGIC.to_vec()).unwrap();
        assert_eq!(jpeg.mime_type, JPEG_MIME);
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = Frame::from_image_bytes(b"%PDF-1.7 not an image".to_vec()).unwrap_err();
        assert!(matches!(err, AcquisitionError::NotAnImage));
        assert_eq!(err.to_string(), "Please select a valid image file.");
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jpg");
        let err = Frame::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("missing.jpg"));
    }
}
