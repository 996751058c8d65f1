/// The image selected for analysis
///
/// Both acquisition paths (file and camera) normalize into a
/// `CapturedImage`: the encoded bytes that will be uploaded plus a preview
/// handle decoded from those same bytes. The workflow owns at most one of
/// these; replacing it drops the previous preview handle along with it.

use iced::widget::image::Handle;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// File extensions accepted by the picker and the drop target
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// MIME type for a path whose extension indicates a supported image,
/// or `None` for anything else.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_string_lossy().to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Filename portion of a path, for user-facing messages
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .to_string()
}

/// Errors raised while acquiring an image, before any network activity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    /// The file's declared type is not an image. Nothing is loaded.
    #[error("{file_name} is not an image file. Please choose an image.")]
    InvalidFileType { file_name: String },

    /// The file looked fine but could not be read from disk.
    #[error("Could not read {file_name}: {message}")]
    Unreadable { file_name: String, message: String },
}

#[derive(Clone)]
pub struct CapturedImage {
    /// Name sent to the service as the multipart filename
    pub file_name: String,
    /// Encoded image bytes, exactly as they will be uploaded
    pub bytes: Vec<u8>,
    /// MIME type matching the bytes
    pub mime: &'static str,
    /// Display handle decoded from the same bytes
    pub preview: Handle,
}

impl CapturedImage {
    /// Build from a file the user picked or dropped.
    ///
    /// The declared type (extension) must indicate an image; otherwise this
    /// fails without producing any state.
    pub fn from_file(path: &Path, bytes: Vec<u8>) -> Result<Self, AcquireError> {
        let file_name = display_name(path);
        let mime = mime_for_path(path).ok_or(AcquireError::InvalidFileType {
            file_name: file_name.clone(),
        })?;

        let preview = Handle::from_bytes(bytes.clone());

        Ok(Self {
            file_name,
            bytes,
            mime,
            preview,
        })
    }

    /// Build from a JPEG-encoded camera frame.
    pub fn from_camera_frame(jpeg: Vec<u8>) -> Self {
        let file_name = format!(
            "camera-{}.jpg",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        let preview = Handle::from_bytes(jpeg.clone());

        Self {
            file_name,
            bytes: jpeg,
            mime: "image/jpeg",
            preview,
        }
    }
}

// Skip the raw bytes when printing
impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
