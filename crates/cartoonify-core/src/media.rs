//! File selection and media-type classification
//!
//! A file's declared media type comes from its extension. Each upload mode
//! accepts a fixed set of types; anything else is rejected before a job is
//! created.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::Mode;

/// Media type used for extensions we do not recognise
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Extension → media type table
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("txt", "text/plain"),
    ("pdf", "application/pdf"),
];

/// Kind of upload a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Upload kind for a mode, if the mode uploads files
    pub fn for_mode(mode: Mode) -> Option<Self> {
        match mode {
            Mode::Image => Some(MediaKind::Image),
            Mode::Video => Some(MediaKind::Video),
            _ => None,
        }
    }

    pub fn accepts(&self, media_type: &str) -> bool {
        match self {
            MediaKind::Image => matches!(media_type, "image/jpeg" | "image/png"),
            MediaKind::Video => media_type
                .strip_prefix("video/")
                .is_some_and(|subtype| !subtype.is_empty()),
        }
    }

    /// Human-readable list of accepted types
    pub fn expected(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg or image/png",
            MediaKind::Video => "video/*",
        }
    }

    /// Multipart form field carrying the file
    pub fn form_field(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Service endpoint path
    pub fn endpoint(&self) -> &'static str {
        match self {
            MediaKind::Image => "/process-image",
            MediaKind::Video => "/process-video",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Declared media type for a path, derived from its extension
pub fn media_type_from_path(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return UNKNOWN_MEDIA_TYPE;
    };
    let ext = ext.to_ascii_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mt)| *mt)
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}

/// A file the user picked, with its declared media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub media_type: String,
}

impl SelectedFile {
    /// Declare a file from its path
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = media_type_from_path(&path).to_string();
        Self { path, media_type }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string())
    }

    /// Reject the file unless `kind` accepts its media type
    pub fn classify(&self, kind: MediaKind) -> Result<()> {
        if kind.accepts(&self.media_type) {
            Ok(())
        } else {
            Err(Error::unsupported_type(&self.media_type, kind.expected()))
        }
    }
}

/// File contents ready to be sent to the service
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file: &SelectedFile, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file.file_name(),
            media_type: file.media_type.clone(),
            bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(media_type_from_path(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(media_type_from_path(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(media_type_from_path(Path::new("dir/b.png")), "image/png");
        assert_eq!(media_type_from_path(Path::new("c.mov")), "video/quicktime");
        assert_eq!(media_type_from_path(Path::new("noext")), UNKNOWN_MEDIA_TYPE);
        assert_eq!(media_type_from_path(Path::new("x.zzz")), UNKNOWN_MEDIA_TYPE);
    }

    #[test]
    fn test_image_kind_accepts_only_jpeg_and_png() {
        assert!(MediaKind::Image.accepts("image/jpeg"));
        assert!(MediaKind::Image.accepts("image/png"));
        assert!(!MediaKind::Image.accepts("image/gif"));
        assert!(!MediaKind::Image.accepts("image/webp"));
        assert!(!MediaKind::Image.accepts("video/mp4"));
    }

    #[test]
    fn test_video_kind_accepts_any_video() {
        assert!(MediaKind::Video.accepts("video/mp4"));
        assert!(MediaKind::Video.accepts("video/quicktime"));
        assert!(!MediaKind::Video.accepts("video/"));
        assert!(!MediaKind::Video.accepts("image/png"));
    }

    #[test]
    fn test_classify_rejects_mismatch() {
        let file = SelectedFile::from_path("photo.gif");
        let err = file.classify(MediaKind::Image).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { .. }));

        assert!(SelectedFile::from_path("photo.png")
            .classify(MediaKind::Image)
            .is_ok());
    }

    #[test]
    fn test_for_mode() {
        assert_eq!(MediaKind::for_mode(Mode::Image), Some(MediaKind::Image));
        assert_eq!(MediaKind::for_mode(Mode::Video), Some(MediaKind::Video));
        assert_eq!(MediaKind::for_mode(Mode::Webcam), None);
    }

    #[test]
    fn test_endpoints_and_fields() {
        assert_eq!(MediaKind::Image.endpoint(), "/process-image");
        assert_eq!(MediaKind::Image.form_field(), "image");
        assert_eq!(MediaKind::Video.endpoint(), "/process-video");
        assert_eq!(MediaKind::Video.form_field(), "video");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(SelectedFile::from_path("/tmp/cat.png").file_name(), "cat.png");
    }
}
