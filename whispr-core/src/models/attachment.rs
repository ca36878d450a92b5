//! File attachments sent alongside a single message.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An inline file attached to one request.
///
/// Attachments are never retained by the core after the request that uses
/// them completes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    name: String,
    mime_type: String,
    base64_data: String,
}

impl Attachment {
    /// Creates an attachment from already-encoded data.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        base64_data: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            base64_data: base64_data.into(),
        }
    }

    /// Creates an attachment by base64-encoding raw bytes.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(name, mime_type, STANDARD.encode(bytes))
    }

    /// File name as shown to the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload (standard alphabet, padded).
    pub fn base64_data(&self) -> &str {
        &self.base64_data
    }

    /// Returns true for `image/*` attachments.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Returns true for PDF documents.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }

    /// The `[File: name]` marker used when content cannot be sent inline.
    pub fn text_marker(&self) -> String {
        format!("[File: {}]", self.name)
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("base64_len", &self.base64_data.len())
            .finish()
    }
}

/// Guesses a MIME type from a file extension.
///
/// Unknown extensions map to `application/octet-stream`.
pub fn mime_type_for_path(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_encodes_standard_base64() {
        let att = Attachment::from_bytes("hello.txt", "text/plain", b"hello");
        assert_eq!(att.base64_data(), "aGVsbG8=");
        assert!(!att.is_image());
    }

    #[test]
    fn test_kind_predicates() {
        assert!(Attachment::new("a.png", "image/png", "").is_image());
        assert!(Attachment::new("a.pdf", "application/pdf", "").is_pdf());
        assert_eq!(Attachment::new("notes.md", "text/markdown", "").text_marker(), "[File: notes.md]");
    }

    #[test]
    fn test_debug_hides_payload() {
        let att = Attachment::new("a.png", "image/png", "QUJDRA==");
        let dbg = format!("{att:?}");
        assert!(!dbg.contains("QUJDRA=="));
        assert!(dbg.contains("base64_len: 8"));
    }

    #[test]
    fn test_mime_type_for_path() {
        assert_eq!(mime_type_for_path(Path::new("shot.PNG")), "image/png");
        assert_eq!(mime_type_for_path(Path::new("/tmp/report.pdf")), "application/pdf");
        assert_eq!(mime_type_for_path(Path::new("Makefile")), "application/octet-stream");
        assert_eq!(mime_type_for_path(Path::new("unknown.zzqx")), "application/octet-stream");
    }

    #[test]
    fn test_mime_type_covers_common_files() {
        assert_eq!(mime_type_for_path(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(mime_type_for_path(Path::new("scan.bmp")), "image/bmp");
        assert!(mime_type_for_path(Path::new("photo.tiff")).starts_with("image/"));
        assert!(mime_type_for_path(Path::new("main.py")).starts_with("text/"));
        assert!(mime_type_for_path(Path::new("page.xml")).ends_with("xml"));
        assert!(mime_type_for_path(Path::new("clip.mov")).starts_with("video/"));

        let svg = Attachment::from_bytes("logo.svg", mime_type_for_path(Path::new("logo.svg")), b"<svg/>");
        assert!(svg.is_image());
    }
}
