//! Upload MIME allow-list and report content classification.

/// MIME types accepted by the upload endpoint.
pub const ALLOWED_UPLOAD_TYPES: [&str; 10] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/pdf",
    "text/plain",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/csv",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/html",
];

/// Lowercase the media type and drop parameters such as `; charset=utf-8`.
pub fn normalize(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

pub fn is_allowed_upload_type(content_type: &str) -> bool {
    let normalized = normalize(content_type);
    ALLOWED_UPLOAD_TYPES.contains(&normalized.as_str())
}

/// How a stored file is turned into a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Already a PDF, streamed unchanged
    Pdf,
    Image,
    /// Decoded and typeset as plain text
    Text,
    /// Anything else gets a placeholder page
    Other,
}

impl ContentKind {
    pub fn classify(content_type: &str) -> Self {
        match normalize(content_type).as_str() {
            "application/pdf" => ContentKind::Pdf,
            "image/jpeg" | "image/jpg" | "image/png" | "image/gif" => ContentKind::Image,
            "text/plain" | "text/csv" | "text/html" => ContentKind::Text,
            _ => ContentKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        assert!(is_allowed_upload_type("image/png"));
        assert!(is_allowed_upload_type("Text/Plain; charset=utf-8"));
        assert!(is_allowed_upload_type(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        ));
        assert!(!is_allowed_upload_type("application/zip"));
        assert!(!is_allowed_upload_type("image/webp"));
        assert!(!is_allowed_upload_type(""));
    }

    #[test]
    fn test_classify() {
        assert_eq!(ContentKind::classify("application/pdf"), ContentKind::Pdf);
        assert_eq!(ContentKind::classify("image/jpg"), ContentKind::Image);
        assert_eq!(ContentKind::classify("text/csv"), ContentKind::Text);
        assert_eq!(ContentKind::classify("text/html; charset=utf-8"), ContentKind::Text);
        assert_eq!(
            ContentKind::classify(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            ),
            ContentKind::Other
        );
        assert_eq!(ContentKind::classify(""), ContentKind::Other);
    }
}
