pub mod upload;

use harbor_core::AppError;
use uuid::Uuid;

/// Parse a path id, answering 400 with `message` when it is not a UUID.
pub fn parse_id(raw: &str, message: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidInput(message.to_string()))
}

/// `Content-Disposition` value for a download, with characters that would
/// break the quoted filename removed.
pub fn attachment_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Invalid result ID").unwrap(), id);
        assert!(matches!(
            parse_id("not-an-id", "Invalid result ID"),
            Err(AppError::InvalidInput(msg)) if msg == "Invalid result ID"
        ));
    }

    #[test]
    fn test_attachment_disposition() {
        assert_eq!(
            attachment_disposition("vessel1 P1.pdf"),
            "attachment; filename=\"vessel1 P1.pdf\""
        );
        assert_eq!(
            attachment_disposition("a\"b\r\n.pdf"),
            "attachment; filename=\"ab.pdf\""
        );
    }
}
