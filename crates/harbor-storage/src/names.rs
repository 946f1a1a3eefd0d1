//! Stored-name generation and locator helpers.
//!
//! Stored names look like `file-{unix_millis}-{random}{.ext}`. The millisecond
//! prefix plus a nine-digit random suffix keeps concurrent uploads apart; the
//! local store additionally refuses to overwrite, so a clash only costs a retry.

use rand::Rng;

const MAX_EXTENSION_LEN: usize = 16;

/// Generate a fresh stored name carrying the extension of `original_name`.
pub fn generate_stored_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("file-{}-{}{}", millis, suffix, extension_of(original_name))
}

/// Extension of a client file name including the dot, or an empty string.
///
/// Only ASCII alphanumerics are kept, so a hostile name cannot smuggle
/// separators into the stored name.
pub fn extension_of(original_name: &str) -> String {
    let base = basename(original_name);
    match base.rfind('.') {
        Some(idx) if idx > 0 => {
            let ext = &base[idx + 1..];
            if ext.is_empty()
                || ext.len() > MAX_EXTENSION_LEN
                || !ext.chars().all(|c| c.is_ascii_alphanumeric())
            {
                String::new()
            } else {
                format!(".{}", ext)
            }
        }
        _ => String::new(),
    }
}

/// Last segment of a locator, accepting both `/` and `\` separators.
pub fn basename(locator: &str) -> &str {
    locator.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_name_shape() {
        let name = generate_stored_name("iteration1.png");
        assert!(name.starts_with("file-"));
        assert!(name.ends_with(".png"));
        let middle = &name["file-".len()..name.len() - ".png".len()];
        let parts: Vec<&str> = middle.split('-').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn test_generated_names_are_distinct() {
        let names: HashSet<String> = (0..1000).map(|_| generate_stored_name("a.txt")).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("report.PDF"), ".PDF");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("noext"), "");
        assert_eq!(extension_of(".hidden"), "");
        assert_eq!(extension_of("weird.p/../x"), "");
        assert_eq!(extension_of("evil.ex e"), "");
        assert_eq!(extension_of("C:\\docs\\plan.docx"), ".docx");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("file-1-2.png"), "file-1-2.png");
        assert_eq!(basename("/var/uploads/file-1-2.png"), "file-1-2.png");
        assert_eq!(basename("uploads\\file-1-2.png"), "file-1-2.png");
    }
}
