//! Page geometry and text layout for generated reports.

/// US Letter, in points
pub const PAGE_WIDTH: i64 = 612;
pub const PAGE_HEIGHT: i64 = 792;
pub const MARGIN: i64 = 50;
pub const CONTENT_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;
pub const CONTENT_HEIGHT: i64 = PAGE_HEIGHT - 2 * MARGIN;

pub const FONT_SIZE: i64 = 10;
pub const LEADING: i64 = 12;
/// Courier glyphs are 600/1000 em wide
const CHAR_WIDTH_MILLI_EM: i64 = 600;
const TAB_WIDTH: usize = 4;

pub const TRUNCATION_NOTICE: &str = "\n\n[... Content truncated due to length ...]";

/// Characters that fit on one line of body text.
pub fn chars_per_line() -> usize {
    (CONTENT_WIDTH * 1000 / (FONT_SIZE * CHAR_WIDTH_MILLI_EM)) as usize
}

/// Lines of body text that fit on one page.
pub fn lines_per_page() -> usize {
    (CONTENT_HEIGHT / LEADING) as usize
}

/// Baseline of the first line on a page.
pub fn first_baseline() -> i64 {
    PAGE_HEIGHT - MARGIN - FONT_SIZE
}

/// Width in points of `len` Courier characters at the body font size.
pub fn text_width(len: usize) -> i64 {
    len as i64 * FONT_SIZE * CHAR_WIDTH_MILLI_EM / 1000
}

/// Keep at most `cap` characters, appending the truncation notice when
/// anything was cut. Returns whether truncation happened.
pub fn truncate_text(text: &str, cap: usize) -> (String, bool) {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => {
            let mut kept = text[..byte_idx].to_string();
            kept.push_str(TRUNCATION_NOTICE);
            (kept, true)
        }
        None => (text.to_string(), false),
    }
}

/// Split text into display lines no wider than `width` characters.
///
/// Line breaks in the input are kept, tabs become spaces and long lines are
/// wrapped at the last space that fits, or hard-wrapped when there is none.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let line = expand_tabs(raw.strip_suffix('\r').unwrap_or(raw));
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut start = 0;
        while start < chars.len() {
            let remaining = chars.len() - start;
            if remaining <= width {
                lines.push(chars[start..].iter().collect());
                break;
            }

            let window = &chars[start..start + width + 1];
            let end = match window.iter().rposition(|c| *c == ' ') {
                Some(pos) if pos > 0 => start + pos,
                _ => start + width,
            };
            lines.push(chars[start..end].iter().collect::<String>().trim_end().to_string());

            start = end;
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
        }
    }

    lines
}

fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + TAB_WIDTH);
    for c in line.chars() {
        if c == '\t' {
            let pad = TAB_WIDTH - out.chars().count() % TAB_WIDTH;
            out.extend(std::iter::repeat(' ').take(pad));
        } else {
            out.push(c);
        }
    }
    out
}

/// Encode for a WinAnsi standard font. Characters outside Latin-1 and control
/// characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

/// Lines of the summary page for a file that cannot be converted.
pub fn placeholder_lines(mime_type: &str, size_bytes: u64) -> Vec<String> {
    let file_type = if mime_type.is_empty() {
        "unknown"
    } else {
        mime_type
    };
    vec![
        format!("File Type: {}", file_type),
        String::new(),
        "This file type cannot be converted to PDF.".to_string(),
        format!("File Size: {:.2} KB", size_bytes as f64 / 1024.0),
    ]
}
