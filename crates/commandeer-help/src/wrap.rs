//! Column measurement and word wrapping.

use unicode_width::UnicodeWidthStr;

/// Columns below which descriptions are not wrapped at all.
pub const MIN_COLUMN_WIDTH: usize = 40;

pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Wrap `text` to `width` columns, indenting continuation lines by `indent`
/// spaces. Existing line breaks are kept. When fewer than
/// [`MIN_COLUMN_WIDTH`] columns remain after the indent, the text is
/// returned as is.
pub fn wrap(text: &str, width: usize, indent: usize) -> String {
    let column = width.saturating_sub(indent);
    if column < MIN_COLUMN_WIDTH {
        return text.to_string();
    }

    let pad = " ".repeat(indent);
    let mut lines: Vec<String> = Vec::new();
    for source_line in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in source_line.split_whitespace() {
            let word_width = display_width(word);
            if line_width > 0 && line_width + 1 + word_width > column {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        lines.push(line);
    }

    lines.join(&format!("\n{pad}"))
}
