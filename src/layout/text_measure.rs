//! Text Measurement
//!
//! Utilities for measuring text dimensions in terminal cells.
//!
//! Terminal text width depends on Unicode character widths:
//! - ASCII characters: 1 cell
//! - CJK characters and most emoji: 2 cells
//! - Zero-width and control characters: 0 cells

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Measure the display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

/// Width of one character in cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    UnicodeWidthChar::width(c).unwrap_or(0) as u16
}

/// Wrap text to a given width.
///
/// Splits on explicit newlines first, then greedily packs words. Words
/// longer than the width are broken at character boundaries.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0u16;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = string_width(word);

            if word_width > width {
                // Flush, then hard-break the long word
                if line_width > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                for c in word.chars() {
                    let cw = char_width(c);
                    if line_width + cw > width && line_width > 0 {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0;
                    }
                    line.push(c);
                    line_width += cw;
                }
                continue;
            }

            let needed = if line_width == 0 { word_width } else { line_width + 1 + word_width };
            if needed > width {
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

    lines
}

/// Measure the height of text when wrapped to a given width.
///
/// Returns the number of lines (0 for empty text).
pub fn measure_text_height(text: &str, available_width: u16) -> u16 {
    wrap_text(text, available_width).len().min(u16::MAX as usize) as u16
}

/// Truncate text to fit a width, without an ellipsis.
pub fn truncate_text(text: &str, width: u16) -> String {
    let mut out = String::new();
    let mut used = 0u16;
    for c in text.chars() {
        let cw = char_width(c);
        if used + cw > width {
            break;
        }
        out.push(c);
        used += cw;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("日本"), 4);
    }

    #[test]
    fn test_wrap_words() {
        let lines = wrap_text("let's work together on it", 10);
        assert_eq!(lines, vec!["let's work", "together", "on it"]);
    }

    #[test]
    fn test_wrap_newlines_and_long_words() {
        let lines = wrap_text("ab\nabcdefgh", 4);
        assert_eq!(lines, vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn test_measure_height() {
        assert_eq!(measure_text_height("", 10), 0);
        assert_eq!(measure_text_height("one two three", 7), 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_text("portfolio", 4), "port");
        assert_eq!(truncate_text("日本語", 3), "日");
    }
}
