//! Utility functions for line-oriented text

use once_cell::sync::Lazy;
use regex::Regex;

/// Any line terminator: `\r\n`, `\r` or `\n`
pub static LINE_TERMINATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Split text into physical lines, treating every terminator alike
///
/// Always yields at least one (possibly empty) segment; text ending in a
/// terminator yields a trailing empty segment.
pub fn split_lines(text: &str) -> Vec<&str> {
    LINE_TERMINATOR.split(text).collect()
}

/// Number of physical lines in `text` (one more than the number of terminators)
pub fn line_count(text: &str) -> usize {
    LINE_TERMINATOR.find_iter(text).count() + 1
}

/// Length of a line as counted by position columns
pub fn column_width(line: &str) -> usize {
    line.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_mixed_terminators() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_lines_trailing_terminator() {
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines("\n\n"), vec!["", "", ""]);
    }

    #[test]
    fn test_split_lines_empty() {
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 1);
        assert_eq!(line_count("one"), 1);
        assert_eq!(line_count("one\r\ntwo\n"), 3);
    }

    #[test]
    fn test_column_width_counts_chars() {
        // "café" is 5 bytes but 4 columns
        assert_eq!(column_width("café"), 4);
    }
}
