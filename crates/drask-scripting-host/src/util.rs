//! Text helpers for presenting execution output to console consumers.

const TRUNCATION_SUFFIX: &str = "...";

/// Strip one matching pair of surrounding quotes, after trimming whitespace.
pub fn unquote(s: &str) -> &str {
    let trimmed = s.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Truncate to `max_len` characters, marking the cut with a suffix.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= TRUNCATION_SUFFIX.len() {
        return s.chars().take(max_len).collect();
    }
    let kept: String = s.chars().take(max_len - TRUNCATION_SUFFIX.len()).collect();
    format!("{kept}{TRUNCATION_SUFFIX}")
}

/// Split text into trimmed, non-empty lines, each capped at `max_len`
/// characters (0 = uncapped).
pub fn split_lines(text: &str, max_len: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if max_len == 0 {
                line.to_string()
            } else {
                truncate(line, max_len)
            }
        })
        .collect()
}

/// Cap a line list for display; returns the visible slice and how many
/// lines were dropped.
pub fn clip_lines(lines: &[String], max_lines: usize) -> (&[String], usize) {
    if max_lines == 0 || lines.len() <= max_lines {
        (lines, 0)
    } else {
        (&lines[..max_lines], lines.len() - max_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_strips_matching_quotes_only() {
        assert_eq!(unquote("\"print('hi')\""), "print('hi')");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("  'x'  "), "x");
        assert_eq!(unquote("\"mismatched'"), "\"mismatched'");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("'"), "'");
    }

    #[test]
    fn test_truncate_marks_the_cut() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer line", 8), "a lon...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_split_lines_trims_and_drops_empties() {
        let lines = split_lines("  first  \n\n second\n   \n", 0);
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_split_lines_caps_line_length() {
        let lines = split_lines("aaaaaaaaaa\nbb", 6);
        assert_eq!(lines, vec!["aaa...", "bb"]);
    }

    #[test]
    fn test_clip_lines_reports_dropped_count() {
        let lines: Vec<String> = (0..12).map(|i| i.to_string()).collect();
        let (shown, dropped) = clip_lines(&lines, 10);
        assert_eq!(shown.len(), 10);
        assert_eq!(dropped, 2);

        let (shown, dropped) = clip_lines(&lines, 0);
        assert_eq!(shown.len(), 12);
        assert_eq!(dropped, 0);
    }
}
