/// Truncates `s` to at most `max` bytes (on a char boundary) with a "..."
/// suffix if anything was cut.
///
/// Used for human-readable tree dumps.
pub fn preview(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut out = s[..cut].to_string();
    out.push_str("...");
    out
}

/// Largest char boundary in `s` that is `<= offset` (clamped to `s.len()`).
pub fn floor_char_boundary(s: &str, offset: usize) -> usize {
    let mut i = offset.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn preview_exact_length_unchanged() {
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("hello world", 5), "hello...");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        // "世" is three bytes; cutting at 4 must back off to 3.
        assert_eq!(preview("a世界", 2), "a...");
    }

    #[test]
    fn floor_char_boundary_backs_off() {
        let s = "a世";
        assert_eq!(floor_char_boundary(s, 0), 0);
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 4), 4);
        assert_eq!(floor_char_boundary(s, 99), 4);
    }
}
