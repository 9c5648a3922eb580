//! Shared utility functions.

/// Truncate a string to at most `max_chars` characters.
///
/// Returns a sub-slice of the original string, always cut on a character
/// boundary. Titles and log previews are bounded in characters, not bytes.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Shorten an opaque identifier for display (first 8 characters).
pub fn short_id(id: &str) -> &str {
    truncate_chars(id, 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn truncate_no_op_when_short() {
        assert_eq!(truncate_chars("hi", 10), "hi");
    }

    #[test]
    fn truncate_multibyte() {
        let s = "あのね";
        assert_eq!(truncate_chars(s, 1), "あ");
        assert_eq!(truncate_chars(s, 3), "あのね");
    }

    #[test]
    fn truncate_empty() {
        assert_eq!(truncate_chars("", 10), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn short_id_takes_prefix() {
        assert_eq!(short_id("0f8fad5b-d9cb-469f-a165-70867728950e"), "0f8fad5b");
    }
}
