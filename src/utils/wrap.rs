use regex::Regex;
use std::sync::LazyLock;

/// Marks where a wrap command's inner text goes: a run of one ellipsis-like
/// character or three or more ASCII dots.
pub static WRAP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\x{1801}+|\x{2026}+|\x{22EE}+|\x{22EF}+|\x{22F0}+|\x{22F1}+|\x{FE19}+|\.{3,}",
    )
    .expect("Invalid wrap marker regex")
});

/// Split `text` around its first wrap marker.
///
/// # Examples
///
/// ```
/// use wildprompt::utils::split_at_wrap_marker;
///
/// assert_eq!(split_at_wrap_marker("happy … on a meadow"), Some(("happy ", " on a meadow")));
/// assert_eq!(split_at_wrap_marker("no marker"), None);
/// ```
pub fn split_at_wrap_marker(text: &str) -> Option<(&str, &str)> {
    let marker = WRAP_MARKER.find(text)?;
    Some((&text[..marker.start()], &text[marker.end()..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_variants() {
        assert_eq!(split_at_wrap_marker("a...b"), Some(("a", "b")));
        assert_eq!(split_at_wrap_marker("a.....b"), Some(("a", "b")));
        assert_eq!(split_at_wrap_marker("a\u{22EF}b"), Some(("a", "b")));
        assert_eq!(split_at_wrap_marker("a\u{2026}\u{2026}b"), Some(("a", "b")));
        assert_eq!(split_at_wrap_marker("a..b"), None);
    }

    #[test]
    fn test_mixed_marker_characters_are_separate_runs() {
        assert_eq!(
            split_at_wrap_marker("a\u{2026}\u{22EF}b"),
            Some(("a", "\u{22EF}b"))
        );
        assert_eq!(split_at_wrap_marker("a\u{2026}...b"), Some(("a", "...b")));
    }

    #[test]
    fn test_first_marker_wins() {
        assert_eq!(split_at_wrap_marker("x ... y ... z"), Some(("x ", " y ... z")));
    }
}
