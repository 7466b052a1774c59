//! Small text helpers shared by both scorers.

/// Number of whitespace-separated words. Blank input counts as zero.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Truncate `s` to at most `max` chars without splitting a code point.
pub fn clamp_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// True when any needle occurs in `haystack`.
pub fn contains_any<S: AsRef<str>>(haystack: &str, needles: &[S]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_ref()))
}

/// Number of distinct needles that occur in `haystack`.
pub fn count_present<S: AsRef<str>>(haystack: &str, needles: &[S]) -> usize {
    needles
        .iter()
        .filter(|n| haystack.contains(n.as_ref()))
        .count()
}
