//! Literal occurrence scanning.

use super::Match;

/// Every literal occurrence of `pattern` in `text`, overlapping ones
/// included, in order of start offset.
pub fn find_exact(text: &[char], pattern: &[char]) -> Vec<Match> {
    if pattern.is_empty() || pattern.len() > text.len() {
        return Vec::new();
    }

    text.windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| *window == pattern)
        .map(|(start, _)| Match {
            start,
            end: start + pattern.len(),
            errors: 0,
        })
        .collect()
}

/// Offset of the first literal occurrence of `pattern` in `text`.
pub fn find_first(text: &[char], pattern: &[char]) -> Option<usize> {
    if pattern.is_empty() || pattern.len() > text.len() {
        return None;
    }
    text.windows(pattern.len()).position(|window| window == pattern)
}
