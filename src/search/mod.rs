//! Bounded approximate string search.
//!
//! [`search`] finds every substring of a text within a bounded Levenshtein
//! distance of a pattern. Literal occurrences short-circuit the approximate
//! pass; both paths report the same [`Match`] shape so callers cannot tell
//! which one fired.

pub mod approx;
pub mod exact;

pub use approx::{min_distance, search_approx};
pub use exact::{find_exact, find_first};

use serde::Serialize;

/// Hard ceiling on the error budget for very long patterns.
pub const MAX_ERROR_CAP: usize = 256;

/// A candidate location of a pattern inside a text.
///
/// Offsets index the `text` slice that was searched, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    /// Edit distance between the pattern and `text[start..end]`.
    pub errors: usize,
}

/// Error budget for a pattern of `pattern_len` characters: half the pattern,
/// never more than [`MAX_ERROR_CAP`].
pub fn max_errors_for(pattern_len: usize) -> usize {
    max_errors_with_cap(pattern_len, MAX_ERROR_CAP)
}

/// Same as [`max_errors_for`] with an explicit ceiling.
pub fn max_errors_with_cap(pattern_len: usize, cap: usize) -> usize {
    (pattern_len / 2).min(cap)
}

/// Find all matches of `pattern` in `text` with at most `max_errors` errors.
///
/// If the pattern occurs literally, only the literal occurrences are
/// returned. An empty pattern never matches.
pub fn search(text: &[char], pattern: &[char], max_errors: usize) -> Vec<Match> {
    if pattern.is_empty() {
        return Vec::new();
    }

    let exact = find_exact(text, pattern);
    if !exact.is_empty() {
        tracing::trace!(count = exact.len(), "literal matches found");
        return exact;
    }

    let matches = search_approx(text, pattern, max_errors);
    tracing::trace!(
        count = matches.len(),
        max_errors,
        "approximate search finished"
    );
    matches
}
