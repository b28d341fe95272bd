//! Candidate scoring policy.
//!
//! A candidate's confidence is a weighted sum of four similarities, each in
//! `[0, 1]`, normalised by the total weight. The weights and thresholds are
//! policy choices, kept as named constants and overridable through
//! [`AnchorConfig`](crate::config::AnchorConfig).

use crate::search::min_distance;
use serde::{Deserialize, Serialize};

pub const QUOTE_WEIGHT: u32 = 50;
pub const PREFIX_WEIGHT: u32 = 20;
pub const SUFFIX_WEIGHT: u32 = 20;
pub const POSITION_WEIGHT: u32 = 10;

/// Minimum confidence for any match.
pub const ACCEPT_THRESHOLD: f64 = 0.5;

/// Minimum confidence for a fuzzy match found without prefix/suffix context.
pub const NO_CONTEXT_THRESHOLD: f64 = 0.95;

/// Characters of context stored on each side of a selector.
pub const CONTEXT_LENGTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    pub quote: u32,
    pub prefix: u32,
    pub suffix: u32,
    pub position: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            quote: QUOTE_WEIGHT,
            prefix: PREFIX_WEIGHT,
            suffix: SUFFIX_WEIGHT,
            position: POSITION_WEIGHT,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> u32 {
        self.quote + self.prefix + self.suffix + self.position
    }

    /// Weighted, normalised score. Zero total weight scores zero.
    pub fn combine(&self, components: &ScoreComponents) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }

        let raw = f64::from(self.quote) * components.quote
            + f64::from(self.prefix) * components.prefix
            + f64::from(self.suffix) * components.suffix
            + f64::from(self.position) * components.position;

        raw / f64::from(total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub accept: f64,
    pub no_context: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            accept: ACCEPT_THRESHOLD,
            no_context: NO_CONTEXT_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn accepts(&self, score: f64) -> bool {
        score >= self.accept
    }

    pub fn accepts_without_context(&self, score: f64) -> bool {
        score >= self.no_context
    }
}

/// Per-signal similarities for one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreComponents {
    pub quote: f64,
    pub prefix: f64,
    pub suffix: f64,
    pub position: f64,
}

impl Default for ScoreComponents {
    /// Every signal neutral.
    fn default() -> Self {
        Self {
            quote: 1.0,
            prefix: 1.0,
            suffix: 1.0,
            position: 1.0,
        }
    }
}

/// `1 - errors / len`, the similarity of a match with `errors` edits.
pub fn quote_similarity(errors: usize, quote_len: usize) -> f64 {
    if quote_len == 0 {
        return 0.0;
    }
    (1.0 - errors as f64 / quote_len as f64).max(0.0)
}

/// How well `expected` context appears inside `window`, the slice of the
/// document next to a candidate. An empty window scores zero.
pub fn context_similarity(window: &[char], expected: &[char]) -> f64 {
    if expected.is_empty() || window.is_empty() {
        return 0.0;
    }
    quote_similarity(min_distance(window, expected), expected.len())
}

/// Closeness of a candidate start to the expected offset, relative to the
/// document length. Never negative.
pub fn position_similarity(start: usize, hint: usize, text_len: usize) -> f64 {
    if text_len == 0 {
        return 0.0;
    }
    (1.0 - start.abs_diff(hint) as f64 / text_len as f64).max(0.0)
}
