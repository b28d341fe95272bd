use thiserror::Error;

/// Why a quote could not be anchored.
///
/// Every variant is an expected outcome. Callers are meant to skip the quote
/// (or keep a highlight flagged stale), not to abort.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnchorError {
    #[error("quote is empty")]
    EmptyQuote,

    #[error("quote matched 0 locations within {max_errors} errors")]
    NotFound { max_errors: usize },

    #[error("best match scored {score:.3}, below the {threshold} threshold")]
    BelowThreshold { score: f64, threshold: f64 },

    #[error("invalid offset range: [{start}, {end}) in text of length {len}")]
    OffsetOutOfRange { start: usize, end: usize, len: usize },

    #[error("selector text mismatch at offset {start}: expected {expected:?}, found {found:?}")]
    ExactMismatch {
        start: usize,
        expected: String,
        found: String,
    },
}

impl AnchorError {
    /// The quote could not be located with enough confidence.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AnchorError::NotFound { .. } | AnchorError::BelowThreshold { .. }
        )
    }

    /// The input itself was unusable (empty quote, offsets out of range).
    pub fn is_invalid_input(&self) -> bool {
        !self.is_not_found()
    }
}
