//! Selector construction and context-aware quote matching.
//!
//! [`compute_selector`] anchors a freshly proposed quote; [`match_quote`]
//! ranks fuzzy candidates using optional prefix/suffix/position hints and is
//! the building block for re-anchoring.

pub mod engine;
pub mod errors;
pub mod score;
pub mod types;

pub use engine::{compute_selector, match_quote, Anchorer};
pub use errors::AnchorError;
pub use score::{
    ScoreComponents, ScoreWeights, Thresholds, ACCEPT_THRESHOLD, CONTEXT_LENGTH,
    NO_CONTEXT_THRESHOLD,
};
pub use types::{Anchor, MatchContext, QuoteMatch, TextSelector};
