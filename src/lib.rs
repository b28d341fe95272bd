//! Quote Anchor: locate quoted spans in mutable documents
//!
//! Anchors short quotes ("highlights") to offsets inside a larger document,
//! and relocates them after the document has been edited. Offsets count
//! UTF-16 code units, the unit persisted highlights use.
//!
//! # Architecture
//!
//! - [`search`]: bounded approximate string search. Literal occurrences are
//!   found directly; otherwise every substring within a Levenshtein budget
//!   is reported with its error count.
//! - [`selector`]: builds [`TextSelector`]s and ranks fuzzy candidates by
//!   quote similarity, prefix/suffix context and position.
//! - [`reanchor`] and [`hash`]: content digests flag edited documents, and
//!   stored selectors are re-anchored against the new content.
//!
//! Everything is synchronous and pure: no I/O and no shared state. Failing
//! to anchor a quote is an ordinary outcome reported as [`AnchorError`].
//!
//! # Example
//!
//! ```
//! use quote_anchor::{compute_selector, reanchor_highlight};
//!
//! let text = "The quick brown fox jumps over the lazy dog";
//! let selector = compute_selector(text, "brown fox", None).unwrap();
//! assert_eq!((selector.start_offset, selector.end_offset), (10, 19));
//!
//! let edited = format!("Once upon a time: {text}");
//! let anchor = reanchor_highlight(&edited, &selector).unwrap();
//! assert_eq!(anchor.start_offset, 28);
//! ```

pub mod batch;
pub mod config;
pub mod hash;
pub mod reanchor;
pub mod search;
pub mod selector;
pub mod text;

// Re-exports
pub use batch::{anchor_quotes, AnchorOutcome, OutcomeRecord};
pub use config::{
    load_from_path, load_from_str, load_manifest_from_path, load_manifest_from_str,
    AnchorConfig, ConfigError, QuoteEntry, QuoteManifest,
};
pub use hash::{
    compute_content_hash, compute_content_hash_with, has_content_changed, HashAlgorithm,
    HashError,
};
pub use reanchor::{reanchor_highlight, Highlight, RefreshReport};
pub use search::{max_errors_for, search, Match};
pub use selector::{
    compute_selector, match_quote, Anchor, AnchorError, Anchorer, MatchContext, QuoteMatch,
    TextSelector,
};
