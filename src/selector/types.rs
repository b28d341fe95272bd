use super::errors::AnchorError;
use crate::text::CharText;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Position plus quote description of a span inside a document.
///
/// Follows the shape of the W3C Web Annotation TextPositionSelector and
/// TextQuoteSelector combined. Offsets are UTF-16 code units, `[start, end)`,
/// so they agree with selectors persisted by JavaScript clients. `exact` is
/// the document text at that range when the selector was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSelector {
    pub start_offset: usize,
    pub end_offset: usize,
    pub exact: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}

impl TextSelector {
    /// Build a selector around a known UTF-16 range, taking up to
    /// `context_length` characters of context on each side.
    pub fn from_offsets(
        text: &str,
        start: usize,
        end: usize,
        context_length: usize,
    ) -> Result<Self, AnchorError> {
        let doc = CharText::new(text);
        let out_of_range = || AnchorError::OffsetOutOfRange {
            start,
            end,
            len: doc.utf16_len(),
        };
        if start > end {
            return Err(out_of_range());
        }
        let start = doc.char_index(start).ok_or_else(out_of_range)?;
        let end = doc.char_index(end).ok_or_else(out_of_range)?;
        Ok(Self::from_char_range(&doc, start, end, context_length))
    }

    /// Selector for the character range `start..end` of `doc`. Indices past
    /// the end are clamped.
    pub(crate) fn from_char_range(
        doc: &CharText<'_>,
        start: usize,
        end: usize,
        context_length: usize,
    ) -> Self {
        Self {
            start_offset: doc.to_utf16(start),
            end_offset: doc.to_utf16(end),
            exact: doc.slice_chars(start, end).to_string(),
            prefix: doc
                .slice_chars(start.saturating_sub(context_length), start)
                .to_string(),
            suffix: doc
                .slice_chars(end, end.saturating_add(context_length))
                .to_string(),
        }
    }

    /// Check that the offsets are in range for `text` and still point at
    /// `exact`. Offsets that split a surrogate pair count as out of range.
    pub fn verify(&self, text: &str) -> Result<(), AnchorError> {
        let doc = CharText::new(text);
        let found = doc
            .get(self.start_offset, self.end_offset)
            .ok_or(AnchorError::OffsetOutOfRange {
                start: self.start_offset,
                end: self.end_offset,
                len: doc.utf16_len(),
            })?;

        if found != self.exact {
            return Err(AnchorError::ExactMismatch {
                start: self.start_offset,
                expected: self.exact.clone(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Byte range of this selector inside `text`, for slicing a `&str`.
    pub fn byte_range(&self, text: &str) -> Result<Range<usize>, AnchorError> {
        let doc = CharText::new(text);
        doc.byte_range(self.start_offset, self.end_offset)
            .ok_or(AnchorError::OffsetOutOfRange {
                start: self.start_offset,
                end: self.end_offset,
                len: doc.utf16_len(),
            })
    }

    pub fn anchor(&self) -> Anchor {
        Anchor {
            start_offset: self.start_offset,
            end_offset: self.end_offset,
        }
    }

    /// Span length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A bare offset pair, as produced by re-anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub start_offset: usize,
    pub end_offset: usize,
}

/// A scored candidate location for a quote. As returned by
/// [`match_quote`](super::match_quote), offsets are UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteMatch {
    pub start: usize,
    pub end: usize,
    pub errors: usize,
    /// Confidence in `[0, 1]` that this is the intended span.
    pub score: f64,
}

/// Optional disambiguation hints for [`match_quote`](super::match_quote).
///
/// A missing or empty prefix/suffix means "no information" and never
/// penalises a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchContext {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Expected UTF-16 offset of the match start.
    pub hint: Option<usize>,
}

impl MatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_hint(mut self, hint: usize) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.as_deref().map_or(true, str::is_empty)
            && self.suffix.as_deref().map_or(true, str::is_empty)
            && self.hint.is_none()
    }
}

impl From<&TextSelector> for MatchContext {
    fn from(selector: &TextSelector) -> Self {
        Self {
            prefix: Some(selector.prefix.clone()),
            suffix: Some(selector.suffix.clone()),
            hint: Some(selector.start_offset),
        }
    }
}
