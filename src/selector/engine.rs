use super::errors::AnchorError;
use super::score::{context_similarity, position_similarity, quote_similarity, ScoreComponents};
use super::types::{MatchContext, QuoteMatch, TextSelector};
use crate::config::AnchorConfig;
use crate::search::{self, find_first, max_errors_with_cap, Match};
use crate::text::CharText;

/// Anchors quotes to documents under a given [`AnchorConfig`].
///
/// Holds no state besides its configuration; every operation is a pure
/// function of its arguments, so one `Anchorer` can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Anchorer {
    config: AnchorConfig,
}

/// Context with the characters decoded once, empty strings dropped and the
/// hint moved to a character index.
struct PreparedContext {
    prefix: Option<Vec<char>>,
    suffix: Option<Vec<char>>,
    hint: Option<usize>,
}

impl PreparedContext {
    fn new(doc: &CharText<'_>, context: &MatchContext) -> Self {
        let decode = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| s.chars().collect::<Vec<_>>())
        };
        Self {
            prefix: decode(&context.prefix),
            suffix: decode(&context.suffix),
            hint: context.hint.map(|hint| doc.char_index_floor(hint)),
        }
    }
}

impl Anchorer {
    pub fn new(config: AnchorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnchorConfig {
        &self.config
    }

    /// Find the most plausible location of `quote` in `text`.
    ///
    /// Candidates come from a bounded fuzzy search and are ranked by quote
    /// similarity plus whatever context is supplied. The best candidate is
    /// returned only if it clears the acceptance threshold.
    pub fn match_quote(
        &self,
        text: &str,
        quote: &str,
        context: &MatchContext,
    ) -> Result<QuoteMatch, AnchorError> {
        let doc = CharText::new(text);
        let quote: Vec<char> = quote.chars().collect();
        let found = self.locate(&doc, &quote, context)?;
        Ok(QuoteMatch {
            start: doc.to_utf16(found.start),
            end: doc.to_utf16(found.end),
            ..found
        })
    }

    /// [`match_quote`](Self::match_quote) over an already decoded document.
    /// The returned span is in character indices.
    pub(crate) fn locate(
        &self,
        doc: &CharText<'_>,
        quote: &[char],
        context: &MatchContext,
    ) -> Result<QuoteMatch, AnchorError> {
        let best = self.best_match(doc, quote, context)?;

        if !self.config.thresholds.accepts(best.score) {
            tracing::debug!(
                score = best.score,
                threshold = self.config.thresholds.accept,
                "best match rejected"
            );
            return Err(AnchorError::BelowThreshold {
                score: best.score,
                threshold: self.config.thresholds.accept,
            });
        }
        Ok(best)
    }

    /// Build a selector for `quote`, a span expected to exist verbatim (or
    /// nearly so) in `text`.
    ///
    /// Tries, in order: the caller's `start_hint`, the first literal
    /// occurrence, then a context-free fuzzy match held to the stricter
    /// no-context threshold. `start_hint` is a UTF-16 offset, like the
    /// offsets of the returned selector.
    pub fn compute_selector(
        &self,
        text: &str,
        quote: &str,
        start_hint: Option<usize>,
    ) -> Result<TextSelector, AnchorError> {
        if quote.is_empty() {
            return Err(AnchorError::EmptyQuote);
        }

        let doc = CharText::new(text);
        let quote: Vec<char> = quote.chars().collect();

        let confirmed = start_hint
            .and_then(|hint| doc.char_index(hint))
            .filter(|&hint| confirms(&doc, &quote, hint));

        let (start, end) = if let Some(hint) = confirmed {
            tracing::trace!(hint, "start hint confirmed");
            (hint, hint + quote.len())
        } else if let Some(start) = find_first(doc.chars(), &quote) {
            tracing::trace!(start, "literal occurrence found");
            (start, start + quote.len())
        } else {
            let best = self.best_match(&doc, &quote, &MatchContext::default())?;
            if !self.config.thresholds.accepts_without_context(best.score) {
                tracing::debug!(
                    score = best.score,
                    threshold = self.config.thresholds.no_context,
                    "fuzzy match rejected without context"
                );
                return Err(AnchorError::BelowThreshold {
                    score: best.score,
                    threshold: self.config.thresholds.no_context,
                });
            }
            tracing::debug!(
                start = best.start,
                errors = best.errors,
                score = best.score,
                "quote anchored by fuzzy match"
            );
            (best.start, best.end)
        };

        Ok(TextSelector::from_char_range(&doc, start, end, self.config.context_length))
    }

    /// Highest scoring candidate for `quote`, with no threshold applied, in
    /// character indices. Ties go to the earliest candidate.
    fn best_match(
        &self,
        doc: &CharText<'_>,
        quote: &[char],
        context: &MatchContext,
    ) -> Result<QuoteMatch, AnchorError> {
        if quote.is_empty() {
            return Err(AnchorError::EmptyQuote);
        }

        let max_errors = max_errors_with_cap(quote.len(), self.config.max_error_cap);
        let candidates = search::search(doc.chars(), quote, max_errors);
        let context = PreparedContext::new(doc, context);

        let mut best: Option<QuoteMatch> = None;
        for candidate in &candidates {
            let score = self.score(doc, quote.len(), candidate, &context);
            if best.map_or(true, |b| score > b.score) {
                best = Some(QuoteMatch {
                    start: candidate.start,
                    end: candidate.end,
                    errors: candidate.errors,
                    score,
                });
            }
        }

        best.ok_or(AnchorError::NotFound { max_errors })
    }

    fn score(
        &self,
        doc: &CharText<'_>,
        quote_len: usize,
        candidate: &Match,
        context: &PreparedContext,
    ) -> f64 {
        let chars = doc.chars();
        let mut components = ScoreComponents {
            quote: quote_similarity(candidate.errors, quote_len),
            ..ScoreComponents::default()
        };

        if let Some(prefix) = &context.prefix {
            let from = candidate.start.saturating_sub(prefix.len());
            components.prefix = context_similarity(&chars[from..candidate.start], prefix);
        }
        if let Some(suffix) = &context.suffix {
            let to = candidate.end.saturating_add(suffix.len()).min(chars.len());
            components.suffix = context_similarity(&chars[candidate.end..to], suffix);
        }
        if let Some(hint) = context.hint {
            components.position = position_similarity(candidate.start, hint, doc.len());
        }

        self.config.weights.combine(&components)
    }
}

/// Does `quote` sit exactly at character index `hint`?
fn confirms(doc: &CharText<'_>, quote: &[char], hint: usize) -> bool {
    hint.checked_add(quote.len())
        .and_then(|end| doc.chars().get(hint..end))
        .is_some_and(|window| window == quote)
}

/// [`Anchorer::match_quote`] with the default configuration.
pub fn match_quote(
    text: &str,
    quote: &str,
    context: &MatchContext,
) -> Result<QuoteMatch, AnchorError> {
    Anchorer::default().match_quote(text, quote, context)
}

/// [`Anchorer::compute_selector`] with the default configuration.
pub fn compute_selector(
    text: &str,
    quote: &str,
    start_hint: Option<usize>,
) -> Result<TextSelector, AnchorError> {
    Anchorer::default().compute_selector(text, quote, start_hint)
}
