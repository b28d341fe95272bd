//! Re-anchoring stored selectors after a document edit.
//!
//! A selector's offsets are only trustworthy against the exact content they
//! were computed from. Once the content digest changes, each highlight is
//! flagged stale and relocated by context-aware fuzzy matching on its stored
//! `exact`/`prefix`/`suffix`, with the old start offset as a position hint.

use crate::hash::{compute_content_hash_with, has_content_changed};
use crate::selector::{Anchor, AnchorError, Anchorer, MatchContext, TextSelector};
use crate::text::CharText;
use serde::{Deserialize, Serialize};

/// A persisted highlight as the surrounding system stores it.
///
/// Only the selector portion and the stale flag are managed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: String,
    pub entry_id: String,
    pub part_analysis_id: String,
    #[serde(flatten)]
    pub selector: TextSelector,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub is_stale: bool,
}

impl Highlight {
    pub fn new(
        id: impl Into<String>,
        entry_id: impl Into<String>,
        part_analysis_id: impl Into<String>,
        selector: TextSelector,
    ) -> Self {
        Self {
            id: id.into(),
            entry_id: entry_id.into(),
            part_analysis_id: part_analysis_id.into(),
            selector,
            reasoning: None,
            is_stale: false,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

/// Outcome of [`Anchorer::refresh_highlights`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    /// Digest of the content the highlights now refer to.
    pub content_hash: String,
    pub content_changed: bool,
    /// Re-anchored at their previous offsets with the same text.
    pub unchanged: usize,
    /// Re-anchored at their previous offsets, but the quoted text itself
    /// was edited.
    pub edited: usize,
    /// Re-anchored at new offsets.
    pub relocated: usize,
    /// Ids of highlights that could not be re-anchored and stay stale.
    pub failed: Vec<String>,
}

impl Anchorer {
    /// New offsets for a previously computed selector in `text`.
    pub fn reanchor(&self, text: &str, selector: &TextSelector) -> Result<Anchor, AnchorError> {
        self.reanchor_selector(text, selector).map(|selector| selector.anchor())
    }

    /// Re-anchor and rebuild the whole selector, so the stored exact text
    /// and context describe the current content.
    pub fn reanchor_selector(
        &self,
        text: &str,
        selector: &TextSelector,
    ) -> Result<TextSelector, AnchorError> {
        let doc = CharText::new(text);
        let quote: Vec<char> = selector.exact.chars().collect();
        let found = self.locate(&doc, &quote, &MatchContext::from(selector))?;
        Ok(TextSelector::from_char_range(
            &doc,
            found.start,
            found.end,
            self.config().context_length,
        ))
    }

    /// Bring a document's highlights in line with its current `text`.
    ///
    /// If `stored_hash` is missing or no longer matches, every highlight is
    /// marked stale first. Each stale highlight is then re-anchored: on
    /// success its selector is replaced and the flag cleared, on failure it
    /// keeps its old selector and stays stale.
    pub fn refresh_highlights(
        &self,
        text: &str,
        stored_hash: Option<&str>,
        highlights: &mut [Highlight],
    ) -> RefreshReport {
        let content_changed = stored_hash.map_or(true, |hash| has_content_changed(text, hash));
        let mut report = RefreshReport {
            content_hash: compute_content_hash_with(text, self.config().hashing.algorithm),
            content_changed,
            ..RefreshReport::default()
        };

        if content_changed {
            for highlight in highlights.iter_mut() {
                highlight.is_stale = true;
            }
        }

        for highlight in highlights.iter_mut().filter(|h| h.is_stale) {
            match self.reanchor_selector(text, &highlight.selector) {
                Ok(selector) => {
                    if selector.anchor() != highlight.selector.anchor() {
                        tracing::debug!(
                            id = %highlight.id,
                            from = highlight.selector.start_offset,
                            to = selector.start_offset,
                            "highlight relocated"
                        );
                        report.relocated += 1;
                    } else if selector.exact != highlight.selector.exact {
                        tracing::debug!(
                            id = %highlight.id,
                            from = %highlight.selector.exact,
                            to = %selector.exact,
                            "highlight text edited in place"
                        );
                        report.edited += 1;
                    } else {
                        report.unchanged += 1;
                    }
                    highlight.selector = selector;
                    highlight.is_stale = false;
                }
                Err(e) => {
                    tracing::debug!(id = %highlight.id, error = %e, "highlight left stale");
                    report.failed.push(highlight.id.clone());
                }
            }
        }

        report
    }
}

/// [`Anchorer::reanchor`] with the default configuration.
pub fn reanchor_highlight(text: &str, selector: &TextSelector) -> Result<Anchor, AnchorError> {
    Anchorer::default().reanchor(text, selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::compute_content_hash;
    use crate::selector::compute_selector;

    const ENTRY: &str = "Today I felt anxious about the meeting (42/100). \
        A part of me kept saying I'm not good enough to be loved. \
        Later, walking home, I felt calmer.";

    fn highlight(id: &str, quote: &str) -> Highlight {
        let selector = compute_selector(ENTRY, quote, None).unwrap();
        Highlight::new(id, "entry-1", "analysis-1", selector)
    }

    #[test]
    fn test_reanchor_round_trip() {
        let selector = compute_selector(ENTRY, "not good enough to be loved", None).unwrap();
        let anchor = reanchor_highlight(ENTRY, &selector).unwrap();
        assert_eq!(anchor, selector.anchor());
    }

    #[test]
    fn test_reanchor_after_insertion_before_quote() {
        let selector = compute_selector(ENTRY, "walking home", None).unwrap();
        let edited = format!("[edited] {ENTRY}");
        let anchor = reanchor_highlight(&edited, &selector).unwrap();
        assert_eq!(anchor.start_offset, selector.start_offset + 9);
        assert_eq!(anchor.end_offset, selector.end_offset + 9);
    }

    #[test]
    fn test_reanchor_fails_when_content_rewritten() {
        let selector = compute_selector(ENTRY, "walking home", None).unwrap();
        let err = reanchor_highlight("1234 5678 9012 3456", &selector).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_reanchor_selector_refreshes_context() {
        let selector = compute_selector(ENTRY, "walking home", None).unwrap();
        let edited = ENTRY.replace("Later,", "Much later,");
        let refreshed = Anchorer::default()
            .reanchor_selector(&edited, &selector)
            .unwrap();
        assert_eq!(refreshed.exact, "walking home");
        assert!(refreshed.prefix.ends_with("Much later, "));
        assert!(refreshed.verify(&edited).is_ok());
    }

    #[test]
    fn test_refresh_unchanged_content_is_noop() {
        let mut highlights = vec![highlight("h1", "felt anxious")];
        let stored = compute_content_hash(ENTRY);
        let report = Anchorer::default().refresh_highlights(
            ENTRY,
            Some(stored.as_str()),
            &mut highlights,
        );

        assert!(!report.content_changed);
        assert_eq!(report.content_hash, stored);
        assert_eq!(report.unchanged + report.relocated, 0);
        assert!(!highlights[0].is_stale);
    }

    #[test]
    fn test_refresh_after_edit() {
        let mut highlights = vec![
            highlight("h1", "felt anxious"),
            highlight("h2", "walking home"),
        ];
        let stored = compute_content_hash(ENTRY);
        let edited = ENTRY.replace("Later, walking home", "Later, walking home slowly");

        let report = Anchorer::default().refresh_highlights(
            &edited,
            Some(stored.as_str()),
            &mut highlights,
        );

        assert!(report.content_changed);
        assert_eq!(report.unchanged, 2);
        assert_eq!(report.relocated, 0);
        assert!(report.failed.is_empty());
        assert!(highlights.iter().all(|h| !h.is_stale));
        assert_eq!(highlights[1].selector.suffix, " slowly, I felt calmer.");
    }

    #[test]
    fn test_refresh_relocates_and_reports_failures() {
        let mut highlights = vec![
            highlight("h1", "walking home"),
            highlight("h2", "(42/100)"),
        ];
        let edited = format!(
            "Prologue. {}",
            ENTRY.replace("Today I felt anxious about the meeting (42/100). ", "")
        );

        let report = Anchorer::default().refresh_highlights(&edited, None, &mut highlights);

        assert!(report.content_changed);
        assert_eq!(report.relocated, 1);
        assert_eq!(report.failed, vec!["h2".to_string()]);
        assert!(!highlights[0].is_stale);
        assert!(highlights[0].selector.verify(&edited).is_ok());
        assert!(highlights[1].is_stale);
    }

    #[test]
    fn test_refresh_counts_text_edited_in_place() {
        let mut highlights = vec![highlight("h1", "felt anxious")];
        let edited = ENTRY.replace("anxious", "anxiuos");

        let report = Anchorer::default().refresh_highlights(&edited, None, &mut highlights);

        assert_eq!(report.edited, 1);
        assert_eq!(report.unchanged + report.relocated, 0);
        assert_eq!(highlights[0].selector.exact, "felt anxiuos");
        assert_eq!(highlights[0].selector.anchor().start_offset, 8);
    }

    #[test]
    fn test_refresh_keeps_utf16_offsets() {
        // Offsets as a JavaScript client stores them: the emoji counts twice.
        let text = "Felt 😀 today. The brown fox returned.";
        let stored = TextSelector {
            start_offset: 19,
            end_offset: 28,
            exact: "brown fox".to_string(),
            prefix: "Felt 😀 today. The ".to_string(),
            suffix: " returned.".to_string(),
        };
        let mut highlights = vec![Highlight::new("h1", "entry-1", "analysis-1", stored.clone())];

        let report = Anchorer::default().refresh_highlights(text, None, &mut highlights);
        assert_eq!(report.unchanged, 1);
        assert_eq!(highlights[0].selector, stored);

        let edited = format!("Feeling 🌧. {text}");
        let report = Anchorer::default().refresh_highlights(&edited, None, &mut highlights);
        assert_eq!(report.relocated, 1);
        assert_eq!(highlights[0].selector.start_offset, 31);
        assert!(highlights[0].selector.verify(&edited).is_ok());
    }

    #[test]
    fn test_refresh_retries_flagged_highlights() {
        let mut highlights = vec![highlight("h1", "felt calmer")];
        highlights[0].is_stale = true;
        let stored = compute_content_hash(ENTRY);

        let report = Anchorer::default().refresh_highlights(
            ENTRY,
            Some(stored.as_str()),
            &mut highlights,
        );

        assert!(!report.content_changed);
        assert_eq!(report.unchanged, 1);
        assert!(!highlights[0].is_stale);
    }

    #[test]
    fn test_highlight_serde_shape() {
        let h = highlight("h1", "walking home").with_reasoning("self-soothing part");
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["entryId"], "entry-1");
        assert_eq!(json["partAnalysisId"], "analysis-1");
        assert_eq!(json["exact"], "walking home");
        assert_eq!(json["isStale"], false);
        let back: Highlight = serde_json::from_value(json).unwrap();
        assert_eq!(back, h);
    }
}
