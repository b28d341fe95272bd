//! Anchoring many proposed quotes against one document.
//!
//! Quotes are independent, so with the `parallel` feature they are matched
//! on the rayon pool. Results always come back in input order.

use crate::config::QuoteEntry;
use crate::selector::{AnchorError, Anchorer, TextSelector};
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of anchoring one [`QuoteEntry`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorOutcome {
    pub id: String,
    pub result: Result<TextSelector, AnchorError>,
}

impl AnchorOutcome {
    pub fn is_anchored(&self) -> bool {
        self.result.is_ok()
    }
}

/// Serializable view of an [`AnchorOutcome`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum OutcomeRecord<'a> {
    Anchored {
        id: &'a str,
        selector: &'a TextSelector,
    },
    Skipped {
        id: &'a str,
        reason: String,
    },
}

impl<'a> From<&'a AnchorOutcome> for OutcomeRecord<'a> {
    fn from(outcome: &'a AnchorOutcome) -> Self {
        match &outcome.result {
            Ok(selector) => OutcomeRecord::Anchored {
                id: &outcome.id,
                selector,
            },
            Err(e) => OutcomeRecord::Skipped {
                id: &outcome.id,
                reason: e.to_string(),
            },
        }
    }
}

impl Anchorer {
    /// Compute a selector for every quote. Quotes that cannot be anchored
    /// are reported, not dropped.
    pub fn anchor_quotes(&self, text: &str, quotes: &[QuoteEntry]) -> Vec<AnchorOutcome> {
        let anchor_one = |quote: &QuoteEntry| {
            let result = self.compute_selector(text, &quote.text, quote.hint);
            if let Err(e) = &result {
                tracing::debug!(id = %quote.id, error = %e, "quote skipped");
            }
            AnchorOutcome {
                id: quote.id.clone(),
                result,
            }
        };

        #[cfg(feature = "parallel")]
        let outcomes = quotes.par_iter().map(anchor_one).collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes = quotes.iter().map(anchor_one).collect();

        outcomes
    }
}

/// [`Anchorer::anchor_quotes`] with the default configuration.
pub fn anchor_quotes(text: &str, quotes: &[QuoteEntry]) -> Vec<AnchorOutcome> {
    Anchorer::default().anchor_quotes(text, quotes)
}
