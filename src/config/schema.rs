use crate::hash::HashAlgorithm;
use crate::search::MAX_ERROR_CAP;
use crate::selector::{ScoreWeights, Thresholds, CONTEXT_LENGTH};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Implemented by every TOML document the loader accepts.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Tunable anchoring policy. Every field defaults to the built-in constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorConfig {
    /// Characters of prefix/suffix context stored with each selector.
    pub context_length: usize,
    /// Absolute ceiling on the fuzzy search error budget.
    pub max_error_cap: usize,
    pub weights: ScoreWeights,
    pub thresholds: Thresholds,
    pub hashing: HashingConfig,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            context_length: CONTEXT_LENGTH,
            max_error_cap: MAX_ERROR_CAP,
            weights: ScoreWeights::default(),
            thresholds: Thresholds::default(),
            hashing: HashingConfig::default(),
        }
    }
}

impl Validate for AnchorConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.context_length == 0 {
            issues.push(ValidationIssue::InvalidValue {
                field: "context_length",
                message: "must be at least 1".to_string(),
            });
        }
        if self.weights.total() == 0 {
            issues.push(ValidationIssue::InvalidValue {
                field: "weights",
                message: "at least one weight must be non-zero".to_string(),
            });
        }

        let Thresholds { accept, no_context } = self.thresholds;
        for (field, value) in [
            ("thresholds.accept", accept),
            ("thresholds.no_context", no_context),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ValidationIssue::InvalidValue {
                    field,
                    message: format!("{value} is outside [0, 1]"),
                });
            }
        }
        if no_context < accept {
            issues.push(ValidationIssue::InvalidValue {
                field: "thresholds.no_context",
                message: format!("{no_context} is below thresholds.accept ({accept})"),
            });
        }

        ValidationError::from_issues(issues)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashingConfig {
    pub algorithm: HashAlgorithm,
}

/// A set of proposed quotes to anchor against one document.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct QuoteManifest {
    #[serde(default)]
    pub meta: ManifestMeta,
    #[serde(default)]
    pub quotes: Vec<QuoteEntry>,
}

impl Validate for QuoteManifest {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.quotes.is_empty() {
            issues.push(ValidationIssue::EmptyQuoteList);
        }

        let mut seen = HashSet::new();
        for quote in &self.quotes {
            if quote.id.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    quote_id: None,
                    field: "id",
                });
            } else if !seen.insert(quote.id.as_str()) {
                issues.push(ValidationIssue::DuplicateId {
                    quote_id: quote.id.clone(),
                });
            }
            if quote.text.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    quote_id: Some(quote.id.clone()),
                    field: "text",
                });
            }
        }

        ValidationError::from_issues(issues)
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct ManifestMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Document the quotes were proposed for.
    #[serde(default)]
    pub entry_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct QuoteEntry {
    pub id: String,
    pub text: String,
    /// Expected UTF-16 offset of the quote, if known.
    #[serde(default)]
    pub hint: Option<usize>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl QuoteEntry {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            hint: None,
            reasoning: None,
        }
    }

    pub fn with_hint(mut self, hint: usize) -> Self {
        self.hint = Some(hint);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    fn from_issues(issues: Vec<ValidationIssue>) -> Result<(), ValidationError> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    EmptyQuoteList,
    MissingField {
        quote_id: Option<String>,
        field: &'static str,
    },
    DuplicateId {
        quote_id: String,
    },
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyQuoteList => write!(f, "quote manifest contains no quotes"),
            ValidationIssue::MissingField { quote_id, field } => match quote_id {
                Some(id) => write!(f, "quote '{id}' missing required field '{field}'"),
                None => write!(f, "quote missing required field '{field}'"),
            },
            ValidationIssue::DuplicateId { quote_id } => {
                write!(f, "quote id '{quote_id}' is used more than once")
            }
            ValidationIssue::InvalidValue { field, message } => {
                write!(f, "invalid value for '{field}': {message}")
            }
        }
    }
}
