use crate::config::schema::{AnchorConfig, QuoteManifest, Validate, ValidationError};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Toml {
        path: Option<PathBuf>,
        source: toml_edit::de::Error,
    },
    Validation {
        path: Option<PathBuf>,
        source: ValidationError,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Toml { path: None, source } => ConfigError::Toml {
                path: Some(path),
                source,
            },
            ConfigError::Validation { path: None, source } => ConfigError::Validation {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => match path {
                Some(path) => write!(f, "failed to parse TOML ({}): {}", path.display(), source),
                None => write!(f, "failed to parse TOML: {}", source),
            },
            ConfigError::Validation { path, source } => match path {
                Some(path) => write!(f, "invalid configuration ({}): {}", path.display(), source),
                None => write!(f, "invalid configuration: {}", source),
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation { source, .. } => Some(source),
        }
    }
}

fn parse<T: DeserializeOwned + Validate>(input: &str) -> Result<T, ConfigError> {
    let value: T = toml_edit::de::from_str(input)
        .map_err(|source| ConfigError::Toml { path: None, source })?;
    value
        .validate()
        .map_err(|source| ConfigError::Validation { path: None, source })?;
    Ok(value)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and validate an [`AnchorConfig`]. An empty document yields the
/// defaults.
pub fn load_from_str(input: &str) -> Result<AnchorConfig, ConfigError> {
    parse(input)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<AnchorConfig, ConfigError> {
    let path = path.as_ref();
    load_from_str(&read(path)?).map_err(|error| error.with_path(path))
}

pub fn load_manifest_from_str(input: &str) -> Result<QuoteManifest, ConfigError> {
    parse(input)
}

pub fn load_manifest_from_path(path: impl AsRef<Path>) -> Result<QuoteManifest, ConfigError> {
    let path = path.as_ref();
    load_manifest_from_str(&read(path)?).map_err(|error| error.with_path(path))
}
