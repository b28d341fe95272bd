pub mod loader;
pub mod schema;

pub use loader::{
    load_from_path, load_from_str, load_manifest_from_path, load_manifest_from_str, ConfigError,
};
pub use schema::{
    AnchorConfig, HashingConfig, ManifestMeta, QuoteEntry, QuoteManifest, Validate,
    ValidationError, ValidationIssue,
};
