//! Content digests for change detection.
//!
//! The owning system stores a digest next to each document whose highlights
//! depend on it. When [`has_content_changed`] reports a change, every
//! highlight of that document must be re-anchored before its offsets are
//! trusted again.
//!
//! Two formats are produced:
//! - SHA-256, bare lowercase hex (64 chars). The default.
//! - xxh3-64, written as `xxh3:` followed by 16 hex chars. Much faster,
//!   adequate for equality checks on trusted content.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

const XXH3_PREFIX: &str = "xxh3:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Xxh3,
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Xxh3 => write!(f, "xxh3"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    #[error("unrecognised content digest: {digest:?}")]
    Unrecognised { digest: String },
}

/// SHA-256 digest of `content` as lowercase hex.
pub fn compute_content_hash(content: &str) -> String {
    compute_content_hash_with(content, HashAlgorithm::Sha256)
}

/// Digest of `content` in the format of `algorithm`.
pub fn compute_content_hash_with(content: &str, algorithm: HashAlgorithm) -> String {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update(content.as_bytes());
            hex::encode(hasher.finalize())
        }
        HashAlgorithm::Xxh3 => format!("{XXH3_PREFIX}{:016x}", xxh3_64(content.as_bytes())),
    }
}

/// Work out which algorithm produced a stored digest.
pub fn detect_algorithm(digest: &str) -> Result<HashAlgorithm, HashError> {
    let is_hex = |s: &str| s.chars().all(|c| c.is_ascii_hexdigit());

    if let Some(rest) = digest.strip_prefix(XXH3_PREFIX) {
        if rest.len() == 16 && is_hex(rest) {
            return Ok(HashAlgorithm::Xxh3);
        }
    } else if digest.len() == 64 && is_hex(digest) {
        return Ok(HashAlgorithm::Sha256);
    }

    Err(HashError::Unrecognised {
        digest: digest.to_string(),
    })
}

/// Whether `content` no longer matches `stored`.
///
/// The algorithm is taken from the stored digest. Hex digits compare
/// case-insensitively, so a digest stored in uppercase still matches; the
/// `xxh3:` prefix must be lowercase. A digest that cannot be recognised
/// counts as changed, so affected highlights get re-anchored.
pub fn has_content_changed(content: &str, stored: &str) -> bool {
    match detect_algorithm(stored) {
        Ok(algorithm) => {
            !compute_content_hash_with(content, algorithm).eq_ignore_ascii_case(stored)
        }
        Err(e) => {
            tracing::warn!(error = %e, "treating content as changed");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            compute_content_hash("hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = compute_content_hash("Dear journal, today was long.");
        let b = compute_content_hash("Dear journal, today was long.");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_xxh3_format() {
        let digest = compute_content_hash_with("hello world", HashAlgorithm::Xxh3);
        assert!(digest.starts_with("xxh3:"));
        assert_eq!(digest.len(), 5 + 16);
        assert_eq!(detect_algorithm(&digest), Ok(HashAlgorithm::Xxh3));
    }

    #[test]
    fn test_has_content_changed() {
        let stored = compute_content_hash("original entry");
        assert!(!has_content_changed("original entry", &stored));
        assert!(has_content_changed("original entry, edited", &stored));
    }

    #[test]
    fn test_has_content_changed_xxh3() {
        let stored = compute_content_hash_with("original entry", HashAlgorithm::Xxh3);
        assert!(!has_content_changed("original entry", &stored));
        assert!(has_content_changed("0riginal entry", &stored));
    }

    #[test]
    fn test_uppercase_digest_accepted() {
        let stored = compute_content_hash("abc").to_uppercase();
        assert!(!has_content_changed("abc", &stored));

        let xxh3 = compute_content_hash_with("abc", HashAlgorithm::Xxh3);
        let upper_hex = format!("xxh3:{}", xxh3["xxh3:".len()..].to_uppercase());
        assert!(!has_content_changed("abc", &upper_hex));
        assert!(has_content_changed("abc", &xxh3.to_uppercase()));
    }

    #[test]
    fn test_unrecognised_digest_counts_as_changed() {
        assert!(has_content_changed("abc", "not-a-digest"));
        assert!(has_content_changed("abc", ""));
        assert!(matches!(
            detect_algorithm("xxh3:zz"),
            Err(HashError::Unrecognised { .. })
        ));
    }
}
