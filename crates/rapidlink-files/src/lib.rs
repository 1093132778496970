//! # rapidlink Files
//!
//! Identity extraction for rapid-upload links.
//!
//! A file is identified by four values: its name, its exact length, the MD5
//! of its full content and the MD5 of its first 256 KiB (the "slice" or
//! "prefix" hash). This crate provides:
//! - [`FileIdentity`], the immutable identity value
//! - [`compute`] and the [`IdentityExtractor`] seam for in-memory bytes
//! - [`IncrementalIdentityHasher`] for streaming readers and files on disk

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hasher;
pub mod incremental;

pub use hasher::{IdentityExtractor, Md5Extractor, compute};
pub use incremental::{IncrementalIdentityHasher, compute_from_path, compute_from_reader};

/// Number of leading bytes covered by the prefix hash (256 KiB)
pub const PREFIX_LEN: usize = 256 * 1024;

/// Length of a rendered digest in hex characters
pub const HASH_HEX_LEN: usize = 32;

/// MD5 of zero bytes, rendered the way identities render digests
pub const EMPTY_MD5: &str = "D41D8CD98F00B204E9800998ECF8427E";

/// Content-derived identity of a file
///
/// Built either by hashing bytes or by decoding a link, then consumed by
/// encoders. There is no way to mutate an identity after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    name: String,
    length: u64,
    full_hash: String,
    prefix_hash: String,
}

impl FileIdentity {
    /// Create an identity from already known parts.
    ///
    /// Hashes are stored verbatim; no case normalization is applied.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        length: u64,
        full_hash: impl Into<String>,
        prefix_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            length,
            full_hash: full_hash.into(),
            prefix_hash: prefix_hash.into(),
        }
    }

    /// Original file name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exact byte count
    #[must_use]
    pub fn length(&self) -> u64 {
        self.length
    }

    /// MD5 of the entire content
    #[must_use]
    pub fn full_hash(&self) -> &str {
        &self.full_hash
    }

    /// MD5 of the first `min(length, 256 KiB)` bytes
    #[must_use]
    pub fn prefix_hash(&self) -> &str {
        &self.prefix_hash
    }

    /// Whether both hashes are 32 uppercase hex characters.
    ///
    /// Always true for computed identities. Decoded identities keep the case
    /// found in the link text and may report `false`.
    #[must_use]
    pub fn has_canonical_hashes(&self) -> bool {
        is_canonical_hash(&self.full_hash) && is_canonical_hash(&self.prefix_hash)
    }
}

fn is_canonical_hash(hash: &str) -> bool {
    hash.len() == HASH_HEX_LEN
        && hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let id = FileIdentity::new("a.txt", 5, "A".repeat(32), "B".repeat(32));
        assert_eq!(id.name(), "a.txt");
        assert_eq!(id.length(), 5);
        assert_eq!(id.full_hash(), "A".repeat(32));
        assert_eq!(id.prefix_hash(), "B".repeat(32));
        assert!(id.has_canonical_hashes());
    }

    #[test]
    fn test_canonical_hash_check() {
        let lower = FileIdentity::new("x", 0, EMPTY_MD5.to_lowercase(), EMPTY_MD5);
        assert!(!lower.has_canonical_hashes());

        let short = FileIdentity::new("x", 0, "ABC", EMPTY_MD5);
        assert!(!short.has_canonical_hashes());

        let non_hex = FileIdentity::new("x", 0, "G".repeat(32), EMPTY_MD5);
        assert!(!non_hex.has_canonical_hashes());
    }
}
