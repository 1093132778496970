//! MD5 identity hashing for in-memory content.

use md5::{Digest, Md5};

use crate::{FileIdentity, PREFIX_LEN};

/// Render an MD5 digest of `data` as 32 uppercase hex characters
#[must_use]
pub fn md5_hex(data: &[u8]) -> String {
    hex::encode_upper(Md5::digest(data))
}

/// Compute the identity of `bytes`.
///
/// `length` must equal `bytes.len()`; callers own that guarantee.
///
/// # Example
///
/// ```
/// use rapidlink_files::compute;
///
/// let id = compute("a.txt", 5, b"hello");
/// assert_eq!(id.full_hash(), "5D41402ABC4B2A76B9719D911017C592");
/// assert_eq!(id.prefix_hash(), id.full_hash());
/// ```
#[must_use]
pub fn compute(name: &str, length: u64, bytes: &[u8]) -> FileIdentity {
    debug_assert_eq!(
        length,
        bytes.len() as u64,
        "length does not match byte count"
    );
    tracing::debug!("Computing identity for {:?} ({} bytes)", name, length);

    let prefix_end = bytes.len().min(PREFIX_LEN);
    let full_hash = md5_hex(bytes);
    let prefix_hash = md5_hex(&bytes[..prefix_end]);

    FileIdentity::new(name, length, full_hash, prefix_hash)
}

/// Source of file identities for in-memory content.
///
/// The conversion pipeline is generic over this so alternative extractors
/// (instrumented ones in tests, for instance) can be substituted.
pub trait IdentityExtractor {
    /// Compute the identity of `bytes`, named `name`
    fn compute(&self, name: &str, length: u64, bytes: &[u8]) -> FileIdentity;
}

/// MD5 extractor used by rapid-upload clients
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Extractor;

impl IdentityExtractor for Md5Extractor {
    fn compute(&self, name: &str, length: u64, bytes: &[u8]) -> FileIdentity {
        compute(name, length, bytes)
    }
}
