//! Streaming identity hashing for readers and files on disk.
//!
//! Both digests are fed as data arrives: every byte goes to the full-content
//! digest, and bytes are forwarded to the prefix digest until 256 KiB have
//! been seen. The result is identical to [`crate::compute`] over the same
//! bytes, without holding the file in memory.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::{FileIdentity, PREFIX_LEN};

/// Default read buffer size (64 KiB)
pub const DEFAULT_READ_BUFFER: usize = 64 * 1024;

/// Incremental identity hasher for streaming data
///
/// # Example
///
/// ```
/// use rapidlink_files::{IncrementalIdentityHasher, compute};
///
/// let mut hasher = IncrementalIdentityHasher::new();
/// hasher.update(b"hel");
/// hasher.update(b"lo");
///
/// assert_eq!(hasher.finalize("a.txt"), compute("a.txt", 5, b"hello"));
/// ```
#[derive(Clone, Default)]
pub struct IncrementalIdentityHasher {
    full: Md5,
    prefix: Md5,
    length: u64,
}

impl IncrementalIdentityHasher {
    /// Create a new incremental hasher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Update with new data
    pub fn update(&mut self, data: &[u8]) {
        let prefix_remaining = (PREFIX_LEN as u64).saturating_sub(self.length);
        if prefix_remaining > 0 {
            let take = data.len().min(prefix_remaining as usize);
            self.prefix.update(&data[..take]);
        }

        self.full.update(data);
        self.length += data.len() as u64;
    }

    /// Bytes hashed so far
    #[must_use]
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Finalize into an identity named `name`
    #[must_use]
    pub fn finalize(self, name: &str) -> FileIdentity {
        tracing::debug!("Finalized identity for {:?} ({} bytes)", name, self.length);

        FileIdentity::new(
            name,
            self.length,
            hex::encode_upper(self.full.finalize()),
            hex::encode_upper(self.prefix.finalize()),
        )
    }
}

/// Compute an identity by draining `reader`.
///
/// `on_progress` receives the running byte count after every read.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn compute_from_reader<R: Read>(
    name: &str,
    mut reader: R,
    buffer_size: usize,
    mut on_progress: impl FnMut(u64),
) -> io::Result<FileIdentity> {
    let mut hasher = IncrementalIdentityHasher::new();
    let mut buffer = vec![0u8; buffer_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        hasher.update(&buffer[..bytes_read]);
        on_progress(hasher.length());
    }

    Ok(hasher.finalize(name))
}

/// Compute the identity of the file at `path`.
///
/// The identity is named after the last path component.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
///
/// # Example
///
/// ```no_run
/// use rapidlink_files::compute_from_path;
///
/// let id = compute_from_path("/path/to/archive.zip")?;
/// println!("{} {}", id.full_hash(), id.prefix_hash());
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn compute_from_path<P: AsRef<Path>>(path: P) -> io::Result<FileIdentity> {
    let path = path.as_ref();
    let file = File::open(path)?;
    compute_from_reader(&file_name(path), file, DEFAULT_READ_BUFFER, |_| {})
}

/// Name used for a file's identity: its final path component
#[must_use]
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EMPTY_MD5, compute};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_incremental_empty() {
        let id = IncrementalIdentityHasher::new().finalize("empty");
        assert_eq!(id.length(), 0);
        assert_eq!(id.full_hash(), EMPTY_MD5);
        assert_eq!(id.prefix_hash(), EMPTY_MD5);
    }

    #[test]
    fn test_incremental_vs_batch() {
        let data: Vec<u8> = (0..1024 * 1024u32).map(|i| (i % 251) as u8).collect();
        let batch = compute("big.bin", data.len() as u64, &data);

        // Odd-sized pieces straddle the prefix boundary
        let mut hasher = IncrementalIdentityHasher::new();
        for chunk in data.chunks(100_003) {
            hasher.update(chunk);
        }
        assert_eq!(hasher.length(), data.len() as u64);
        assert_eq!(hasher.finalize("big.bin"), batch);
    }

    #[test]
    fn test_single_update_across_boundary() {
        let data = vec![0xAB; PREFIX_LEN + 1];
        let mut hasher = IncrementalIdentityHasher::new();
        hasher.update(&data);
        let id = hasher.finalize("over.bin");
        assert_eq!(id.prefix_hash(), "F4EA7EB6967AB90233F87A40AE1C4CA1");
    }

    #[test]
    fn test_reader_progress() {
        let data = vec![0x11; 10_000];
        let mut seen = Vec::new();
        let id = compute_from_reader("r.bin", &data[..], 4096, |n| seen.push(n)).unwrap();

        assert_eq!(seen, vec![4096, 8192, 10_000]);
        assert_eq!(id, compute("r.bin", 10_000, &data));
    }

    #[test]
    fn test_from_path_uses_file_name() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"hello").unwrap();
        temp_file.flush().unwrap();

        let id = compute_from_path(temp_file.path()).unwrap();
        let expected_name = file_name(temp_file.path());

        assert_eq!(id.name(), expected_name);
        assert_eq!(id.length(), 5);
        assert_eq!(id.full_hash(), "5D41402ABC4B2A76B9719D911017C592");
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = compute_from_path(dir.path().join("missing.bin")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
