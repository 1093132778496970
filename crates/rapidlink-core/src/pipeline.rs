//! Conversion pipeline.
//!
//! Composes identity extraction and the link codec:
//! - "create" flows hash content once and encode it into every requested format
//! - "convert" flows decode a link once and re-encode it into every requested format
//!
//! Targets are processed in request order; duplicates are encoded again.

use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use rapidlink_files::incremental::{DEFAULT_READ_BUFFER, file_name};
use rapidlink_files::{FileIdentity, IdentityExtractor, Md5Extractor, compute_from_reader};

use crate::codec::{decode, encode};
use crate::error::{CodecError, Error, Result};
use crate::format::LinkFormat;

/// One encoded link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLink {
    /// Format the link is written in
    pub format: LinkFormat,
    /// Link text
    pub link: String,
}

/// Links created for one file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLinks {
    /// Path the identity was computed from
    pub path: PathBuf,
    /// Computed identity
    pub identity: FileIdentity,
    /// One entry per requested target, in request order
    pub links: Vec<EncodedLink>,
}

/// Observer for hashing files on disk
///
/// `()` ignores all events.
pub trait HashProgress {
    /// A file of `size` bytes is about to be hashed
    fn start(&mut self, path: &Path, size: u64);

    /// `hashed` bytes of the current file have been processed
    fn advance(&mut self, hashed: u64);

    /// The current file is done
    fn finish(&mut self, path: &Path);
}

impl HashProgress for () {
    fn start(&mut self, _path: &Path, _size: u64) {}
    fn advance(&mut self, _hashed: u64) {}
    fn finish(&mut self, _path: &Path) {}
}

/// Encode `identity` once per target, preserving order
#[must_use]
pub fn encode_all(identity: &FileIdentity, targets: &[LinkFormat]) -> Vec<EncodedLink> {
    targets
        .iter()
        .map(|&format| EncodedLink {
            format,
            link: encode(identity, format),
        })
        .collect()
}

/// Extractor-to-codec pipeline
#[derive(Debug, Clone)]
pub struct ConversionPipeline<E = Md5Extractor> {
    extractor: E,
    read_buffer_size: usize,
}

impl ConversionPipeline<Md5Extractor> {
    /// Create a pipeline using MD5 identities
    #[must_use]
    pub fn new() -> Self {
        Self::with_extractor(Md5Extractor)
    }
}

impl Default for ConversionPipeline<Md5Extractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: IdentityExtractor> ConversionPipeline<E> {
    /// Create a pipeline with a custom extractor
    #[must_use]
    pub fn with_extractor(extractor: E) -> Self {
        Self {
            extractor,
            read_buffer_size: DEFAULT_READ_BUFFER,
        }
    }

    /// Set the read buffer size used when hashing files
    #[must_use]
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Get the extractor
    #[must_use]
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Compute the identity of `bytes` once and encode it into every target
    #[must_use]
    pub fn from_bytes(
        &self,
        name: &str,
        length: u64,
        bytes: &[u8],
        targets: &[LinkFormat],
    ) -> Vec<EncodedLink> {
        let identity = self.extractor.compute(name, length, bytes);
        encode_all(&identity, targets)
    }

    /// Decode `text` once and re-encode it into every target
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnrecognizedFormat`] if `text` is not a decodable
    /// link; nothing is encoded in that case.
    pub fn from_link(
        &self,
        text: &str,
        targets: &[LinkFormat],
    ) -> std::result::Result<Vec<EncodedLink>, CodecError> {
        let identity = decode(text)?;
        Ok(encode_all(&identity, targets))
    }

    /// Create links for a file, or for every file below a directory
    ///
    /// # Errors
    ///
    /// Returns an error if `targets` is empty, `path` does not exist, or a
    /// file cannot be read.
    pub fn from_path(&self, path: &Path, targets: &[LinkFormat]) -> Result<Vec<FileLinks>> {
        self.from_path_with_progress(path, targets, &mut ())
    }

    /// Like [`Self::from_path`], reporting hashing progress to `progress`
    ///
    /// # Errors
    ///
    /// See [`Self::from_path`].
    pub fn from_path_with_progress<P: HashProgress>(
        &self,
        path: &Path,
        targets: &[LinkFormat],
        progress: &mut P,
    ) -> Result<Vec<FileLinks>> {
        if targets.is_empty() {
            return Err(Error::NoTargets);
        }

        let files = collect_files(path)?;
        tracing::info!(
            "Creating {} link(s) for {} file(s) under {}",
            targets.len(),
            files.len(),
            path.display()
        );

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            let identity = self.hash_file(&file, progress)?;
            let links = encode_all(&identity, targets);
            results.push(FileLinks {
                path: file,
                identity,
                links,
            });
        }

        Ok(results)
    }

    fn hash_file<P: HashProgress>(&self, path: &Path, progress: &mut P) -> Result<FileIdentity> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        progress.start(path, size);
        let identity = compute_from_reader(&file_name(path), file, self.read_buffer_size, |n| {
            progress.advance(n)
        })?;
        progress.finish(path);

        Ok(identity)
    }
}

/// Regular files at `path`: the path itself, or everything below a directory
fn collect_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    // Symlinked files count, matching the top-level `is_file` check
    let mut files = Vec::new();
    for entry in WalkDir::new(path).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    const HELLO: &str = "5D41402ABC4B2A76B9719D911017C592";

    /// Extractor that counts how often it is invoked
    #[derive(Default)]
    struct CountingExtractor {
        calls: Cell<usize>,
    }

    impl IdentityExtractor for CountingExtractor {
        fn compute(&self, name: &str, length: u64, bytes: &[u8]) -> FileIdentity {
            self.calls.set(self.calls.get() + 1);
            Md5Extractor.compute(name, length, bytes)
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        started: Vec<(PathBuf, u64)>,
        last_advance: u64,
        finished: usize,
    }

    impl HashProgress for RecordingProgress {
        fn start(&mut self, path: &Path, size: u64) {
            self.started.push((path.to_path_buf(), size));
        }

        fn advance(&mut self, hashed: u64) {
            self.last_advance = hashed;
        }

        fn finish(&mut self, _path: &Path) {
            self.finished += 1;
        }
    }

    #[test]
    fn test_from_bytes_single_compute() {
        let pipeline = ConversionPipeline::with_extractor(CountingExtractor::default());
        let links = pipeline.from_bytes(
            "a.txt",
            5,
            b"hello",
            &[LinkFormat::StandardLong, LinkFormat::ClientStyleA],
        );

        assert_eq!(pipeline.extractor().calls.get(), 1);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].format, LinkFormat::StandardLong);
        assert_eq!(links[0].link, format!("{HELLO}#{HELLO}#5#a.txt"));
        assert_eq!(links[1].format, LinkFormat::ClientStyleA);
        assert!(links[1].link.starts_with("BaiduPCS-Go rapidupload -length=5 "));
    }

    #[test]
    fn test_duplicate_targets_preserved() {
        let pipeline = ConversionPipeline::new();
        let targets = [
            LinkFormat::StandardShort,
            LinkFormat::EncodedURI,
            LinkFormat::StandardShort,
        ];
        let links = pipeline.from_bytes("a.txt", 5, b"hello", &targets);

        let formats: Vec<_> = links.iter().map(|l| l.format).collect();
        assert_eq!(formats, targets.to_vec());
        assert_eq!(links[0].link, links[2].link);
    }

    #[test]
    fn test_from_link_converts() {
        let pipeline = ConversionPipeline::new();
        let links = pipeline
            .from_link(
                &format!("{HELLO}#{HELLO}#5#a.txt"),
                &[LinkFormat::StandardShort, LinkFormat::StandardLong],
            )
            .unwrap();

        assert_eq!(links[0].link, format!("{HELLO}#5#a.txt"));
        assert_eq!(links[1].link, format!("{HELLO}#{HELLO}#5#a.txt"));
    }

    #[test]
    fn test_from_link_failure_encodes_nothing() {
        let pipeline = ConversionPipeline::with_extractor(CountingExtractor::default());
        let err = pipeline
            .from_link(&format!("{HELLO}#5#a.txt"), &[LinkFormat::StandardLong])
            .unwrap_err();

        assert!(matches!(err, CodecError::UnrecognizedFormat { .. }));
        assert_eq!(pipeline.extractor().calls.get(), 0);
    }

    #[test]
    fn test_from_path_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"hello").unwrap();

        let mut progress = RecordingProgress::default();
        let results = ConversionPipeline::new()
            .from_path_with_progress(&path, &[LinkFormat::StandardLong], &mut progress)
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, path);
        assert_eq!(results[0].identity, rapidlink_files::compute("a.txt", 5, b"hello"));
        assert_eq!(results[0].links[0].link, format!("{HELLO}#{HELLO}#5#a.txt"));

        assert_eq!(progress.started, vec![(path, 5)]);
        assert_eq!(progress.last_advance, 5);
        assert_eq!(progress.finished, 1);
    }

    #[test]
    fn test_from_path_directory_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.txt"), b"bbb").unwrap();
        fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        fs::write(dir.path().join("sub/c.bin"), b"").unwrap();

        let results = ConversionPipeline::new()
            .read_buffer_size(2)
            .from_path(dir.path(), &[LinkFormat::StandardShort])
            .unwrap();

        let names: Vec<_> = results.iter().map(|r| r.identity.name()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c.bin"]);
        assert_eq!(results[0].links[0].link, format!("{HELLO}#5#a.txt"));
        assert_eq!(results[2].identity.length(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_from_path_follows_symlinked_files() {
        let target_dir = TempDir::new().unwrap();
        let target = target_dir.path().join("real.txt");
        fs::write(&target, b"hello").unwrap();

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"bbb").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

        let results = ConversionPipeline::new()
            .from_path(dir.path(), &[LinkFormat::StandardLong])
            .unwrap();

        let names: Vec<_> = results.iter().map(|r| r.identity.name()).collect();
        assert_eq!(names, vec!["a.txt", "link.txt"]);
        assert_eq!(results[1].identity.length(), 5);
        assert_eq!(results[1].links[0].link, format!("{HELLO}#{HELLO}#5#link.txt"));
    }

    #[test]
    fn test_from_path_empty_directory() {
        let dir = TempDir::new().unwrap();
        let results = ConversionPipeline::new()
            .from_path(dir.path(), &[LinkFormat::StandardLong])
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_from_path_missing() {
        let dir = TempDir::new().unwrap();
        let err = ConversionPipeline::new()
            .from_path(&dir.path().join("nope"), &[LinkFormat::StandardLong])
            .unwrap_err();
        assert!(matches!(err, Error::PathNotFound(_)));
    }

    #[test]
    fn test_from_path_requires_targets() {
        let dir = TempDir::new().unwrap();
        let err = ConversionPipeline::new()
            .from_path(dir.path(), &[])
            .unwrap_err();
        assert!(matches!(err, Error::NoTargets));
    }
}
