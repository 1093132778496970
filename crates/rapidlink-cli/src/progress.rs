//! Hashing progress display with progress bars.

use indicatif::{ProgressBar, ProgressStyle};
use rapidlink_core::HashProgress;
use std::path::Path;

/// Progress bars for hashing large files
///
/// Files smaller than the threshold hash quickly and get no bar.
pub struct HashingProgress {
    threshold: u64,
    bar: Option<ProgressBar>,
}

impl HashingProgress {
    /// Create a tracker that shows bars for files of at least `threshold` bytes
    #[must_use]
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            bar: None,
        }
    }
}

impl HashProgress for HashingProgress {
    fn start(&mut self, path: &Path, size: u64) {
        tracing::debug!("Hashing {} ({})", path.display(), format_bytes(size));

        if size < self.threshold {
            return;
        }

        let bar = ProgressBar::new(size);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        bar.set_message(format!("Hashing: {name}"));

        self.bar = Some(bar);
    }

    fn advance(&mut self, hashed: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(hashed);
        }
    }

    fn finish(&mut self, _path: &Path) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Format bytes in human-readable format
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{size:.2} {}", UNITS[unit_idx])
}
