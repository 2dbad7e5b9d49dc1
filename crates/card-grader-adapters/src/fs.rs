//! Filesystem adapter for discovering card images.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use card_grader_core::CardSource;
use tracing::{debug, warn};

/// Supported card image extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// A discovered entry: a card image or a path that could not be used.
type Entry = Result<PathBuf>;

/// Filesystem card source adapter.
///
/// Files are yielded in sorted order per directory so batch output is
/// stable across runs.
pub struct FsCardSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsCardSource {
    /// Creates a new filesystem card source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Collects card files from the configured paths.
    ///
    /// Explicit paths that do not exist become errors so callers can count
    /// them as skipped. Unsupported files are dropped with a warning.
    fn collect(&self) -> Vec<Entry> {
        let mut entries = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if is_supported_image(path) {
                    entries.push(Ok(path.clone()));
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut entries);
            } else {
                warn!("Path does not exist: {}", path.display());
                entries.push(Err(anyhow!("Path does not exist: {}", path.display())));
            }
        }

        entries
    }

    fn collect_from_dir(&self, dir: &Path, entries: &mut Vec<Entry>) {
        let read = match std::fs::read_dir(dir) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                entries.push(Err(anyhow!(
                    "Failed to read directory {}: {e}",
                    dir.display()
                )));
                return;
            }
        };

        let mut children: Vec<PathBuf> = read.flatten().map(|e| e.path()).collect();
        children.sort();

        for path in children {
            if path.is_file() && is_supported_image(&path) {
                entries.push(Ok(path));
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, entries);
            }
        }
    }
}

impl CardSource for FsCardSource {
    fn cards(&self) -> Box<dyn Iterator<Item = Result<PathBuf>> + Send + '_> {
        let entries = self.collect();
        debug!("Found {} card candidates", entries.len());
        Box::new(entries.into_iter())
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.collect().len())
    }
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}
