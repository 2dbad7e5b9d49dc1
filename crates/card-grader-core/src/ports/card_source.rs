//! Card source port for discovering card images.

use std::path::PathBuf;

/// Port for enumerating card images to grade.
pub trait CardSource: Send + Sync {
    /// Returns an iterator over card image paths.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if a path cannot be read.
    fn cards(&self) -> Box<dyn Iterator<Item = anyhow::Result<PathBuf>> + Send + '_>;

    /// Returns the total number of cards, if known.
    fn count_hint(&self) -> Option<usize>;
}
