//! Card analyzer trait shared by every analysis backend.

use std::path::Path;

use super::{AnalysisResults, ComponentResult, Criterion};

/// Detail reason reported by analyzers that have nothing loaded.
pub const NO_IMAGE_LOADED: &str = "No image loaded";

/// Trait for producing per-criterion scores from a card photograph.
///
/// An analyzer holds at most one loaded card. `load_image` replaces it,
/// and every `analyze_*` call reads from it. Analyzers are not shared
/// between requests; create one per card.
pub trait CardAnalyzer: Send {
    /// Returns the name of this analyzer backend.
    fn name(&self) -> &'static str;

    /// Loads a card image for subsequent analysis.
    ///
    /// On failure any previously loaded card is discarded, so later
    /// `analyze_*` calls return zero-score results.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    fn load_image(&mut self, path: &Path) -> anyhow::Result<()>;

    /// Scores the card outline.
    fn analyze_edges(&self) -> ComponentResult;

    /// Scores the card corners.
    fn analyze_corners(&self) -> ComponentResult;

    /// Scores the card surface.
    fn analyze_surface(&self) -> ComponentResult;

    /// Scores the card centering.
    fn analyze_centering(&self) -> ComponentResult;

    /// Scores a single criterion.
    fn analyze(&self, criterion: Criterion) -> ComponentResult {
        match criterion {
            Criterion::Edges => self.analyze_edges(),
            Criterion::Corners => self.analyze_corners(),
            Criterion::Surface => self.analyze_surface(),
            Criterion::Centering => self.analyze_centering(),
        }
    }

    /// Scores all four criteria from the currently loaded card.
    fn analyze_all(&self) -> AnalysisResults {
        Criterion::ALL
            .into_iter()
            .map(|criterion| (criterion, self.analyze(criterion)))
            .collect()
    }
}
