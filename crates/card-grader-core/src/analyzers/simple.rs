//! File-heuristic analyzer.
//!
//! Scores are estimated from the file name and size alone, without decoding
//! any pixels. Useful for demos, for pipelines without image support, and
//! for deterministic tests.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::domain::{
    CardAnalyzer, ComponentDetails, ComponentResult, SimulatedDetails, NO_IMAGE_LOADED,
};

/// Files above this size are treated as high-quality scans.
const LARGE_SCAN_BYTES: u64 = 1_000_000;
/// Files below this size are treated as low-quality scans.
const SMALL_SCAN_BYTES: u64 = 100_000;

/// Name and size of the loaded file.
#[derive(Debug, Clone)]
struct FileFacts {
    name: String,
    size: u64,
}

/// Analyzer that estimates condition from file metadata.
#[derive(Debug, Default)]
pub struct SimpleCardAnalyzer {
    file: Option<FileFacts>,
}

impl SimpleCardAnalyzer {
    /// Creates an analyzer with nothing loaded.
    #[must_use]
    pub const fn new() -> Self {
        Self { file: None }
    }

    fn simulated(
        &self,
        score_fn: impl Fn(&FileFacts) -> f64,
        note: &str,
        with_size: bool,
    ) -> ComponentResult {
        let Some(file) = &self.file else {
            return ComponentResult::unavailable(NO_IMAGE_LOADED);
        };

        ComponentResult::new(
            score_fn(file),
            ComponentDetails::Simulated(SimulatedDetails {
                file_size: with_size.then_some(file.size),
                filename_indicators: file.name.clone(),
                simulated_analysis: note.to_string(),
            }),
        )
    }
}

fn has_any(name: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| name.contains(n))
}

fn edge_score(file: &FileFacts) -> f64 {
    let name = file.name.as_str();
    let mut score = 75.0;

    if has_any(name, &["mint", "gem"]) {
        score += 15.0;
    } else if has_any(name, &["poor", "damaged"]) {
        score -= 30.0;
    } else if has_any(name, &["good", "fine"]) {
        score += 5.0;
    }

    if file.size > LARGE_SCAN_BYTES {
        score += 10.0;
    } else if file.size < SMALL_SCAN_BYTES {
        score -= 10.0;
    }

    score
}

/// Keyword rule shared by corners, surface and centering.
///
/// The first matching hint wins: `first`, then `second`, then `keyword`
/// qualified by "good" or "poor". All deltas are signed.
struct KeywordRule {
    base: f64,
    first: (&'static [&'static str], f64),
    second: (&'static [&'static str], f64),
    keyword: &'static str,
    good: f64,
    poor: f64,
}

impl KeywordRule {
    fn score(&self, name: &str) -> f64 {
        let delta = if has_any(name, self.first.0) {
            self.first.1
        } else if has_any(name, self.second.0) {
            self.second.1
        } else if name.contains(self.keyword) && name.contains("good") {
            self.good
        } else if name.contains(self.keyword) && name.contains("poor") {
            self.poor
        } else {
            0.0
        };
        self.base + delta
    }
}

const CORNER_RULE: KeywordRule = KeywordRule {
    base: 70.0,
    first: (&["sharp", "mint"], 20.0),
    second: (&["rounded", "worn"], -25.0),
    keyword: "corner",
    good: 10.0,
    poor: -20.0,
};

const SURFACE_RULE: KeywordRule = KeywordRule {
    base: 80.0,
    first: (&["scratch", "damaged"], -30.0),
    second: (&["clean", "pristine"], 15.0),
    keyword: "surface",
    good: 10.0,
    poor: -25.0,
};

const CENTERING_RULE: KeywordRule = KeywordRule {
    base: 85.0,
    first: (&["centered", "perfect"], 10.0),
    second: (&["offcenter", "miscut"], -40.0),
    keyword: "centering",
    good: 5.0,
    poor: -30.0,
};

fn corner_score(file: &FileFacts) -> f64 {
    CORNER_RULE.score(&file.name)
}

fn surface_score(file: &FileFacts) -> f64 {
    SURFACE_RULE.score(&file.name)
}

fn centering_score(file: &FileFacts) -> f64 {
    CENTERING_RULE.score(&file.name)
}

impl CardAnalyzer for SimpleCardAnalyzer {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn load_image(&mut self, path: &Path) -> Result<()> {
        self.file = None;

        let metadata = fs::metadata(path)
            .with_context(|| format!("Card image not found: {}", path.display()))?;
        if !metadata.is_file() {
            bail!("Not a file: {}", path.display());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        debug!("Loaded {} ({} bytes) for file heuristics", name, metadata.len());
        self.file = Some(FileFacts {
            name,
            size: metadata.len(),
        });
        Ok(())
    }

    fn analyze_edges(&self) -> ComponentResult {
        self.simulated(
            edge_score,
            "Edge quality estimated from file characteristics",
            true,
        )
    }

    fn analyze_corners(&self) -> ComponentResult {
        self.simulated(
            corner_score,
            "Corner quality estimated from file characteristics",
            false,
        )
    }

    fn analyze_surface(&self) -> ComponentResult {
        self.simulated(
            surface_score,
            "Surface quality estimated from file characteristics",
            false,
        )
    }

    fn analyze_centering(&self) -> ComponentResult {
        self.simulated(
            centering_score,
            "Centering estimated from file characteristics",
            false,
        )
    }
}
