//! Synthetic card images and analysis results for testing.

use std::path::Path;

use anyhow::{Context, Result};
use card_grader_core::{AnalysisResults, ComponentResult, Criterion};
use image::{DynamicImage, GrayImage, Luma};

/// Background intensity around the card.
const BACKGROUND: u8 = 30;
/// Card face intensity.
const CARD: u8 = 220;
/// Speckle intensity.
const SPECKLE: u8 = 0;

/// Builder for a light card photographed on a dark background.
///
/// The card is placed at the image center by default; `offset` shifts it
/// and `speckled` scatters dark defects across its face.
#[derive(Debug, Clone)]
pub struct SyntheticCardBuilder {
    width: u32,
    height: u32,
    card_width: u32,
    card_height: u32,
    offset: (i64, i64),
    speckle_step: Option<u32>,
}

impl SyntheticCardBuilder {
    /// Creates a builder for a `width` x `height` photo with the card
    /// covering 60% of each dimension.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            card_width: width * 3 / 5,
            card_height: height * 3 / 5,
            offset: (0, 0),
            speckle_step: None,
        }
    }

    /// A 200x280 photo with a centered 120x168 card.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(200, 280)
    }

    /// Sets the card size in pixels.
    #[must_use]
    pub const fn card_size(mut self, width: u32, height: u32) -> Self {
        self.card_width = width;
        self.card_height = height;
        self
    }

    /// Shifts the card from the center by `(dx, dy)` pixels.
    #[must_use]
    pub const fn offset(mut self, dx: i64, dy: i64) -> Self {
        self.offset = (dx, dy);
        self
    }

    /// Adds a dark speckle every `step` pixels inside the card face.
    #[must_use]
    pub const fn speckled(mut self, step: u32) -> Self {
        self.speckle_step = Some(step);
        self
    }

    /// Top-left corner of the card, clamped to the image.
    fn card_origin(&self) -> (u32, u32) {
        let place = |total: u32, size: u32, shift: i64| {
            let centered = i64::from(total.saturating_sub(size) / 2);
            let max = i64::from(total.saturating_sub(size));
            u32::try_from((centered + shift).clamp(0, max)).unwrap_or(0)
        };
        (
            place(self.width, self.card_width, self.offset.0),
            place(self.height, self.card_height, self.offset.1),
        )
    }

    /// Renders the photo as grayscale.
    #[must_use]
    pub fn build_gray(&self) -> GrayImage {
        let (x0, y0) = self.card_origin();
        let xs = x0..x0 + self.card_width;
        let ys = y0..y0 + self.card_height;
        // Keep speckles off the card outline.
        let inner_xs = x0 + 4..(x0 + self.card_width).saturating_sub(4);
        let inner_ys = y0 + 4..(y0 + self.card_height).saturating_sub(4);

        GrayImage::from_fn(self.width, self.height, |x, y| {
            if !(xs.contains(&x) && ys.contains(&y)) {
                return Luma([BACKGROUND]);
            }
            let speckle = self.speckle_step.is_some_and(|step| {
                inner_xs.contains(&x)
                    && inner_ys.contains(&y)
                    && (x - x0) % step.max(1) == 0
                    && (y - y0) % step.max(1) == 0
            });
            Luma([if speckle { SPECKLE } else { CARD }])
        })
    }

    /// Renders the photo as an RGB image.
    #[must_use]
    pub fn build(&self) -> DynamicImage {
        DynamicImage::ImageLuma8(self.build_gray()).to_rgb8().into()
    }

    /// Renders the photo and writes it to `path`; the extension picks the
    /// encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.build()
            .save(path)
            .with_context(|| format!("Failed to write synthetic card {}", path.display()))
    }
}

/// Builder for criterion-keyed analysis results.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResultsBuilder {
    results: AnalysisResults,
}

impl AnalysisResultsBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with every criterion set to `score`.
    #[must_use]
    pub fn uniform(score: f64) -> Self {
        Criterion::ALL
            .into_iter()
            .fold(Self::new(), |builder, criterion| builder.score(criterion, score))
    }

    /// Sets a score without details.
    #[must_use]
    pub fn score(mut self, criterion: Criterion, score: f64) -> Self {
        self.results
            .insert(criterion, ComponentResult::score_only(score));
        self
    }

    /// Removes a criterion.
    #[must_use]
    pub fn without(mut self, criterion: Criterion) -> Self {
        self.results.remove(&criterion);
        self
    }

    /// Sets the edge score.
    #[must_use]
    pub fn edges(self, score: f64) -> Self {
        self.score(Criterion::Edges, score)
    }

    /// Sets the corner score.
    #[must_use]
    pub fn corners(self, score: f64) -> Self {
        self.score(Criterion::Corners, score)
    }

    /// Sets the surface score.
    #[must_use]
    pub fn surface(self, score: f64) -> Self {
        self.score(Criterion::Surface, score)
    }

    /// Sets the centering score.
    #[must_use]
    pub fn centering(self, score: f64) -> Self {
        self.score(Criterion::Centering, score)
    }

    /// Returns the results.
    #[must_use]
    pub fn build(self) -> AnalysisResults {
        self.results
    }
}
