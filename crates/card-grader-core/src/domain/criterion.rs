//! Grading criteria and per-criterion analysis results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::ComponentDetails;

/// A quality dimension evaluated on every card.
///
/// Declaration order is the iteration order of every criterion-keyed map
/// (edges, corners, surface, centering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// Sharpness and integrity of the card outline.
    Edges,
    /// Sharpness of the four corners.
    Corners,
    /// Scratches, stains and print defects on the face.
    Surface,
    /// Position of the printed image inside the borders.
    Centering,
}

impl Criterion {
    /// All criteria in canonical order.
    pub const ALL: [Self; 4] = [Self::Edges, Self::Corners, Self::Surface, Self::Centering];

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edges => "edges",
            Self::Corners => "corners",
            Self::Surface => "surface",
            Self::Centering => "centering",
        }
    }

    /// Parses a wire name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and diagnostics produced by one analyzer for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentResult {
    /// Quality score from 0.0 (worst) to 100.0 (best).
    #[serde(deserialize_with = "deserialize_score")]
    pub score: f64,
    /// Analyzer-specific measurements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ComponentDetails>,
}

impl ComponentResult {
    /// Creates a result, clamping the score into `0.0..=100.0`.
    ///
    /// Non-finite scores collapse to zero.
    #[must_use]
    pub fn new(score: f64, details: ComponentDetails) -> Self {
        Self {
            score: clamp_score(score),
            details: Some(details),
        }
    }

    /// Creates a result carrying only a score.
    #[must_use]
    pub fn score_only(score: f64) -> Self {
        Self {
            score: clamp_score(score),
            details: None,
        }
    }

    /// Zero-score sentinel returned when analysis could not run.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::new(
            0.0,
            ComponentDetails::Unavailable {
                reason: reason.into(),
            },
        )
    }
}

/// Criterion-keyed analysis output consumed by the grading engine.
pub type AnalysisResults = BTreeMap<Criterion, ComponentResult>;

/// Clamps a score into `0.0..=100.0`, mapping NaN to zero.
#[must_use]
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_score)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_order_matches_declaration() {
        let mut results = AnalysisResults::new();
        results.insert(Criterion::Centering, ComponentResult::score_only(1.0));
        results.insert(Criterion::Edges, ComponentResult::score_only(2.0));
        results.insert(Criterion::Surface, ComponentResult::score_only(3.0));
        results.insert(Criterion::Corners, ComponentResult::score_only(4.0));

        let keys: Vec<_> = results.keys().copied().collect();
        assert_eq!(keys, Criterion::ALL.to_vec());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Criterion::from_name("edges"), Some(Criterion::Edges));
        assert_eq!(Criterion::from_name(" Surface "), Some(Criterion::Surface));
        assert_eq!(Criterion::from_name("gloss"), None);
    }

    #[test]
    fn test_score_is_clamped() {
        assert!((ComponentResult::score_only(140.0).score - 100.0).abs() < f64::EPSILON);
        assert!(ComponentResult::score_only(-3.0).score.abs() < f64::EPSILON);
        assert!(ComponentResult::score_only(f64::NAN).score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_results_deserialize_without_details() {
        let json = r#"{"edges": {"score": 90}, "centering": {"score": 92.5}}"#;
        let results: AnalysisResults = serde_json::from_str(json).expect("parse results");

        assert_eq!(results.len(), 2);
        assert!((results[&Criterion::Edges].score - 90.0).abs() < f64::EPSILON);
        assert!(results[&Criterion::Centering].details.is_none());
    }

    #[test]
    fn test_deserialized_scores_are_clamped() {
        let json = r#"{"edges": {"score": 250}, "corners": {"score": -40}, "surface": {"score": 70}}"#;
        let results: AnalysisResults = serde_json::from_str(json).expect("parse results");

        assert!((results[&Criterion::Edges].score - 100.0).abs() < f64::EPSILON);
        assert!(results[&Criterion::Corners].score.abs() < f64::EPSILON);
        assert!((results[&Criterion::Surface].score - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_criterion_rejected() {
        let json = r#"{"gloss": {"score": 90}}"#;
        let parsed: Result<AnalysisResults, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }
}
