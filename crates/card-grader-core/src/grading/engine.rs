//! Weighted grading engine.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::centering::evaluate_centering;
use super::compliance::check_compliance;
use super::scale::score_to_grade;
use super::standards::{compare_score, CompanyComparison};
use super::suggestions::generate_suggestions;
use crate::domain::{
    clamp_score, AnalysisResults, ComponentBreakdown, Confidence, Criterion, GradingReport,
    WeightSet,
};
use crate::error::GradingResult;

/// Variance below which component scores are considered consistent.
const HIGH_CONFIDENCE_VARIANCE: f64 = 100.0;
/// Variance below which component scores are considered moderately spread.
const MEDIUM_CONFIDENCE_VARIANCE: f64 = 400.0;

/// Computes the weighted overall score, clamped to `0.0..=100.0`.
///
/// Weighted criteria missing from `results` contribute zero and are
/// logged as warnings.
#[must_use]
pub fn calculate_overall_score(results: &AnalysisResults, weights: &WeightSet) -> f64 {
    let total: f64 = weights
        .iter()
        .map(|(criterion, weight)| match results.get(&criterion) {
            Some(result) => result.score * weight,
            None => {
                warn!("Missing component in analysis: {criterion}");
                0.0
            }
        })
        .sum();

    debug!("Calculated overall score: {total:.2}");
    clamp_score(total)
}

/// Converts component results into grades and reports.
///
/// The engine is immutable once built and holds no per-request state, so
/// one instance can grade any number of cards.
#[derive(Debug, Clone, Default)]
pub struct GradingEngine {
    weights: WeightSet,
}

impl GradingEngine {
    /// Creates an engine with the default weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with validated custom weights.
    #[must_use]
    pub const fn with_weights(weights: WeightSet) -> Self {
        Self { weights }
    }

    /// Creates an engine from raw weights, validating their sum.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights do not sum to 1.0 ± 0.01.
    pub fn from_weights(weights: BTreeMap<Criterion, f64>) -> GradingResult<Self> {
        WeightSet::new(weights).map(Self::with_weights)
    }

    /// Returns the weights in use.
    #[must_use]
    pub const fn weights(&self) -> &WeightSet {
        &self.weights
    }

    /// Weighted overall score using this engine's weights.
    #[must_use]
    pub fn overall_score(&self, results: &AnalysisResults) -> f64 {
        calculate_overall_score(results, &self.weights)
    }

    /// Builds the full grading report for one card.
    #[must_use]
    pub fn generate_detailed_report(&self, results: &AnalysisResults) -> GradingReport {
        info!("Generating detailed grading report");

        let overall_score = self.overall_score(results);
        let tier = score_to_grade(overall_score);
        info!(
            "Report generated: Grade {}/10 ({}), Score: {overall_score:.2}",
            tier.grade, tier.label
        );

        let component_scores: Vec<(Criterion, f64)> = self
            .weights
            .iter()
            .filter_map(|(criterion, _)| results.get(&criterion).map(|r| (criterion, r.score)))
            .collect();

        let component_breakdown = self.breakdown(results);
        let (best, worst) = extremes(&component_scores);

        GradingReport {
            overall_score: round2(overall_score),
            predicted_grade: tier.grade,
            grade_description: tier.label.to_string(),
            detailed_description: tier.description.to_string(),
            component_breakdown,
            strengths: best.into_iter().collect(),
            weaknesses: worst.into_iter().collect(),
            improvement_suggestions: generate_suggestions(&component_scores, tier.grade),
            confidence_level: self.confidence(results),
            centering_evaluation: evaluate_centering(results, tier.grade),
            psa_compliance: check_compliance(results, tier.grade),
        }
    }

    /// Per-criterion contribution and stand-alone grade.
    ///
    /// The stand-alone grade runs a single component score through the
    /// overall grade table; it is for display only.
    fn breakdown(&self, results: &AnalysisResults) -> BTreeMap<Criterion, ComponentBreakdown> {
        self.weights
            .iter()
            .filter_map(|(criterion, weight)| {
                let score = results.get(&criterion)?.score;
                let tier = score_to_grade(score);
                Some((
                    criterion,
                    ComponentBreakdown {
                        score,
                        weight,
                        contribution: score * weight,
                        grade: tier.grade,
                        grade_label: tier.label.to_string(),
                    },
                ))
            })
            .collect()
    }

    /// Confidence in the prediction.
    ///
    /// Fewer components than weighted criteria means incomplete evidence.
    /// Otherwise the population variance of the component scores decides.
    #[must_use]
    pub fn confidence(&self, results: &AnalysisResults) -> Confidence {
        if results.len() < self.weights.len() {
            return Confidence::Low;
        }

        let scores: Vec<f64> = results.values().map(|r| r.score).collect();
        if scores.len() <= 1 {
            return Confidence::Medium;
        }

        let variance = population_variance(&scores);
        if variance < HIGH_CONFIDENCE_VARIANCE {
            Confidence::High
        } else if variance < MEDIUM_CONFIDENCE_VARIANCE {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Compares the overall score with a grading company's thresholds.
    ///
    /// Unknown company names fall back to PSA thresholds.
    #[must_use]
    pub fn compare_to_standards(
        &self,
        results: &AnalysisResults,
        grading_company: &str,
    ) -> CompanyComparison {
        compare_score(self.overall_score(results), grading_company)
    }
}

/// First criterion with the highest and lowest score, in iteration order.
fn extremes(scores: &[(Criterion, f64)]) -> (Option<Criterion>, Option<Criterion>) {
    let mut best: Option<(Criterion, f64)> = None;
    let mut worst: Option<(Criterion, f64)> = None;

    for &(criterion, score) in scores {
        if best.is_none_or(|(_, b)| score > b) {
            best = Some((criterion, score));
        }
        if worst.is_none_or(|(_, w)| score < w) {
            worst = Some((criterion, score));
        }
    }

    (best.map(|(c, _)| c), worst.map(|(c, _)| c))
}

#[allow(clippy::cast_precision_loss)]
fn population_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
