//! Centering estimate against grade tolerances.

use super::scale::{tier_for, GradeTier};
use crate::domain::{AnalysisResults, CenteringEvaluation, Criterion, Grade};

/// Score floors and the front split each one implies, best first.
const CENTERING_STEPS: [(f64, u8); 5] = [(90.0, 55), (80.0, 60), (70.0, 65), (60.0, 70), (50.0, 80)];

/// Split assumed for scores below every step.
const WORST_CENTERING: u8 = 85;

/// Maps a centering score to an estimated front split (larger side).
///
/// The analyzers do not measure the true border split; this is a proxy
/// derived from the score alone.
#[must_use]
pub fn estimate_front_ratio(centering_score: f64) -> u8 {
    CENTERING_STEPS
        .iter()
        .find(|(floor, _)| centering_score >= *floor)
        .map_or(WORST_CENTERING, |(_, ratio)| *ratio)
}

/// Formats a larger-side percentage as `X/(100-X)`.
#[must_use]
pub fn format_ratio(larger_side: u8) -> String {
    format!("{larger_side}/{}", 100u8.saturating_sub(larger_side))
}

/// Evaluates the centering result against the tolerance of `grade`.
#[must_use]
pub fn evaluate_centering(results: &AnalysisResults, grade: Grade) -> CenteringEvaluation {
    let centering_score = results
        .get(&Criterion::Centering)
        .map_or(0.0, |r| r.score);
    evaluate_against(centering_score, tier_for(grade))
}

pub(crate) fn evaluate_against(centering_score: f64, tier: &GradeTier) -> CenteringEvaluation {
    let estimated = estimate_front_ratio(centering_score);
    let required = tier.centering_tolerance.front;

    CenteringEvaluation {
        estimated_centering_ratio: format_ratio(estimated),
        required_for_grade: format_ratio(required),
        meets_psa_standard: estimated <= required,
        centering_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComponentResult;

    fn centering(score: f64) -> AnalysisResults {
        AnalysisResults::from([(Criterion::Centering, ComponentResult::score_only(score))])
    }

    fn grade(value: u8) -> Grade {
        Grade::new(value).unwrap_or(Grade::MIN)
    }

    #[test]
    fn test_estimate_steps() {
        assert_eq!(estimate_front_ratio(100.0), 55);
        assert_eq!(estimate_front_ratio(90.0), 55);
        assert_eq!(estimate_front_ratio(89.9), 60);
        assert_eq!(estimate_front_ratio(80.0), 60);
        assert_eq!(estimate_front_ratio(70.0), 65);
        assert_eq!(estimate_front_ratio(60.0), 70);
        assert_eq!(estimate_front_ratio(50.0), 80);
        assert_eq!(estimate_front_ratio(49.9), 85);
        assert_eq!(estimate_front_ratio(0.0), 85);
    }

    #[test]
    fn test_ratio_format() {
        assert_eq!(format_ratio(55), "55/45");
        assert_eq!(format_ratio(90), "90/10");
    }

    #[test]
    fn test_perfect_centering_meets_gem_mint() {
        let eval = evaluate_centering(&centering(100.0), grade(10));
        assert_eq!(eval.estimated_centering_ratio, "55/45");
        assert_eq!(eval.required_for_grade, "55/45");
        assert!(eval.meets_psa_standard);
    }

    #[test]
    fn test_mint_centering_fails_gem_mint() {
        let eval = evaluate_centering(&centering(85.0), grade(10));
        assert_eq!(eval.estimated_centering_ratio, "60/40");
        assert!(!eval.meets_psa_standard);

        let eval = evaluate_centering(&centering(85.0), grade(9));
        assert!(eval.meets_psa_standard);
    }

    #[test]
    fn test_missing_centering_scores_zero() {
        let eval = evaluate_centering(&AnalysisResults::new(), grade(1));
        assert!(eval.centering_score.abs() < f64::EPSILON);
        assert_eq!(eval.estimated_centering_ratio, "85/15");
        assert!(eval.meets_psa_standard);
    }
}
