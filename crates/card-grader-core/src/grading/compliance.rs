//! Per-criterion compliance with grade minimums.
//!
//! Only grades 7 through 10 impose per-criterion floors.

use std::collections::BTreeMap;

use super::centering::evaluate_against;
use super::scale::tier_for;
use crate::domain::{AnalysisResults, ComplianceCheck, ComplianceReport, Criterion, Grade};

/// Checks every criterion against the minimums for `grade`.
#[must_use]
pub fn check_compliance(results: &AnalysisResults, grade: Grade) -> ComplianceReport {
    let component_compliance: BTreeMap<Criterion, ComplianceCheck> = Criterion::ALL
        .into_iter()
        .map(|criterion| (criterion, check_criterion(results, criterion, grade)))
        .collect();

    let overall_compliant = component_compliance.values().all(|c| c.compliant);
    let compliance_summary = summarize(&component_compliance, grade);

    ComplianceReport {
        overall_compliant,
        component_compliance,
        grade_requirements: tier_for(grade).description.to_string(),
        compliance_summary,
    }
}

fn score_of(results: &AnalysisResults, criterion: Criterion) -> f64 {
    results.get(&criterion).map_or(0.0, |r| r.score)
}

fn check_criterion(results: &AnalysisResults, criterion: Criterion, grade: Grade) -> ComplianceCheck {
    let score = score_of(results, criterion);

    let (minimum, message) = match criterion {
        Criterion::Centering => return check_centering(score, grade),
        Criterion::Corners => corner_requirement(grade),
        Criterion::Edges => edge_requirement(grade),
        Criterion::Surface => surface_requirement(grade),
    };
    ComplianceCheck {
        compliant: minimum.is_none_or(|min| score >= min),
        message: message.to_string(),
        score,
        estimated_ratio: None,
    }
}

fn check_centering(score: f64, grade: Grade) -> ComplianceCheck {
    let eval = evaluate_against(score, tier_for(grade));
    ComplianceCheck {
        compliant: eval.meets_psa_standard,
        message: format!("Requires {} centering or better", eval.required_for_grade),
        score,
        estimated_ratio: Some(eval.estimated_centering_ratio),
    }
}

/// Minimum score and requirement wording for corners.
fn corner_requirement(grade: Grade) -> (Option<f64>, &'static str) {
    match grade.value() {
        10 => (Some(95.0), "Requires four perfectly sharp corners"),
        9 => (Some(85.0), "Superb condition with minimal corner wear"),
        8 => (Some(75.0), "Slightest fraying at one or two corners acceptable"),
        7 => (Some(65.0), "Slight fraying on some corners acceptable"),
        _ => (None, "Meets corner requirements for this grade"),
    }
}

fn edge_requirement(grade: Grade) -> (Option<f64>, &'static str) {
    match grade.value() {
        10 => (Some(95.0), "Requires perfectly sharp edges"),
        8 | 9 => (Some(80.0), "Minor edge imperfections acceptable"),
        7 => (Some(70.0), "Slight edge wear acceptable"),
        _ => (None, "Meets edge requirements for this grade"),
    }
}

fn surface_requirement(grade: Grade) -> (Option<f64>, &'static str) {
    match grade.value() {
        10 => (
            Some(95.0),
            "Must be free of staining (slight printing imperfection allowed)",
        ),
        9 => (Some(85.0), "Very slight wax stain on reverse acceptable"),
        8 => (Some(75.0), "Minor printing imperfections acceptable"),
        7 => (Some(65.0), "Slight surface wear visible upon close inspection"),
        _ => (None, "Meets surface requirements for this grade"),
    }
}

fn summarize(checks: &BTreeMap<Criterion, ComplianceCheck>, grade: Grade) -> String {
    let failing: Vec<&str> = checks
        .iter()
        .filter(|(_, check)| !check.compliant)
        .map(|(criterion, _)| criterion.as_str())
        .collect();

    if failing.is_empty() {
        format!("Card meets all PSA {grade} requirements")
    } else {
        format!("Card fails PSA {grade} requirements for: {}", failing.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComponentResult;

    fn results(edges: f64, corners: f64, surface: f64, centering: f64) -> AnalysisResults {
        AnalysisResults::from([
            (Criterion::Edges, ComponentResult::score_only(edges)),
            (Criterion::Corners, ComponentResult::score_only(corners)),
            (Criterion::Surface, ComponentResult::score_only(surface)),
            (Criterion::Centering, ComponentResult::score_only(centering)),
        ])
    }

    fn grade(value: u8) -> Grade {
        Grade::new(value).unwrap_or(Grade::MIN)
    }

    #[test]
    fn test_perfect_card_complies_with_gem_mint() {
        let report = check_compliance(&results(100.0, 100.0, 100.0, 100.0), grade(10));
        assert!(report.overall_compliant);
        assert_eq!(report.compliance_summary, "Card meets all PSA 10 requirements");
    }

    #[test]
    fn test_corner_minimums_per_grade() {
        let card = results(100.0, 84.0, 100.0, 100.0);
        assert!(!check_compliance(&card, grade(9)).component_compliance[&Criterion::Corners].compliant);
        assert!(check_compliance(&card, grade(8)).component_compliance[&Criterion::Corners].compliant);
    }

    #[test]
    fn test_edges_share_floor_for_eight_and_nine() {
        let card = results(79.0, 100.0, 100.0, 100.0);
        for g in [8, 9] {
            let report = check_compliance(&card, grade(g));
            assert!(!report.component_compliance[&Criterion::Edges].compliant);
        }
        let report = check_compliance(&card, grade(7));
        assert!(report.component_compliance[&Criterion::Edges].compliant);
    }

    #[test]
    fn test_low_grades_have_no_minimums() {
        let report = check_compliance(&results(0.0, 0.0, 0.0, 0.0), grade(1));
        assert!(report.overall_compliant);
        assert_eq!(report.compliance_summary, "Card meets all PSA 1 requirements");
    }

    #[test]
    fn test_summary_lists_failures_in_criterion_order() {
        let report = check_compliance(&results(90.0, 90.0, 90.0, 85.0), grade(10));
        assert!(!report.overall_compliant);
        assert_eq!(
            report.compliance_summary,
            "Card fails PSA 10 requirements for: edges, corners, surface, centering"
        );
    }

    #[test]
    fn test_centering_check_carries_estimate() {
        let report = check_compliance(&results(100.0, 100.0, 100.0, 75.0), grade(8));
        let centering = &report.component_compliance[&Criterion::Centering];
        assert!(centering.compliant);
        assert_eq!(centering.estimated_ratio.as_deref(), Some("65/35"));
        assert_eq!(centering.message, "Requires 65/35 centering or better");
    }

    #[test]
    fn test_missing_components_score_zero() {
        let report = check_compliance(&AnalysisResults::new(), grade(9));
        assert!(!report.overall_compliant);
        assert!(report.component_compliance[&Criterion::Edges].score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_low_grade_messages_per_criterion() {
        let report = check_compliance(&results(10.0, 10.0, 10.0, 10.0), grade(3));
        let message = |c: Criterion| report.component_compliance[&c].message.clone();
        assert_eq!(message(Criterion::Corners), "Meets corner requirements for this grade");
        assert_eq!(message(Criterion::Edges), "Meets edge requirements for this grade");
        assert_eq!(message(Criterion::Surface), "Meets surface requirements for this grade");
        assert!(message(Criterion::Centering).starts_with("Requires "));
    }
}
