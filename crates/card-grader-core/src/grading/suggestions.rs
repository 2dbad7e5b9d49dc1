//! Improvement suggestions keyed off the predicted grade.

use super::scale::tier_for;
use crate::domain::{Criterion, Grade};

/// Characters of the next grade's description quoted in the teaser line.
const TEASER_LEN: usize = 100;

/// Score below which a criterion gets its own advice line.
const fn warning_threshold(criterion: Criterion) -> f64 {
    match criterion {
        Criterion::Edges | Criterion::Surface => 80.0,
        Criterion::Corners => 85.0,
        Criterion::Centering => 70.0,
    }
}

/// Builds the ordered suggestion list.
///
/// `component_scores` holds the criteria present in the analysis, in
/// weight order. Per-criterion warnings come first; when there are none a
/// single grade-band message takes their place. Below grade 10 a line
/// quoting the next grade's standard is appended last.
#[must_use]
pub fn generate_suggestions(component_scores: &[(Criterion, f64)], grade: Grade) -> Vec<String> {
    let g = grade.value();

    let mut suggestions: Vec<String> = component_scores
        .iter()
        .filter(|(criterion, score)| *score < warning_threshold(*criterion))
        .map(|(criterion, _)| criterion_warning(*criterion, grade))
        .collect();

    if suggestions.is_empty() {
        let fallback = if g >= 9 {
            "Excellent card quality! This card meets high PSA standards."
        } else if g >= 7 {
            "Good card quality with only minor flaws preventing higher grade."
        } else {
            "Card shows wear consistent with its grade level."
        };
        suggestions.push(fallback.to_string());
    }

    if let Some(next) = grade.next() {
        let teaser: String = tier_for(next).description.chars().take(TEASER_LEN).collect();
        suggestions.push(format!("To achieve PSA {next}: {teaser}..."));
    }

    suggestions
}

fn criterion_warning(criterion: Criterion, grade: Grade) -> String {
    let g = grade.value();
    let text = match criterion {
        Criterion::Edges if g <= 7 => {
            "Edge wear is preventing higher grade - PSA values sharp, clean edges"
        }
        Criterion::Edges => "Minor edge imperfections detected - protect with quality sleeves",
        Criterion::Corners if g <= 6 => {
            "Corner damage significantly impacts grade - PSA heavily weighs corner quality"
        }
        Criterion::Corners if g <= 8 => {
            "Slight corner fraying detected - handle with extreme care to prevent further damage"
        }
        Criterion::Corners => "Corners show excellent condition - maintain with proper storage",
        Criterion::Surface if g <= 5 => {
            "Surface defects are limiting grade potential - scratches and wear significantly impact PSA scores"
        }
        Criterion::Surface if g <= 7 => {
            "Minor surface wear detected - PSA allows slight wear at this grade level"
        }
        Criterion::Surface => {
            "Surface shows minimal wear - protect from fingerprints and scratches"
        }
        Criterion::Centering => {
            let front = tier_for(grade).centering_tolerance.front;
            return format!(
                "Centering issues detected - PSA {grade} requires {front}/{} or better centering",
                100 - front
            );
        }
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(value: u8) -> Grade {
        Grade::new(value).unwrap_or(Grade::MIN)
    }

    #[test]
    fn test_gem_mint_without_warnings() {
        let scores = [
            (Criterion::Edges, 100.0),
            (Criterion::Corners, 100.0),
            (Criterion::Surface, 100.0),
            (Criterion::Centering, 100.0),
        ];
        let suggestions = generate_suggestions(&scores, grade(10));
        assert_eq!(
            suggestions,
            vec!["Excellent card quality! This card meets high PSA standards.".to_string()]
        );
    }

    #[test]
    fn test_fallback_band_and_teaser() {
        let scores = [(Criterion::Edges, 90.0), (Criterion::Corners, 90.0)];
        let suggestions = generate_suggestions(&scores, grade(7));
        assert_eq!(suggestions.len(), 2);
        assert_eq!(
            suggestions[0],
            "Good card quality with only minor flaws preventing higher grade."
        );
        assert!(suggestions[1].starts_with("To achieve PSA 8: A PSA NM-MT 8 is a super"));
        assert!(suggestions[1].ends_with("..."));
    }

    #[test]
    fn test_teaser_is_truncated() {
        let suggestions = generate_suggestions(&[], grade(5));
        let teaser = suggestions.last().map(String::as_str).unwrap_or_default();
        let body = teaser
            .trim_start_matches("To achieve PSA 6: ")
            .trim_end_matches("...");
        assert_eq!(body.chars().count(), TEASER_LEN);
    }

    #[test]
    fn test_warnings_follow_weight_order_and_bands() {
        let scores = [
            (Criterion::Edges, 70.0),
            (Criterion::Corners, 60.0),
            (Criterion::Surface, 70.0),
            (Criterion::Centering, 50.0),
        ];
        let suggestions = generate_suggestions(&scores, grade(5));

        assert_eq!(suggestions.len(), 5);
        assert!(suggestions[0].starts_with("Edge wear is preventing"));
        assert!(suggestions[1].starts_with("Corner damage significantly"));
        assert!(suggestions[2].starts_with("Surface defects are limiting"));
        assert_eq!(
            suggestions[3],
            "Centering issues detected - PSA 5 requires 85/15 or better centering"
        );
        assert!(suggestions[4].starts_with("To achieve PSA 6:"));
    }

    #[test]
    fn test_high_grade_warning_wording() {
        let scores = [(Criterion::Edges, 79.0), (Criterion::Corners, 84.0), (Criterion::Surface, 79.0)];
        let suggestions = generate_suggestions(&scores, grade(9));
        assert_eq!(
            suggestions[0],
            "Minor edge imperfections detected - protect with quality sleeves"
        );
        assert_eq!(
            suggestions[1],
            "Corners show excellent condition - maintain with proper storage"
        );
        assert_eq!(
            suggestions[2],
            "Surface shows minimal wear - protect from fingerprints and scratches"
        );
    }

    #[test]
    fn test_threshold_is_strict() {
        let scores = [(Criterion::Corners, 85.0), (Criterion::Centering, 70.0)];
        let suggestions = generate_suggestions(&scores, grade(10));
        assert_eq!(suggestions.len(), 1);
    }
}
