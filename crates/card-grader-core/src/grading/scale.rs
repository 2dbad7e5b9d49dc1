//! PSA-style grade table.

use serde::Serialize;

use crate::domain::Grade;

/// Maximum acceptable centering skew for a grade.
///
/// Values are the larger side of an `X/(100-X)` split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CenteringTolerance {
    /// Front-side tolerance.
    pub front: u8,
    /// Back-side tolerance.
    pub back: u8,
}

/// One grade level and its standard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeTier {
    /// Grade awarded.
    pub grade: Grade,
    /// Inclusive lower bound on the overall score.
    pub min_score: f64,
    /// Short label, e.g. "Mint".
    pub label: &'static str,
    /// Long-form grading standard.
    pub description: &'static str,
    /// Centering tolerance required for this grade.
    pub centering_tolerance: CenteringTolerance,
}

const fn tier(
    grade: u8,
    min_score: f64,
    label: &'static str,
    description: &'static str,
    front: u8,
    back: u8,
) -> GradeTier {
    GradeTier {
        grade: match Grade::new(grade) {
            Some(g) => g,
            None => Grade::MIN,
        },
        min_score,
        label,
        description,
        centering_tolerance: CenteringTolerance { front, back },
    }
}

/// The ten grade tiers ordered by `min_score`, highest first.
///
/// The last tier has `min_score == 0.0`, so every score in range matches
/// some tier.
pub static GRADE_SCALE: [GradeTier; 10] = [
    tier(
        10,
        95.0,
        "Gem Mint",
        "A PSA Gem Mint 10 card is a virtually perfect card. Attributes include four perfectly sharp corners, sharp focus and full original gloss. Must be free of staining of any kind, but an allowance may be made for a slight printing imperfection, if it doesn't impair the overall appeal. Image must be centered within a tolerance not to exceed approximately 55/45 percent on the front, and 75/25 percent on the reverse.",
        55,
        75,
    ),
    tier(
        9,
        87.0,
        "Mint",
        "A PSA Mint 9 is a superb condition card that exhibits only one of the following minor flaws: a very slight wax stain on reverse, a minor printing imperfection or slightly off white borders. Centering must be approximately 60/40 or better on the front and 90/10 or better on the reverse.",
        60,
        90,
    ),
    tier(
        8,
        78.0,
        "Near Mint-Mint",
        "A PSA NM-MT 8 is a super high-end card that appears Mint 9 at first glance, but upon closer inspection, can exhibit: a very slight wax stain on reverse, slightest fraying at one or two corners, a minor printing imperfection, and/or slightly off-white borders. Centering must be approximately 65/35 or better on the front and 90/10 or better on the reverse.",
        65,
        90,
    ),
    tier(
        7,
        68.0,
        "Near Mint",
        "A PSA NM 7 is a card with just a slight surface wear visible upon close inspection. There may be slight fraying on some corners. Picture focus may be slightly out-of register. A minor printing blemish is acceptable. Slight wax staining is acceptable on the back only. Most original gloss is retained. Centering must be approximately 70/30 or better on the front and 90/10 or better on the back.",
        70,
        90,
    ),
    tier(
        6,
        58.0,
        "Excellent-Near Mint",
        "A PSA 6 card may have visible surface wear or a printing defect which does not detract from its overall appeal. A very light scratch may be detected only upon close inspection. Corners may have slightly graduated fraying. Picture focus may be slightly out-of-register. May show some loss of original gloss, minor wax stain on reverse, very slight notching on edges and some off-whiteness on borders. Centering must be 80/20 or better on the front and 90/10 or better on the reverse.",
        80,
        90,
    ),
    tier(
        5,
        48.0,
        "Excellent",
        "On PSA 5 cards, very minor rounding of the corners is becoming evident. Surface wear or printing defects are more visible. There may be minor chipping on edges. Loss of original gloss will be more apparent. Focus of picture may be slightly out-of-register. Several light scratches may be visible upon close inspection, but do not detract from the appeal. May show some off-whiteness of borders. Centering must be 85/15 or better on the front and 90/10 or better on the back.",
        85,
        90,
    ),
    tier(
        4,
        38.0,
        "Very Good-Excellent",
        "Shows moderate corner wear and surface wear. Minor creases may be present.",
        90,
        90,
    ),
    tier(
        3,
        28.0,
        "Very Good",
        "Shows significant wear with rounded corners and surface defects.",
        90,
        90,
    ),
    tier(
        2,
        18.0,
        "Good",
        "Heavy wear with major surface damage and corner rounding.",
        90,
        90,
    ),
    tier(
        1,
        0.0,
        "Poor",
        "Severe damage affecting card integrity and appeal.",
        90,
        90,
    ),
];

/// Maps an overall score to its grade tier.
///
/// Lower bounds are inclusive and tiers are walked highest first, so a
/// score sitting exactly on a boundary earns the higher grade. Scores
/// below zero (or NaN) fall through to the lowest tier.
#[must_use]
pub fn score_to_grade(score: f64) -> &'static GradeTier {
    GRADE_SCALE
        .iter()
        .find(|t| score >= t.min_score)
        .unwrap_or(&GRADE_SCALE[GRADE_SCALE.len() - 1])
}

/// Looks up the tier for a grade.
#[must_use]
pub fn tier_for(grade: Grade) -> &'static GradeTier {
    GRADE_SCALE
        .iter()
        .find(|t| t.grade == grade)
        .unwrap_or(&GRADE_SCALE[GRADE_SCALE.len() - 1])
}
