//! Grading report types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Criterion;

/// A PSA-style grade from 1 to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    /// Highest grade.
    pub const MAX: Self = Self(10);
    /// Lowest grade.
    pub const MIN: Self = Self(1);

    /// Creates a grade, returning `None` outside `1..=10`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if matches!(value, 1..=10) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Numeric grade value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// The next higher grade, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trust in the predicted grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// Component scores agree closely.
    High,
    /// Moderate spread between component scores.
    Medium,
    /// Incomplete evidence or widely spread scores.
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        })
    }
}

/// Complete grading report for one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingReport {
    /// Weighted overall score, rounded to two decimals.
    pub overall_score: f64,
    /// Predicted grade.
    pub predicted_grade: Grade,
    /// Short grade label, e.g. "Gem Mint".
    pub grade_description: String,
    /// Long-form grading standard text for the predicted grade.
    pub detailed_description: String,
    /// Per-criterion contribution to the overall score.
    pub component_breakdown: BTreeMap<Criterion, ComponentBreakdown>,
    /// Best scoring criterion (zero or one entry).
    pub strengths: Vec<Criterion>,
    /// Worst scoring criterion (zero or one entry).
    pub weaknesses: Vec<Criterion>,
    /// Ordered advice for the card owner.
    pub improvement_suggestions: Vec<String>,
    /// Trust in the prediction.
    pub confidence_level: Confidence,
    /// Centering estimate against the predicted grade.
    pub centering_evaluation: CenteringEvaluation,
    /// Per-criterion compliance with the predicted grade.
    pub psa_compliance: ComplianceReport,
}

/// One criterion's share of the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentBreakdown {
    /// Raw component score.
    pub score: f64,
    /// Weight applied.
    pub weight: f64,
    /// `score * weight`.
    pub contribution: f64,
    /// Grade this score alone would earn.
    pub grade: Grade,
    /// Label of that grade.
    pub grade_label: String,
}

/// Estimated centering against a grade's tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenteringEvaluation {
    /// Estimated front split, e.g. "60/40".
    pub estimated_centering_ratio: String,
    /// Tolerance for the grade, e.g. "55/45".
    pub required_for_grade: String,
    /// Whether the estimate is within tolerance.
    pub meets_psa_standard: bool,
    /// Raw centering score the estimate came from.
    pub centering_score: f64,
}

/// Compliance of every criterion with a grade's minimums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// True when every criterion complies.
    pub overall_compliant: bool,
    /// Per-criterion outcome.
    pub component_compliance: BTreeMap<Criterion, ComplianceCheck>,
    /// Long-form standard text of the grade checked against.
    pub grade_requirements: String,
    /// One-line summary naming failing criteria.
    pub compliance_summary: String,
}

/// Compliance outcome for one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCheck {
    /// Whether the criterion meets the grade minimum.
    pub compliant: bool,
    /// Requirement wording for the grade.
    pub message: String,
    /// Raw criterion score.
    pub score: f64,
    /// Estimated centering split (centering only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_ratio: Option<String>,
}
