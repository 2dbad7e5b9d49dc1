//! Grading-company threshold comparison.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thresholds published by a grading company.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanyStandards {
    /// Overall score needed for a gem-mint grade.
    pub gem_mint_threshold: f64,
    /// Overall score needed for a mint grade.
    pub mint_threshold: f64,
    /// Relative importance the company gives corners.
    pub corner_weight: f64,
    /// Relative importance the company gives the surface.
    pub surface_weight: f64,
}

/// Grading companies with known standards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingCompany {
    /// Professional Sports Authenticator.
    Psa,
    /// Beckett Grading Services.
    Bgs,
}

impl GradingCompany {
    /// Resolves a company by name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "PSA" => Some(Self::Psa),
            "BGS" => Some(Self::Bgs),
            _ => None,
        }
    }

    /// Resolves a company by name, falling back to PSA for unknown names.
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            debug!("Unknown grading company '{name}', applying PSA standards");
            Self::Psa
        })
    }

    /// Canonical short name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Psa => "PSA",
            Self::Bgs => "BGS",
        }
    }

    /// Published thresholds for this company.
    #[must_use]
    pub const fn standards(self) -> CompanyStandards {
        match self {
            Self::Psa => CompanyStandards {
                gem_mint_threshold: 95.0,
                mint_threshold: 85.0,
                corner_weight: 0.30,
                surface_weight: 0.30,
            },
            Self::Bgs => CompanyStandards {
                gem_mint_threshold: 96.0,
                mint_threshold: 87.0,
                corner_weight: 0.25,
                surface_weight: 0.25,
            },
        }
    }
}

/// Overall score compared with a company's thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyComparison {
    /// Company name as requested by the caller.
    pub grading_company: String,
    /// Score reaches the gem-mint threshold.
    pub meets_gem_mint: bool,
    /// Score reaches the mint threshold.
    pub meets_mint: bool,
    /// Overall score the thresholds were applied to.
    pub company_specific_score: f64,
    /// Thresholds actually applied.
    pub standards_applied: CompanyStandards,
}

/// Compares an overall score with the named company's thresholds.
///
/// Unknown names use PSA thresholds; the requested name is still echoed.
#[must_use]
pub fn compare_score(overall_score: f64, grading_company: &str) -> CompanyComparison {
    let standards = GradingCompany::resolve(grading_company).standards();
    CompanyComparison {
        grading_company: grading_company.to_string(),
        meets_gem_mint: overall_score >= standards.gem_mint_threshold,
        meets_mint: overall_score >= standards.mint_threshold,
        company_specific_score: overall_score,
        standards_applied: standards,
    }
}
