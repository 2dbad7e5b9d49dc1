//! Grading stage: weighted scoring, grade mapping and report assembly.

mod centering;
mod compliance;
mod engine;
mod scale;
mod standards;
mod suggestions;

pub use centering::{estimate_front_ratio, evaluate_centering, format_ratio};
pub use compliance::check_compliance;
pub use engine::{calculate_overall_score, GradingEngine};
pub use scale::{score_to_grade, tier_for, CenteringTolerance, GradeTier, GRADE_SCALE};
pub use standards::{compare_score, CompanyComparison, CompanyStandards, GradingCompany};
pub use suggestions::generate_suggestions;
