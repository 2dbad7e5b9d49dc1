//! Core domain types for card grading.

mod analyzer;
mod criterion;
mod details;
mod record;
mod report;
mod weights;

pub use analyzer::{CardAnalyzer, NO_IMAGE_LOADED};
pub use criterion::{clamp_score, AnalysisResults, ComponentResult, Criterion};
pub use details::{
    CenteringDetails, ComponentDetails, CornerDetails, EdgeDetails, SimulatedDetails,
    SurfaceDetails,
};
pub use record::CardGradeRecord;
pub use report::{
    CenteringEvaluation, ComplianceCheck, ComplianceReport, ComponentBreakdown, Confidence, Grade,
    GradingReport,
};
pub use weights::{WeightSet, WEIGHT_SUM_TOLERANCE};
