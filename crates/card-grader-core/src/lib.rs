//! Card Grader Core - Domain logic, analyzers and grading engine
//!
//! This crate scores a trading card photograph on four criteria (edges,
//! corners, surface, centering), combines the scores with weights and maps
//! the result to a PSA-style grade with a compliance report.

pub mod analyzers;
pub mod context;
pub mod domain;
pub mod error;
pub mod grading;
pub mod ports;

pub use analyzers::{create_analyzer, AnalyzerBackend, SimpleCardAnalyzer};
#[cfg(feature = "vision")]
pub use analyzers::{VisionCardAnalyzer, VisionConfig};
pub use context::{RequestContext, TraceStep};
pub use domain::{
    AnalysisResults, CardAnalyzer, CardGradeRecord, ComponentDetails, ComponentResult,
    Confidence, Criterion, Grade, GradingReport, WeightSet,
};
pub use error::{GradingError, GradingResult};
pub use grading::{CompanyComparison, GradingCompany, GradingEngine, GRADE_SCALE};
pub use ports::{CardSource, ProgressEvent, ProgressSink, ResultOutput};
