//! Per-card grading record emitted by the pipeline.

use serde::{Deserialize, Serialize};

use super::{AnalysisResults, GradingReport};
use crate::grading::CompanyComparison;

/// Everything produced for one graded card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardGradeRecord {
    /// Path to the card image.
    pub path: String,
    /// Timestamp of grading (ISO 8601).
    pub timestamp: String,
    /// Analyzer backend that produced the scores.
    pub analyzer: String,
    /// Request id used to correlate log lines.
    pub request_id: String,
    /// Raw per-criterion analysis.
    pub analysis_results: AnalysisResults,
    /// Grading report.
    pub grading_report: GradingReport,
    /// Comparison with the selected grading company's thresholds.
    pub company_comparison: CompanyComparison,
    /// Pipeline steps recorded when tracing is enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace_steps: Vec<String>,
}
