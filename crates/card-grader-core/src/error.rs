//! Error types for grading configuration.

use thiserror::Error;

/// Errors raised while configuring the grading engine.
#[derive(Debug, Error, PartialEq)]
pub enum GradingError {
    /// Criterion weights do not sum to 1.0.
    #[error("weights must sum to 1.0 (±{tolerance}), got {sum:.3}")]
    InvalidWeights {
        /// Actual sum of the supplied weights.
        sum: f64,
        /// Accepted deviation from 1.0.
        tolerance: f64,
    },

    /// A weight is negative or not a finite number.
    #[error("weight for {criterion} must be a finite, non-negative number, got {value}")]
    InvalidWeight {
        /// Criterion name.
        criterion: String,
        /// Offending value.
        value: f64,
    },

    /// A weight specification could not be parsed.
    #[error("invalid weight specification '{0}': expected <criterion>=<weight>")]
    Parse(String),

    /// A criterion name is not one of edges, corners, surface, centering.
    #[error("unknown criterion '{0}'")]
    UnknownCriterion(String),
}

/// Result alias for grading configuration.
pub type GradingResult<T> = Result<T, GradingError>;
