//! Test support utilities for card-grader.
//!
//! Provides mocks, synthetic card image builders and analysis result
//! builders for testing the grading pipeline.
//!
//! # Example
//!
//! ```
//! use card_grader_test_support::{AnalysisResultsBuilder, SyntheticCardBuilder};
//!
//! // A light card centered on a dark background
//! let card = SyntheticCardBuilder::standard().build_gray();
//!
//! // Component scores for the grading engine
//! let results = AnalysisResultsBuilder::uniform(90.0).edges(80.0).build();
//! assert_eq!(results.len(), 4);
//! ```

mod builders;
mod mocks;

pub use builders::{AnalysisResultsBuilder, SyntheticCardBuilder};
pub use mocks::{MockCardSource, MockProgressSink, MockResultOutput};
