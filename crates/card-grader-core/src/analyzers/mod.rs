//! Card analyzer backends.
//!
//! Every backend implements [`CardAnalyzer`](crate::domain::CardAnalyzer);
//! use [`create_analyzer`] to pick one at runtime.

mod select;
mod simple;
#[cfg(feature = "vision")]
mod vision;

pub use select::{create_analyzer, AnalyzerBackend};
pub use simple::SimpleCardAnalyzer;
#[cfg(feature = "vision")]
pub use vision::{VisionCardAnalyzer, VisionConfig};
