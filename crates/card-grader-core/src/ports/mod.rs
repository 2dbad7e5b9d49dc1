//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the grading core and the
//! adapters that feed it cards and consume its records.

mod card_source;
mod progress;
mod result_output;

pub use card_source::CardSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
