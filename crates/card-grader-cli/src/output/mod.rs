//! Output formatting for CLI.

mod json;
mod progress;
mod text;

pub use json::JsonOutput;
pub use progress::ProgressBar;
pub use text::{render_record, render_standards, TextOutput};
