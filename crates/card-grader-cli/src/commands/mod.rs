//! CLI command definitions and handlers.

pub mod analyze;
pub mod grade;
pub mod standards;

use card_grader_core::{AnalyzerBackend, WeightSet};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

/// Card Grader - Estimate trading-card condition grades from photographs
#[derive(Parser)]
#[command(name = "card-grader")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared analyze arguments (paths, analyzer, output).
    #[command(flatten)]
    pub analyze: analyze::AnalyzeArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Grade card images
    Analyze(analyze::AnalyzeArgs),
    /// Grade pre-computed analysis results from a JSON file
    Grade(grade::GradeArgs),
    /// Print the grade scale
    Standards(standards::StandardsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every card was graded.
    Success = 0,
    /// Some cards could not be graded.
    Skipped = 1,
    /// The command failed.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Single JSON array
    Json,
    /// JSON Lines (one JSON object per line)
    Jsonl,
}

impl OutputFormat {
    /// Parses a config file value.
    fn from_config(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "jsonl" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

/// Hardcoded defaults shared by the grading commands.
mod defaults {
    pub const COMPANY: &str = "PSA";
}

/// Parse an analyzer backend name.
fn parse_backend(s: &str) -> Result<AnalyzerBackend, String> {
    s.parse()
}

/// Parse and validate `edges=0.25,corners=0.3,...`.
fn parse_weights(s: &str) -> Result<WeightSet, String> {
    s.parse::<WeightSet>().map_err(|e| e.to_string())
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
