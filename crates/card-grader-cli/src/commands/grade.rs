//! Grade command - grade pre-computed analysis results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use card_grader_core::{
    AnalysisResults, CardGradeRecord, GradingEngine, RequestContext, WeightSet,
};
use clap::Args;
use tracing::info;

use super::{defaults, iso_timestamp, parse_weights, OutputFormat};
use crate::config::AppConfig;
use crate::output::{render_record, JsonOutput};

/// Analyzer name recorded for results read from a file.
const PRECOMPUTED: &str = "precomputed";

/// Arguments for the grade command.
#[derive(Args, Clone)]
pub struct GradeArgs {
    /// JSON file mapping criterion names to `{score, details}` results
    pub results: PathBuf,

    /// Grading company whose thresholds are compared against
    #[arg(long, value_name = "NAME")]
    pub company: Option<String>,

    /// Criterion weights, e.g. edges=0.25,corners=0.3,surface=0.3,centering=0.15
    #[arg(long, value_name = "WEIGHTS", value_parser = parse_weights)]
    pub weights: Option<WeightSet>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Include component details in text output
    #[arg(short, long)]
    pub detailed: bool,
}

impl GradeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.company.is_none() {
            args.company.clone_from(&config.grading.company);
        }
        if args.weights.is_none() {
            args.weights = config.weight_set();
        }
        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.detailed {
            args.detailed = config.output.detailed.unwrap_or(false);
        }
        args
    }
}

/// Read analysis results from a JSON file.
fn read_results(path: &Path) -> Result<AnalysisResults> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read results file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid analysis results in {}", path.display()))
}

/// Grade the results file and build a record for it.
fn grade_file(args: &GradeArgs) -> Result<CardGradeRecord> {
    let results = read_results(&args.results)?;
    info!(
        "Grading {} pre-computed components from {}",
        results.len(),
        args.results.display()
    );

    let engine = args
        .weights
        .clone()
        .map_or_else(GradingEngine::new, GradingEngine::with_weights);
    let company = args.company.as_deref().unwrap_or(defaults::COMPANY);

    Ok(CardGradeRecord {
        path: args.results.display().to_string(),
        timestamp: iso_timestamp(),
        analyzer: PRECOMPUTED.to_string(),
        request_id: RequestContext::new(false, false).request_id(),
        grading_report: engine.generate_detailed_report(&results),
        company_comparison: engine.compare_to_standards(&results, company),
        analysis_results: results,
        trace_steps: Vec::new(),
    })
}

/// Run the grade command.
pub fn run(args: &GradeArgs) -> Result<()> {
    let record = grade_file(args)?;

    match args.format.unwrap_or_default() {
        OutputFormat::Text => print!("{}", render_record(&record, args.detailed)),
        OutputFormat::Json => JsonOutput::stdout().write_value(&record, args.pretty)?,
        OutputFormat::Jsonl => JsonOutput::stdout().write_value(&record, false)?,
    }

    Ok(())
}
