//! Analyze command - grade card images.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use card_grader_adapters::FsCardSource;
use card_grader_core::{
    create_analyzer, AnalyzerBackend, CardGradeRecord, CardSource, GradingEngine, ProgressEvent,
    ProgressSink, RequestContext, ResultOutput, WeightSet,
};
use clap::Args;
use tracing::{debug, info, warn};

use super::{defaults, iso_timestamp, parse_backend, parse_weights, ExitCode, OutputFormat};
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar, TextOutput};

/// Shared arguments for grading card images.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Card images or directories to grade
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Analyzer backend: auto, vision or simple
    #[arg(long, value_name = "BACKEND", value_parser = parse_backend)]
    pub analyzer: Option<AnalyzerBackend>,

    /// Grading company whose thresholds are compared against
    #[arg(long, value_name = "NAME")]
    pub company: Option<String>,

    /// Criterion weights, e.g. edges=0.25,corners=0.3,surface=0.3,centering=0.15
    #[arg(long, value_name = "WEIGHTS", value_parser = parse_weights)]
    pub weights: Option<WeightSet>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Include analyzer measurements in text output
    #[arg(short, long)]
    pub detailed: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Record pipeline steps for each card
    #[arg(long)]
    pub trace: bool,

    /// Log how long each pipeline step takes
    #[arg(long)]
    pub timing: bool,
}

impl AnalyzeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Analyzer, company and weights: CLI > config
        args.analyzer = args.analyzer.or_else(|| config.backend());
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
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        if !args.detailed {
            args.detailed = config.output.detailed.unwrap_or(false);
        }

        args
    }

    /// Get analyzer backend with fallback to auto-detection.
    fn analyzer(&self) -> AnalyzerBackend {
        self.analyzer.unwrap_or_default()
    }

    /// Get grading company with fallback to PSA.
    fn company(&self) -> &str {
        self.company.as_deref().unwrap_or(defaults::COMPANY)
    }

    /// Get output format with fallback to text.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Build the grading engine from the configured weights.
    fn engine(&self) -> GradingEngine {
        self.weights
            .clone()
            .map_or_else(GradingEngine::new, GradingEngine::with_weights)
    }
}

/// Result of running the analyze command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct AnalyzeResult {
    /// Number of cards graded.
    pub processed: usize,
    /// Number of cards skipped.
    pub skipped: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the analyze command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    info!("Running analyze command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsCardSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    // Determine if we should show progress
    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let engine = args.engine();
    debug!("Grading with weights {:?}", engine.weights());

    let format = args.format();
    let json = JsonOutput::stdout();
    let text = TextOutput::stdout(args.detailed);
    let output: &dyn ResultOutput = match format {
        OutputFormat::Text => &text,
        OutputFormat::Json | OutputFormat::Jsonl => &json,
    };

    let batch = process_cards(
        &source,
        &engine,
        output,
        &progress_bar,
        args,
        format == OutputFormat::Json,
    )?;

    // For JSON format, output all records as one array
    if format == OutputFormat::Json {
        json.write_array(&batch.records, args.pretty)?;
    }
    output.flush()?;

    let exit_code = if batch.skipped > 0 {
        ExitCode::Skipped
    } else {
        ExitCode::Success
    };

    Ok(AnalyzeResult {
        processed: batch.processed,
        skipped: batch.skipped,
        exit_code,
    })
}

/// Outcome of grading every card from a source.
struct Batch {
    processed: usize,
    skipped: usize,
    /// Records held back for array output.
    records: Vec<CardGradeRecord>,
}

/// Grade every card from `source`, streaming records to `output` unless
/// `collect` asks for them to be returned instead.
fn process_cards(
    source: &dyn CardSource,
    engine: &GradingEngine,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    args: &AnalyzeArgs,
    collect: bool,
) -> Result<Batch> {
    let total = source.count_hint();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut records = Vec::new();

    for (index, card) in source.cards().enumerate() {
        let path = match card {
            Ok(path) => path,
            Err(e) => {
                // The error message names the path
                progress.on_event(ProgressEvent::Skipped {
                    path: format!("card {index}"),
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        let display = path.display().to_string();
        progress.on_event(ProgressEvent::Started {
            path: display.clone(),
            index,
            total,
        });

        let record = match grade_card(&path, engine, args) {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to grade {}: {e:#}", path.display());
                progress.on_event(ProgressEvent::Skipped {
                    path: display,
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        progress.on_event(ProgressEvent::Completed {
            path: display,
            grade: record.grading_report.predicted_grade,
            score: record.grading_report.overall_score,
        });

        if collect {
            records.push(record);
        } else {
            output.write(&record)?;
        }
        processed += 1;
    }

    progress.on_event(ProgressEvent::Finished { processed, skipped });

    Ok(Batch {
        processed,
        skipped,
        records,
    })
}

/// Grade a single card with a fresh analyzer and request context.
fn grade_card(path: &Path, engine: &GradingEngine, args: &AnalyzeArgs) -> Result<CardGradeRecord> {
    let mut ctx = RequestContext::new(args.trace, args.timing);
    let span = ctx.span();
    let _entered = span.enter();

    let mut analyzer = create_analyzer(args.analyzer());
    debug!("Grading {} with {} analyzer", path.display(), analyzer.name());

    ctx.timed("load image", || analyzer.load_image(path))
        .with_context(|| format!("Failed to load card image {}", path.display()))?;
    ctx.checkpoint("image loaded");

    let results = ctx.timed("analyze", || analyzer.analyze_all());
    let report = ctx.timed("grade", || engine.generate_detailed_report(&results));
    let company_comparison = engine.compare_to_standards(&results, args.company());
    ctx.log_summary();

    Ok(CardGradeRecord {
        path: path.display().to_string(),
        timestamp: iso_timestamp(),
        analyzer: analyzer.name().to_string(),
        request_id: ctx.request_id(),
        analysis_results: results,
        grading_report: report,
        company_comparison,
        trace_steps: ctx.into_step_lines(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use card_grader_test_support::{MockCardSource, MockProgressSink, MockResultOutput};
    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::commands::Cli;

    fn args(extra: &[&str]) -> AnalyzeArgs {
        let mut argv = vec!["card-grader", "--analyzer", "simple"];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv).analyze
    }

    fn card_file(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"not really a png").unwrap();
        path
    }

    #[test]
    fn test_process_streams_records() {
        let dir = TempDir::new().unwrap();
        let source = MockCardSource::new(vec![card_file(&dir, "gem_mint_card.png")]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let batch = process_cards(
            &source,
            &GradingEngine::new(),
            &output,
            &progress,
            &args(&[]),
            false,
        )
        .unwrap();

        assert_eq!(batch.processed, 1);
        assert_eq!(batch.skipped, 0);
        assert!(batch.records.is_empty());

        let records = output.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].analyzer, "simple");
        assert_eq!(records[0].grading_report.overall_score, 83.75);
        assert_eq!(records[0].grading_report.predicted_grade.value(), 8);
        assert_eq!(progress.completed_count(), 1);
        assert_eq!(progress.finished_counts(), Some((1, 0)));
    }

    #[test]
    fn test_process_collects_for_array_output() {
        let dir = TempDir::new().unwrap();
        let source = MockCardSource::new(vec![
            card_file(&dir, "a.png"),
            card_file(&dir, "b.png"),
        ]);
        let output = MockResultOutput::new();

        let batch = process_cards(
            &source,
            &GradingEngine::new(),
            &output,
            &MockProgressSink::new(),
            &args(&[]),
            true,
        )
        .unwrap();

        assert_eq!(batch.records.len(), 2);
        assert!(output.records().is_empty());
    }

    #[test]
    fn test_unloadable_card_is_skipped() {
        let dir = TempDir::new().unwrap();
        let source = MockCardSource::new(vec![
            dir.path().join("missing.png"),
            card_file(&dir, "present.png"),
        ]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let batch = process_cards(
            &source,
            &GradingEngine::new(),
            &output,
            &progress,
            &args(&[]),
            false,
        )
        .unwrap();

        assert_eq!(batch.processed, 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(progress.skipped_count(), 1);
    }

    #[test]
    fn test_source_errors_are_skipped() {
        let source = MockCardSource::failing("Path does not exist: nowhere.png");
        let progress = MockProgressSink::new();

        let batch = process_cards(
            &source,
            &GradingEngine::new(),
            &MockResultOutput::new(),
            &progress,
            &args(&[]),
            false,
        )
        .unwrap();

        assert_eq!(batch.skipped, 1);
        assert_eq!(progress.skipped_count(), 1);
    }

    #[test]
    fn test_trace_steps_recorded() {
        let dir = TempDir::new().unwrap();
        let path = card_file(&dir, "card.png");

        let record = grade_card(&path, &GradingEngine::new(), &args(&["--trace"])).unwrap();
        assert!(record.trace_steps.iter().any(|s| s.contains("analyze")));

        let record = grade_card(&path, &GradingEngine::new(), &args(&[])).unwrap();
        assert!(record.trace_steps.is_empty());
    }

    #[test]
    fn test_company_is_echoed() {
        let dir = TempDir::new().unwrap();
        let path = card_file(&dir, "card.png");

        let record =
            grade_card(&path, &GradingEngine::new(), &args(&["--company", "BGS"])).unwrap();
        assert_eq!(record.company_comparison.grading_company, "BGS");
    }

    #[test]
    fn test_cli_overrides_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [analyzer]
            backend = "vision"

            [grading]
            company = "BGS"

            [output]
            format = "jsonl"
            detailed = true
            "#,
        )
        .unwrap();

        let merged = AnalyzeArgs::with_config(args(&["--company", "PSA"]), &config);
        assert_eq!(merged.analyzer(), AnalyzerBackend::Simple);
        assert_eq!(merged.company(), "PSA");
        assert_eq!(merged.format(), OutputFormat::Jsonl);
        assert!(merged.detailed);
    }

    #[test]
    fn test_config_weights_apply_when_cli_silent() {
        let config: AppConfig = toml::from_str(
            r"
            [weights]
            edges = 0.5
            corners = 0.5
            ",
        )
        .unwrap();

        let merged = AnalyzeArgs::with_config(args(&[]), &config);
        assert_eq!(merged.engine().weights().len(), 2);

        let merged = AnalyzeArgs::with_config(
            args(&["--weights", "surface=0.6,centering=0.4"]),
            &config,
        );
        let weights = merged.engine().weights().clone();
        assert_eq!(weights.get(card_grader_core::Criterion::Surface), Some(0.6));
    }

    #[test]
    fn test_defaults_without_config() {
        let merged = AnalyzeArgs::with_config(
            Cli::parse_from(["card-grader", "card.png"]).analyze,
            &AppConfig::default(),
        );
        assert_eq!(merged.analyzer(), AnalyzerBackend::Auto);
        assert_eq!(merged.company(), "PSA");
        assert_eq!(merged.format(), OutputFormat::Text);
        assert_eq!(merged.engine().weights(), &WeightSet::default());
    }
}
