//! Card Grader CLI - Trading-card condition grading from photographs.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::analyze::AnalyzeArgs;
use commands::grade::GradeArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Analyze(args)) => analyze(AnalyzeArgs::with_config(args, &config)),
        Some(Commands::Grade(args)) => {
            match commands::grade::run(&GradeArgs::with_config(args, &config)) {
                Ok(()) => ExitCode::Success,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        Some(Commands::Standards(ref args)) => match commands::standards::run(args) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        None => {
            // Default behavior: run analyze with flattened args
            if cli.analyze.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            analyze(AnalyzeArgs::with_config(cli.analyze, &config))
        }
    };

    exit_code.into()
}

fn analyze(args: AnalyzeArgs) -> ExitCode {
    match commands::analyze::run(&args) {
        Ok(result) => result.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
