//! Standards command - print the grade scale.

use anyhow::Result;
use card_grader_core::GRADE_SCALE;
use clap::Args;

use super::OutputFormat;
use crate::output::{render_standards, JsonOutput};

/// Arguments for the standards command.
#[derive(Args, Clone)]
pub struct StandardsArgs {
    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Run the standards command.
pub fn run(args: &StandardsArgs) -> Result<()> {
    match args.format.unwrap_or_default() {
        OutputFormat::Text => print!("{}", render_standards(&GRADE_SCALE)),
        OutputFormat::Json => JsonOutput::stdout().write_value(&GRADE_SCALE[..], args.pretty)?,
        OutputFormat::Jsonl => {
            let output = JsonOutput::stdout();
            for tier in &GRADE_SCALE {
                output.write_value(tier, false)?;
            }
        }
    }
    Ok(())
}
