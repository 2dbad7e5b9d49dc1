//! Human-readable report output.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use card_grader_core::grading::GradeTier;
use card_grader_core::{CardGradeRecord, Criterion, ResultOutput};

const RULE_WIDTH: usize = 60;
const SUBRULE_WIDTH: usize = 40;

/// Text report output adapter.
pub struct TextOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    detailed: bool,
}

impl TextOutput {
    /// Creates a text output writing to stdout.
    #[must_use]
    pub fn stdout(detailed: bool) -> Self {
        Self::new(Box::new(io::stdout()), detailed)
    }

    /// Creates a text output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, detailed: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            detailed,
        }
    }
}

impl ResultOutput for TextOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, record: &CardGradeRecord) -> Result<()> {
        let text = render_record(record, self.detailed);
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

fn title(criterion: Criterion) -> String {
    let name = criterion.as_str();
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

fn title_list(criteria: &[Criterion]) -> String {
    criteria
        .iter()
        .map(|c| title(*c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Renders one graded card as a text report.
#[must_use]
pub fn render_record(record: &CardGradeRecord, detailed: bool) -> String {
    RecordReport { record, detailed }.to_string()
}

/// Renders the grade scale as a table.
#[must_use]
pub fn render_standards(scale: &[GradeTier]) -> String {
    StandardsTable(scale).to_string()
}

struct RecordReport<'a> {
    record: &'a CardGradeRecord,
    detailed: bool,
}

impl fmt::Display for RecordReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        let report = &record.grading_report;
        let rule = "=".repeat(RULE_WIDTH);
        let subrule = "-".repeat(SUBRULE_WIDTH);

        writeln!(f, "\n{rule}")?;
        writeln!(f, "CARD GRADING REPORT: {}", record.path)?;
        writeln!(f, "{rule}")?;

        writeln!(
            f,
            "\nOVERALL GRADE: {}/10 ({})",
            report.predicted_grade, report.grade_description
        )?;
        writeln!(f, "Overall Score: {:.2}/100", report.overall_score)?;
        writeln!(f, "Confidence Level: {}", report.confidence_level)?;
        writeln!(f, "Analyzer: {}", record.analyzer)?;
        writeln!(f, "\n{}", report.detailed_description)?;

        writeln!(f, "\nCOMPONENT BREAKDOWN:")?;
        writeln!(f, "{subrule}")?;
        for (criterion, part) in &report.component_breakdown {
            let mark = report
                .psa_compliance
                .component_compliance
                .get(criterion)
                .map_or("", |c| if c.compliant { "  [ok]" } else { "  [fails]" });
            writeln!(
                f,
                "{:>12}: {:5.1}/100 (Grade: {}/10, Weight: {:3.0}%){mark}",
                title(*criterion),
                part.score,
                part.grade,
                part.weight * 100.0
            )?;
        }

        let centering = &report.centering_evaluation;
        writeln!(
            f,
            "\nCENTERING: estimated {}, required {} for grade {} ({})",
            centering.estimated_centering_ratio,
            centering.required_for_grade,
            report.predicted_grade,
            if centering.meets_psa_standard {
                "meets standard"
            } else {
                "below standard"
            }
        )?;
        writeln!(f, "COMPLIANCE: {}", report.psa_compliance.compliance_summary)?;

        if !report.strengths.is_empty() {
            writeln!(f, "\nSTRENGTHS: {}", title_list(&report.strengths))?;
        }
        if !report.weaknesses.is_empty() {
            writeln!(
                f,
                "\nAREAS FOR IMPROVEMENT: {}",
                title_list(&report.weaknesses)
            )?;
        }

        writeln!(f, "\nSUGGESTIONS:")?;
        for suggestion in &report.improvement_suggestions {
            writeln!(f, "   - {suggestion}")?;
        }

        let comparison = &record.company_comparison;
        writeln!(
            f,
            "\n{} STANDARDS COMPARISON:",
            comparison.grading_company.to_uppercase()
        )?;
        writeln!(
            f,
            "   Meets Gem Mint Standard: {}",
            yes_no(comparison.meets_gem_mint)
        )?;
        writeln!(f, "   Meets Mint Standard: {}", yes_no(comparison.meets_mint))?;

        if self.detailed {
            write_details(f, record)?;
        }

        if !record.trace_steps.is_empty() {
            writeln!(f, "\nTRACE ({}):", record.request_id)?;
            for step in &record.trace_steps {
                writeln!(f, "   {step}")?;
            }
        }

        writeln!(f, "\n{rule}")
    }
}

fn write_details(f: &mut fmt::Formatter<'_>, record: &CardGradeRecord) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(f, "\n{rule}")?;
    writeln!(f, "DETAILED TECHNICAL ANALYSIS")?;
    writeln!(f, "{rule}")?;

    for (criterion, result) in &record.analysis_results {
        writeln!(f, "\n{} ANALYSIS:", criterion.as_str().to_uppercase())?;
        writeln!(f, "  Score: {:.2}/100", result.score)?;
        if let Some(details) = &result.details {
            writeln!(f, "  Technical Details:")?;
            for (key, value) in details.fields() {
                writeln!(f, "    {key}: {value}")?;
            }
        }
    }
    Ok(())
}

struct StandardsTable<'a>(&'a [GradeTier]);

impl fmt::Display for StandardsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>5}  {:>9}  {:<20}  {:>8}  {:>8}",
            "Grade", "Min score", "Label", "Front", "Back"
        )?;
        for tier in self.0 {
            let front = tier.centering_tolerance.front;
            let back = tier.centering_tolerance.back;
            writeln!(
                f,
                "{:>5}  {:>9.1}  {:<20}  {:>8}  {:>8}",
                tier.grade.to_string(),
                tier.min_score,
                tier.label,
                format!("{front}/{}", 100 - front),
                format!("{back}/{}", 100 - back),
            )?;
        }
        Ok(())
    }
}
