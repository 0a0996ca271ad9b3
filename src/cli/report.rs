//! Report formatting and printing utilities.
//!
//! This module prints run diagnostics in cargo-style format plus a one-line
//! command summary. Separate from core logic so rivet can be used as a
//! library without pulling in terminal output.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{CleanSummary, CommandResult, CommandSummary, GenerateSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::diagnostics::{Diagnostic, Severity, error_count};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print a finished command's diagnostics and summary to stdout.
pub fn print(result: &CommandResult, verbose: bool) {
    print_to(result, verbose, &mut io::stdout().lock());
}

/// Print to a custom writer. Useful for testing or redirecting output.
pub fn print_to<W: Write>(result: &CommandResult, verbose: bool, writer: &mut W) {
    report_diagnostics_to(&result.diagnostics, verbose, writer);

    let errors = error_count(&result.diagnostics);
    if errors > 0 {
        let _ = writeln!(
            writer,
            "{} {} error(s) during the run",
            "error:".bold().red(),
            errors
        );
    }

    match &result.summary {
        CommandSummary::Generate(summary) => print_generate_summary(summary, writer),
        CommandSummary::Clean(summary) => print_clean_summary(summary, writer),
        CommandSummary::Init(summary) => print_init_summary(summary, writer),
    }
}

/// Print diagnostics sorted by severity, then location.
///
/// Info and Debug entries are shown only in verbose mode.
pub fn report_diagnostics_to<W: Write>(
    diagnostics: &[Diagnostic],
    verbose: bool,
    writer: &mut W,
) {
    let mut visible: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| verbose || d.severity <= Severity::Warning)
        .collect();
    visible.sort_by(|a, b| {
        (a.severity, &a.location, &a.message).cmp(&(b.severity, &b.location, &b.message))
    });

    for diagnostic in &visible {
        print_diagnostic(diagnostic, writer);
    }
    if !visible.is_empty() {
        let _ = writeln!(writer);
    }
}

fn print_diagnostic<W: Write>(diagnostic: &Diagnostic, writer: &mut W) {
    let heading = format!("{}[{}]:", diagnostic.severity, diagnostic.kind);
    let heading = match diagnostic.severity {
        Severity::Error => heading.bold().red(),
        Severity::Warning => heading.bold().yellow(),
        Severity::Info => heading.bold().cyan(),
        Severity::Debug => heading.dimmed(),
    };
    let _ = writeln!(writer, "{} {}", heading, diagnostic.message);
    if let Some(location) = &diagnostic.location
        && !location.file.is_empty()
    {
        let _ = writeln!(
            writer,
            "  {} {}:{}",
            "-->".blue(),
            location.file,
            location.line
        );
    }
}

fn print_generate_summary<W: Write>(summary: &GenerateSummary, writer: &mut W) {
    if !summary.output_written {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "No annotated declarations found in {} {}",
                summary.units_processed,
                unit_word(summary.units_processed)
            )
            .red()
        );
        return;
    }

    let mut detail = format!(
        "Generated {} registrations from {} {}",
        summary.registration_count,
        summary.units_processed,
        unit_word(summary.units_processed)
    );
    if summary.units_from_cache > 0 {
        detail.push_str(&format!(" ({} cached)", summary.units_from_cache));
    }
    detail.push_str(&format!(" -> {}", summary.output_path.display()));
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), detail.green());

    if summary.units_failed > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} could not be processed",
            "warning:".bold().yellow(),
            summary.units_failed,
            unit_word(summary.units_failed)
        );
    }
}

fn print_clean_summary<W: Write>(summary: &CleanSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Removed {} cache record(s) from {}",
            summary.removed_records,
            summary.cache_dir.display()
        )
        .green()
    );
}

fn print_init_summary<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn unit_word(count: usize) -> &'static str {
    if count == 1 { "unit" } else { "units" }
}
