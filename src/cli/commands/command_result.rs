use std::path::PathBuf;

use crate::diagnostics::Diagnostic;

#[derive(Debug)]
pub enum CommandSummary {
    Generate(GenerateSummary),
    Clean(CleanSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct GenerateSummary {
    pub units_processed: usize,
    pub units_from_cache: usize,
    pub units_failed: usize,
    /// Scanned files not matching the unit suffix or an include pattern.
    pub skipped_files: usize,
    /// Surviving export items after validation and merge.
    pub item_count: usize,
    /// Registration statements in the emitted plan.
    pub registration_count: usize,
    pub output_path: PathBuf,
    /// False when nothing was extracted and no file was written.
    pub output_written: bool,
}

#[derive(Debug)]
pub struct CleanSummary {
    pub removed_records: u64,
    pub cache_dir: PathBuf,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running a rivet command.
pub struct CommandResult {
    pub summary: CommandSummary,
    /// All diagnostics collected during the run, for the reporter.
    pub diagnostics: Vec<Diagnostic>,
}
