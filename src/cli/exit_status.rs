use std::process::ExitCode;

use super::commands::{CommandResult, CommandSummary};

/// Exit status for CLI commands, following common conventions for code
/// generation tools.
///
/// - `Success` (0): Command completed, a plan with at least one item was emitted
/// - `Failure` (1): Command completed but produced nothing usable
/// - `Error` (2): Command failed due to internal error (config error, I/O error, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed, output was emitted.
    Success,
    /// Command completed but found no annotated declarations, or every
    /// unit failed.
    Failure,
    /// Command failed due to internal error (config error, I/O error, etc.).
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

/// Derive the exit status from a finished command's result.
pub fn exit_status_from_result(result: &CommandResult) -> ExitStatus {
    match &result.summary {
        CommandSummary::Generate(summary) => {
            if summary.units_failed == summary.units_processed && summary.units_processed > 0 {
                ExitStatus::Failure
            } else if summary.item_count == 0 {
                ExitStatus::Failure
            } else {
                ExitStatus::Success
            }
        }
        CommandSummary::Clean(_) | CommandSummary::Init(_) => ExitStatus::Success,
    }
}
