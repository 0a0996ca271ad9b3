use anyhow::Result;

mod args;
pub mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, CleanCommand, Command, CommonArgs, GenerateArgs, GenerateCommand};
pub use exit_status::{ExitStatus, exit_status_from_result};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let result = run::run(args)?;
    report::print(&result, verbose);

    Ok(exit_status_from_result(&result))
}
