//! CLI argument definitions using clap.
//!
//! This module defines the command-line interface structure for all rivet
//! commands. It uses clap's derive API for declarative argument parsing.
//!
//! ## Commands
//!
//! - `generate`: Extract binding metadata and emit registration source
//! - `clean`: Remove the incremental cache store
//! - `init`: Initialize rivet configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Generate(cmd)) => cmd.args.common.verbose,
            Some(Command::Clean(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract binding metadata from declaration units and emit
    /// registration source
    Generate(GenerateCommand),
    /// Remove the incremental cache store
    Clean(CleanCommand),
    /// Initialize rivet configuration file
    Init,
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Declaration unit root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Cache directory (overrides config file)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output file for the generated registration source
    /// (overrides config file)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Module name and run-level default namespace
    #[arg(long)]
    pub module: Option<String>,

    /// Disable the incremental cache for this run
    #[arg(long)]
    pub no_incremental: bool,

    /// Re-extract every unit even when its fingerprint is unchanged
    #[arg(long)]
    pub force: bool,

    /// Registration weight above which a type's members are batched
    #[arg(long)]
    pub weight_threshold: Option<usize>,
}

#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Unit files to process (default: scan the source root)
    pub units: Vec<PathBuf>,
    #[command(flatten)]
    pub args: GenerateArgs,
}

#[derive(Debug, Parser)]
pub struct CleanArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CleanCommand {
    #[command(flatten)]
    pub args: CleanArgs,
}
