use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::super::args::CleanCommand;
use super::{CleanSummary, CommandResult, CommandSummary};

use crate::cache::IncrementalCache;
use crate::config::load_config;

pub fn clean(cmd: CleanCommand) -> Result<CommandResult> {
    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    let config = load_config(&cwd)?.config;

    let cache_dir = cmd
        .args
        .common
        .cache_dir
        .unwrap_or_else(|| PathBuf::from(&config.cache_dir));

    let cache = IncrementalCache::new(cache_dir.clone(), true, false);
    let removed_records = cache.clear()?;

    Ok(CommandResult {
        summary: CommandSummary::Clean(CleanSummary {
            removed_records,
            cache_dir,
        }),
        diagnostics: Vec::new(),
    })
}
