use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::super::args::GenerateCommand;
use super::{CommandResult, CommandSummary, GenerateSummary};

use crate::cache::IncrementalCache;
use crate::config::load_config;
use crate::core::{ExtractOptions, GenerateContext};
use crate::emit;
use crate::frontend::scan_units;
use crate::plan::{self, PlanOptions};

/// Module name used when neither `--module` nor the config name one.
const FALLBACK_MODULE_NAME: &str = "module";

pub fn generate(cmd: GenerateCommand) -> Result<CommandResult> {
    let args = cmd.args;
    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    let config = load_config(&cwd)?.config;

    // CLI overrides config overrides defaults.
    let source_root = args
        .common
        .source_root
        .unwrap_or_else(|| PathBuf::from(&config.source_root));
    let cache_dir = args
        .common
        .cache_dir
        .unwrap_or_else(|| PathBuf::from(&config.cache_dir));
    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output_path));
    let module = args.module.or_else(|| config.module_namespace.clone());
    let weight_threshold = args.weight_threshold.unwrap_or(config.weight_threshold);
    let incremental = config.incremental && !args.no_incremental;

    let (files, skipped_files) = if cmd.units.is_empty() {
        let scan = scan_units(
            &source_root,
            &config.includes,
            &config.ignores,
            args.common.verbose,
        );
        (scan.files, scan.skipped_count)
    } else {
        (cmd.units, 0)
    };

    let cache = IncrementalCache::new(cache_dir, incremental, args.force);
    let context = GenerateContext::new(
        ExtractOptions {
            module_namespace: module.clone(),
        },
        cache,
    );

    let outcome = context.process_units(&files);
    let mut diagnostics = outcome.diagnostics;

    let plan = plan::build(
        &outcome.items,
        &PlanOptions { weight_threshold },
        &mut diagnostics,
    );

    let output_written = !outcome.items.is_empty();
    if output_written {
        let module_name = module.as_deref().unwrap_or(FALLBACK_MODULE_NAME);
        let rendered = emit::render(&plan, module_name);
        emit::write_output(&output_path, &rendered)?;
    }

    Ok(CommandResult {
        summary: CommandSummary::Generate(GenerateSummary {
            units_processed: outcome.units_processed,
            units_from_cache: outcome.units_from_cache,
            units_failed: outcome.units_failed,
            skipped_files,
            item_count: outcome.items.len(),
            registration_count: plan.registration_count(),
            output_path,
            output_written,
        }),
        diagnostics,
    })
}
