//! Run orchestration: cache gate, parallel extraction, merge.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::cache::{IncrementalCache, UnitCacheRecord, fingerprint};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::frontend::load_unit;

use super::extract::{ExtractOptions, extract_unit};
use super::item::ExportItem;
use super::validate::validate_all;

/// Everything one generation run needs: extraction options plus the cache.
pub struct GenerateContext {
    pub options: ExtractOptions,
    pub cache: IncrementalCache,
}

/// Result of processing a single unit, produced inside the parallel section.
pub struct UnitOutcome {
    pub unit: PathBuf,
    pub items: Vec<ExportItem>,
    pub diagnostics: Vec<Diagnostic>,
    pub fingerprint: String,
    pub from_cache: bool,
    pub failed: bool,
}

/// Merged result of a whole run's extraction phase.
pub struct GenerateOutcome {
    pub items: Vec<ExportItem>,
    pub diagnostics: Vec<Diagnostic>,
    pub units_processed: usize,
    pub units_from_cache: usize,
    pub units_failed: usize,
}

impl GenerateOutcome {
    /// A run is fatal only when not a single unit could be processed.
    pub fn all_units_failed(&self) -> bool {
        self.units_processed > 0 && self.units_failed == self.units_processed
    }
}

impl GenerateContext {
    pub fn new(options: ExtractOptions, cache: IncrementalCache) -> Self {
        Self { options, cache }
    }

    /// Process every unit and merge the surviving items.
    ///
    /// Units extract in parallel into unit-local buffers; there are no
    /// cross-unit dependencies during extraction. Cache commits happen
    /// after the join, on the collected per-unit results, so no two
    /// writers ever race on one record.
    pub fn process_units(&self, files: &[PathBuf]) -> GenerateOutcome {
        let mut outcomes: Vec<UnitOutcome> = files
            .par_iter()
            .map(|path| self.process_unit(path))
            .collect();

        let mut merged = GenerateOutcome {
            items: Vec::new(),
            diagnostics: Vec::new(),
            units_processed: outcomes.len(),
            units_from_cache: 0,
            units_failed: 0,
        };

        for outcome in &mut outcomes {
            if outcome.failed {
                merged.units_failed += 1;
            } else if outcome.from_cache {
                merged.units_from_cache += 1;
            } else if let Err(err) = self.cache.commit(&UnitCacheRecord {
                unit: outcome.unit.display().to_string(),
                fingerprint: outcome.fingerprint.clone(),
                items: outcome.items.clone(),
            }) {
                merged.diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::Note,
                    format!(
                        "failed to cache results for {}: {err:#}",
                        outcome.unit.display()
                    ),
                ));
            }
            merged.items.append(&mut outcome.items);
            merged.diagnostics.append(&mut outcome.diagnostics);
        }

        merged
    }

    /// Cache gate + extraction for one unit.
    fn process_unit(&self, path: &Path) -> UnitOutcome {
        let unit_id = path.display().to_string();
        let mut diagnostics = Vec::new();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::FrontEndFailure,
                    format!("failed to read unit {unit_id}: {err}"),
                ));
                return UnitOutcome {
                    unit: path.to_path_buf(),
                    items: Vec::new(),
                    diagnostics,
                    fingerprint: String::new(),
                    from_cache: false,
                    failed: true,
                };
            }
        };
        let current = fingerprint(&bytes);

        if !self.cache.should_extract(&unit_id, &current, &mut diagnostics)
            && let Some(record) = self.cache.lookup(&unit_id, &mut diagnostics)
        {
            return UnitOutcome {
                unit: path.to_path_buf(),
                items: record.items,
                diagnostics,
                fingerprint: current,
                from_cache: true,
                failed: false,
            };
        }

        let unit = match load_unit(path, &bytes) {
            Ok(unit) => unit,
            Err(err) => {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::FrontEndFailure,
                    format!("failed to load unit {unit_id}: {err:#}"),
                ));
                return UnitOutcome {
                    unit: path.to_path_buf(),
                    items: Vec::new(),
                    diagnostics,
                    fingerprint: current,
                    from_cache: false,
                    failed: true,
                };
            }
        };

        let extraction = extract_unit(&unit, &self.options);
        diagnostics.extend(extraction.diagnostics);
        let items = validate_all(extraction.items, &mut diagnostics);

        UnitOutcome {
            unit: path.to_path_buf(),
            items,
            diagnostics,
            fingerprint: current,
            from_cache: false,
            failed: false,
        }
    }
}
