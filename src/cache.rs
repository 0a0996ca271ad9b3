//! Incremental extraction cache.
//!
//! Extraction is wrapped at unit granularity: each unit's raw bytes are
//! fingerprinted with BLAKE3, and a unit whose fingerprint matches its stored
//! record is served from the cache instead of being re-extracted. Records are
//! one JSON file per unit, keyed by a BLAKE3 hash of the unit identity, and
//! committed with a write-temp-then-rename upsert so an aborted run leaves the
//! prior record untouched. A missing or unreadable store is treated as cold
//! for every unit; it is never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::ExportItem;
use crate::diagnostics::{Diagnostic, DiagnosticKind};

/// Default cache directory, relative to the source root.
pub const DEFAULT_CACHE_DIR: &str = ".rivet-cache";

/// Compute the content fingerprint of a unit's raw bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Persisted record for one unit: its identity, the fingerprint of the bytes
/// the items were extracted from, and the extracted items themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCacheRecord {
    /// Unit identity (the unit file path as scanned).
    pub unit: String,
    /// BLAKE3 hex fingerprint of the unit's bytes at extraction time.
    pub fingerprint: String,
    pub items: Vec<ExportItem>,
}

/// Cache store for unit extraction results.
pub struct IncrementalCache {
    store_dir: PathBuf,
    enabled: bool,
    force_rebuild: bool,
}

impl IncrementalCache {
    pub fn new(store_dir: PathBuf, enabled: bool, force_rebuild: bool) -> Self {
        Self {
            store_dir,
            enabled,
            force_rebuild,
        }
    }

    /// A cache that never hits and never stores.
    pub fn disabled() -> Self {
        Self::new(PathBuf::new(), false, false)
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    fn record_path(&self, unit: &str) -> PathBuf {
        let key = blake3::hash(unit.as_bytes()).to_hex().to_string();
        self.store_dir.join(format!("{key}.json"))
    }

    /// Look up the stored record for a unit.
    ///
    /// A corrupt record yields `None` plus an info diagnostic; the unit is
    /// simply re-extracted.
    pub fn lookup(&self, unit: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<UnitCacheRecord> {
        if !self.enabled {
            return None;
        }
        let path = self.record_path(unit);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                diagnostics.push(Diagnostic::info(
                    DiagnosticKind::UnreadableCacheRecord,
                    format!("cache record for '{unit}' unreadable ({e}); treating as cold"),
                ));
                return None;
            }
        };
        match serde_json::from_slice::<UnitCacheRecord>(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                diagnostics.push(Diagnostic::info(
                    DiagnosticKind::UnreadableCacheRecord,
                    format!("cache record for '{unit}' corrupt ({e}); treating as cold"),
                ));
                None
            }
        }
    }

    /// Decide whether a unit needs (re-)extraction.
    ///
    /// True when force-rebuild is set, no record exists, or the current
    /// fingerprint differs from the stored one.
    pub fn should_extract(
        &self,
        unit: &str,
        current_fingerprint: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        if !self.enabled || self.force_rebuild {
            return true;
        }
        match self.lookup(unit, diagnostics) {
            Some(record) => record.fingerprint != current_fingerprint,
            None => true,
        }
    }

    /// Atomically upsert a unit's record.
    ///
    /// The record is serialized to a sibling temp file and renamed into
    /// place, so a crash mid-write never leaves a fingerprint without its
    /// items.
    pub fn commit(&self, record: &UnitCacheRecord) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        fs::create_dir_all(&self.store_dir).with_context(|| {
            format!(
                "Failed to create cache directory: {}",
                self.store_dir.display()
            )
        })?;

        let path = self.record_path(&record.unit);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_vec(record).context("Failed to serialize cache record")?;
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write cache record: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to move cache record into place: {}", path.display()))?;
        Ok(())
    }

    /// Remove the whole store. Returns the number of records deleted.
    pub fn clear(&self) -> Result<u64> {
        if !self.store_dir.exists() {
            return Ok(0);
        }
        let mut count = 0u64;
        for entry in fs::read_dir(&self.store_dir).context("Failed to read cache directory")? {
            let entry = entry.context("Failed to read cache directory entry")?;
            if entry.path().extension().and_then(|s| s.to_str()) == Some("json") {
                count += 1;
            }
        }
        fs::remove_dir_all(&self.store_dir).with_context(|| {
            format!(
                "Failed to remove cache directory: {}",
                self.store_dir.display()
            )
        })?;
        Ok(count)
    }
}
