//! Unit file loading.
//!
//! Reading and deserializing are split from extraction so the cache can
//! fingerprint raw bytes without paying for a parse on clean units.

use anyhow::{Context, Result};
use std::path::Path;

use super::decl::Unit;

/// Deserialize a declaration unit from raw bytes.
///
/// The caller has already read the bytes (the cache fingerprints them first).
/// A deserialization failure is a front-end failure for that unit alone; the
/// caller downgrades it to a diagnostic and continues with other units.
pub fn load_unit(path: &Path, bytes: &[u8]) -> Result<Unit> {
    let mut unit: Unit = serde_json::from_slice(bytes)
        .with_context(|| format!("Failed to parse declaration unit: {}", path.display()))?;
    if unit.path.is_empty() {
        unit.path = path.to_string_lossy().to_string();
    }
    Ok(unit)
}
