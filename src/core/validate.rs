//! Item validation.
//!
//! Validation drops unusable items with a warning diagnostic; it never aborts
//! the run. Checks are intentionally few: extraction already guarantees most
//! structure, so this is the last gate against items the plan builder cannot
//! register.

use crate::core::item::{ExportItem, ItemKind};
use crate::diagnostics::{Diagnostic, DiagnosticKind};

/// Validate one item. Returns `true` if the item survives; on failure a
/// warning is pushed to `diagnostics` and the caller drops the item.
pub fn validate(item: &ExportItem, diagnostics: &mut Vec<Diagnostic>) -> bool {
    if item.name.is_empty() {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticKind::InvalidItem,
                format!("dropping unnamed {} item", item.kind.tag()),
            )
            .with_location(item.location.clone()),
        );
        return false;
    }

    let needs_return_type = matches!(
        item.kind,
        ItemKind::Method | ItemKind::Function | ItemKind::StaticMethod
    );
    if needs_return_type && item.return_type.is_empty() {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticKind::InvalidItem,
                format!(
                    "dropping {} '{}': unresolved return type",
                    item.kind.tag(),
                    item.name
                ),
            )
            .with_location(item.location.clone()),
        );
        return false;
    }

    true
}

/// Validate a batch, keeping survivors.
pub fn validate_all(items: Vec<ExportItem>, diagnostics: &mut Vec<Diagnostic>) -> Vec<ExportItem> {
    items
        .into_iter()
        .filter(|item| validate(item, diagnostics))
        .collect()
}
