//! Enum extraction.

use crate::core::annotation::ParsedAnnotation;
use crate::core::item::{ExportItem, ItemKind};
use crate::frontend::{Decl, Enumerator};

use super::Extractor;

impl<'a> Extractor<'a> {
    pub(crate) fn extract_enum(&mut self, decl: &'a Decl, ann: &ParsedAnnotation) {
        let mut item = ExportItem::new(ItemKind::Enum, decl.name.clone());
        item.target_name = ann.attr("name").map(str::to_string);
        item.qualified_path = self.host_qualified(decl);
        item.namespace_path = self.resolve_namespace(decl, ann, None);
        item.enum_values = fold_enum_values(&decl.enumerators);
        item.raw_attributes = ann.attributes.clone();
        item.location = decl.location.clone();
        self.push_item(item);
    }
}

/// Resolve enumerator values: explicit values are kept as-is, unset values
/// continue from the previous enumerator (previous + 1, or 0 for the first).
pub(crate) fn fold_enum_values(enumerators: &[Enumerator]) -> Vec<(String, i64)> {
    let mut values = Vec::with_capacity(enumerators.len());
    let mut next = 0i64;
    for enumerator in enumerators {
        let value = enumerator.value.unwrap_or(next);
        next = value + 1;
        values.push((enumerator.label.clone(), value));
    }
    values
}
