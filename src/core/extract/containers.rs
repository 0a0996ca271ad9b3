//! Container marker extraction.
//!
//! A container annotation (`vector:game::Piece`, `map:std::string,int:name=…`)
//! turns into a container item whose element/key/value types are taken from
//! the annotation's type-parameter section. Type components that lack a scope
//! separator and are not a known builtin spelling are qualified with the
//! declaration's nearest enclosing non-anonymous namespace, so `vector:Piece`
//! inside `namespace game` binds `game::Piece`.

use crate::core::annotation::{AnnotationCategory, ParsedAnnotation};
use crate::core::item::{ContainerShape, ExportItem, ItemKind};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::frontend::Decl;
use crate::utils::capitalize;

use super::Extractor;

/// Builtin/standard type spellings that are never namespace-qualified.
const BUILTIN_TYPES: &[&str] = &[
    "void", "bool", "char", "short", "int", "long", "float", "double", "signed", "unsigned",
    "size_t", "ptrdiff_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t",
    "uint32_t", "uint64_t", "string",
];

impl<'a> Extractor<'a> {
    pub(crate) fn extract_container(
        &mut self,
        decl: &'a Decl,
        ann: &ParsedAnnotation,
        category: AnnotationCategory,
    ) {
        let shape = match category {
            AnnotationCategory::Vector => ContainerShape::Vector,
            AnnotationCategory::Map => ContainerShape::Map,
            AnnotationCategory::UnorderedMap => ContainerShape::UnorderedMap,
            AnnotationCategory::Set => ContainerShape::Set,
            AnnotationCategory::List => ContainerShape::List,
            _ => return,
        };

        let Some(raw_params) = &ann.type_params else {
            self.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::InvalidItem,
                    format!(
                        "container annotation on '{}' has no type parameters",
                        decl.name
                    ),
                )
                .with_location(decl.location.clone()),
            );
            return;
        };

        let enclosing = self.host_scope(decl);
        let types: Vec<String> = split_type_params(raw_params)
            .into_iter()
            .map(|ty| qualify_type(&ty, &enclosing))
            .collect();
        if types.is_empty() {
            self.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::InvalidItem,
                    format!(
                        "container annotation on '{}' has empty type parameters",
                        decl.name
                    ),
                )
                .with_location(decl.location.clone()),
            );
            return;
        }

        let explicit = ann.attr("name").or(ann.attr("alias")).map(str::to_string);
        let name = explicit
            .clone()
            .unwrap_or_else(|| default_display_name(&types, shape));

        let mut item = ExportItem::new(ItemKind::Container { shape }, name);
        item.target_name = explicit;
        item.qualified_path = self.host_qualified(decl);
        item.namespace_path = self.resolve_namespace(decl, ann, None);
        item.parameter_types = types;
        item.raw_attributes = ann.attributes.clone();
        item.location = decl.location.clone();
        self.push_item(item);
    }
}

/// Split a type-parameter string on top-level commas, ignoring commas inside
/// template argument lists (`map:std::map<int,int>,bool` has two components).
pub(crate) fn split_type_params(raw: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in raw.chars() {
        match c {
            '<' => {
                depth += 1;
                current.push(c);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }
    parts
}

/// Qualify a type component with the enclosing namespace, unless it already
/// carries a scope separator or is a builtin/standard spelling.
fn qualify_type(ty: &str, enclosing: &str) -> String {
    if enclosing.is_empty() || ty.contains("::") || is_builtin_type(ty) {
        return ty.to_string();
    }
    format!("{enclosing}::{ty}")
}

fn is_builtin_type(ty: &str) -> bool {
    // Multi-word spellings like `unsigned int` reduce to their first word.
    let first = ty.split_whitespace().next().unwrap_or(ty);
    BUILTIN_TYPES.contains(&first)
}

/// Default display name: every `::` segment of every type parameter
/// capitalized and concatenated, followed by the shape suffix.
/// `map:std::string,game::Piece` → `StdStringGamePieceMap`.
fn default_display_name(types: &[String], shape: ContainerShape) -> String {
    let mut name = String::new();
    for ty in types {
        for segment in ty.split("::") {
            for word in segment.split_whitespace() {
                name.push_str(&capitalize(word));
            }
        }
    }
    name.push_str(shape.display_suffix());
    name
}
