//! Metadata extraction: declaration tree → export items.
//!
//! Extraction walks one unit's declaration tree, finds declarations carrying
//! export annotations, and produces [`ExportItem`]s plus diagnostics. Each
//! unit is self-contained: class member auto-extraction, inherited-method
//! promotion, and property pairing all operate within the unit's own tree, so
//! units can be extracted in parallel with no shared state.
//!
//! ## Sub-modules
//!
//! - `members`: class item + member auto-extraction
//! - `promote`: inherited-method promotion across unexported bases
//! - `properties`: getter/setter pairing into property items
//! - `enums`: enumerator value folding
//! - `containers`: container marker extraction and type qualification

pub mod containers;
pub mod enums;
pub mod members;
pub mod promote;
pub mod properties;


use std::collections::{HashMap, HashSet};

use crate::core::annotation::{self, AnnotationCategory, ParsedAnnotation};
use crate::core::item::{ClassVariant, ExportItem, ItemKind, ItemSignature};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::frontend::{Decl, DeclKind, Unit};

/// Run-level extraction options.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Run-level default namespace (`--module`), lowest resolution precedence.
    pub module_namespace: Option<String>,
}

/// Output of extracting one unit.
#[derive(Debug, Default)]
pub struct UnitExtraction {
    pub items: Vec<ExportItem>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extract all export items from one unit.
pub fn extract_unit(unit: &Unit, options: &ExtractOptions) -> UnitExtraction {
    let mut extractor = Extractor::new(unit, options);
    for decl in &unit.decls {
        extractor.extract_decl(decl);
    }
    UnitExtraction {
        items: extractor.items,
        diagnostics: extractor.diagnostics,
    }
}

/// Owning-class context passed to member extraction steps.
#[derive(Debug, Clone)]
pub(crate) struct ClassCtx {
    /// Plain class name; becomes member items' `owner`.
    pub name: String,
    /// Host-qualified class path (e.g. `game::Widget`).
    pub qualified: String,
    /// Resolved dotted namespace path of the class.
    pub namespace_path: String,
}

impl ClassCtx {
    /// Host-qualified call identity of a member.
    pub fn member_path(&self, member: &str) -> String {
        format!("{}::{}", self.qualified, member)
    }
}

/// Per-unit extraction state.
pub(crate) struct Extractor<'a> {
    unit: &'a Unit,
    options: &'a ExtractOptions,
    /// Top-level class declarations by name, for promotion lookups.
    class_index: HashMap<&'a str, &'a Decl>,
    /// Names of classes in this unit that carry an export annotation.
    exported_classes: HashSet<&'a str>,
    pub(crate) items: Vec<ExportItem>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Dedup guard over `(kind, name, qualified_path, owner)`.
    signatures: HashSet<ItemSignature>,
}

impl<'a> Extractor<'a> {
    fn new(unit: &'a Unit, options: &'a ExtractOptions) -> Self {
        let mut class_index = HashMap::new();
        let mut exported_classes = HashSet::new();
        for decl in &unit.decls {
            if decl.kind == DeclKind::Class {
                class_index.entry(decl.name.as_str()).or_insert(decl);
                if export_annotation(decl).is_some() {
                    exported_classes.insert(decl.name.as_str());
                }
            }
        }
        Self {
            unit,
            options,
            class_index,
            exported_classes,
            items: Vec::new(),
            diagnostics: Vec::new(),
            signatures: HashSet::new(),
        }
    }

    pub(crate) fn class_decl(&self, name: &str) -> Option<&'a Decl> {
        self.class_index.get(name).copied()
    }

    pub(crate) fn is_exported_class(&self, name: &str) -> bool {
        self.exported_classes.contains(name)
    }

    /// Push an item unless its dedup signature is already taken.
    pub(crate) fn push_item(&mut self, item: ExportItem) -> bool {
        if self.signatures.insert(item.signature()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub(crate) fn has_signature(&self, signature: &ItemSignature) -> bool {
        self.signatures.contains(signature)
    }

    /// Extract one top-level declaration.
    fn extract_decl(&mut self, decl: &'a Decl) {
        // System/framework declarations never export, annotated or not.
        if decl.is_system {
            return;
        }

        let Some(ann) = export_annotation(decl) else {
            // Unannotated declarations are simply not exported.
            self.note_malformed_annotations(decl);
            return;
        };

        let Some(category) = ann.known_category() else {
            return;
        };

        match category {
            AnnotationCategory::Ignore => {}
            AnnotationCategory::Module => self.extract_module(decl, &ann),
            AnnotationCategory::Namespace => self.extract_namespace(decl, &ann),
            AnnotationCategory::Class => self.extract_class(decl, &ann, ClassVariant::Regular),
            AnnotationCategory::StaticClass => self.extract_class(decl, &ann, ClassVariant::Static),
            AnnotationCategory::Singleton => {
                self.extract_class(decl, &ann, ClassVariant::Singleton)
            }
            AnnotationCategory::AbstractClass => {
                self.extract_class(decl, &ann, ClassVariant::Abstract)
            }
            AnnotationCategory::Function => self.extract_function(decl, &ann),
            AnnotationCategory::Constant => self.extract_value(decl, &ann, ItemKind::Constant),
            AnnotationCategory::Variable => self.extract_value(decl, &ann, ItemKind::Variable),
            AnnotationCategory::Enum => self.extract_enum(decl, &ann),
            AnnotationCategory::Vector
            | AnnotationCategory::Map
            | AnnotationCategory::UnorderedMap
            | AnnotationCategory::Set
            | AnnotationCategory::List => self.extract_container(decl, &ann, category),
            AnnotationCategory::TemplateInstance => self.extract_template_instance(decl, &ann),
            AnnotationCategory::Template => {
                // Templates register nothing themselves; instances do.
                self.diagnostics.push(
                    Diagnostic::debug(
                        DiagnosticKind::Note,
                        format!("template '{}' registers nothing; annotate instances", decl.name),
                    )
                    .with_location(decl.location.clone()),
                );
            }
            AnnotationCategory::Callback => {
                self.diagnostics.push(
                    Diagnostic::debug(
                        DiagnosticKind::Note,
                        format!("callback '{}' is wired at runtime, not registered", decl.name),
                    )
                    .with_location(decl.location.clone()),
                );
            }
            AnnotationCategory::Method
            | AnnotationCategory::StaticMethod
            | AnnotationCategory::Property
            | AnnotationCategory::Operator => {
                self.diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::InvalidItem,
                        format!(
                            "'{}' annotation on '{}' outside a class is ignored",
                            ann.category, decl.name
                        ),
                    )
                    .with_location(decl.location.clone()),
                );
            }
        }
    }

    /// Resolve a declaration's namespace path.
    ///
    /// Precedence: explicit `namespace=` attribute > nearest enclosing
    /// non-anonymous lexical scope > unit-level default > run-level default.
    /// Scope segments equal to the item's own name or its owner's name are
    /// skipped: a qualified self-reference is not an enclosing namespace.
    pub(crate) fn resolve_namespace(
        &self,
        decl: &Decl,
        ann: &ParsedAnnotation,
        owner: Option<&str>,
    ) -> String {
        if let Some(ns) = ann.attr("namespace") {
            return ns.to_string();
        }

        let segments: Vec<&str> = decl
            .scope
            .iter()
            .filter(|s| !s.anonymous && !s.name.is_empty())
            .map(|s| s.name.as_str())
            .filter(|n| *n != decl.name && Some(*n) != owner)
            .collect();
        if !segments.is_empty() {
            return segments.join(".");
        }

        if let Some(ns) = &self.unit.default_namespace {
            return ns.clone();
        }

        self.options.module_namespace.clone().unwrap_or_default()
    }

    /// Enclosing namespace in host spelling (`game::ui`), for type qualification.
    pub(crate) fn host_scope(&self, decl: &Decl) -> String {
        decl.scope
            .iter()
            .filter(|s| !s.anonymous && !s.name.is_empty())
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("::")
    }

    /// Host-qualified path of a top-level declaration.
    pub(crate) fn host_qualified(&self, decl: &Decl) -> String {
        let scope = self.host_scope(decl);
        if scope.is_empty() {
            decl.name.clone()
        } else {
            format!("{}::{}", scope, decl.name)
        }
    }

    fn extract_module(&mut self, decl: &'a Decl, ann: &ParsedAnnotation) {
        let name = ann.attr("name").unwrap_or(&decl.name).to_string();
        let mut item = ExportItem::new(ItemKind::Module, name.clone());
        item.namespace_path = name;
        item.raw_attributes = ann.attributes.clone();
        item.location = decl.location.clone();
        self.push_item(item);
    }

    fn extract_namespace(&mut self, decl: &'a Decl, ann: &ParsedAnnotation) {
        let enclosing = self.resolve_namespace(decl, ann, None);
        let mut item = ExportItem::new(ItemKind::Namespace, decl.name.clone());
        item.namespace_path = if enclosing.is_empty() {
            decl.name.clone()
        } else {
            format!("{}.{}", enclosing, decl.name)
        };
        item.raw_attributes = ann.attributes.clone();
        item.location = decl.location.clone();
        self.push_item(item);
    }

    fn extract_function(&mut self, decl: &'a Decl, ann: &ParsedAnnotation) {
        let mut item = ExportItem::new(ItemKind::Function, decl.name.clone());
        item.target_name = ann.attr("name").map(str::to_string);
        item.qualified_path = self.host_qualified(decl);
        item.namespace_path = self.resolve_namespace(decl, ann, None);
        item.parameter_types = decl.params.iter().map(|p| p.ty.clone()).collect();
        item.return_type = decl.return_type.clone().unwrap_or_default();
        item.raw_attributes = ann.attributes.clone();
        item.location = decl.location.clone();
        self.push_item(item);
    }

    fn extract_value(&mut self, decl: &'a Decl, ann: &ParsedAnnotation, kind: ItemKind) {
        let mut item = ExportItem::new(kind, decl.name.clone());
        item.target_name = ann.attr("name").map(str::to_string);
        item.qualified_path = self.host_qualified(decl);
        item.namespace_path = self.resolve_namespace(decl, ann, None);
        item.return_type = decl.field_type.clone().unwrap_or_default();
        item.is_const = decl.is_const || matches!(kind, ItemKind::Constant);
        item.raw_attributes = ann.attributes.clone();
        item.location = decl.location.clone();
        self.push_item(item);
    }

    fn extract_template_instance(&mut self, decl: &'a Decl, ann: &ParsedAnnotation) {
        let name = ann.attr("name").unwrap_or(&decl.name).to_string();
        let mut item = ExportItem::new(ItemKind::TemplateInstance, name);
        item.qualified_path = self.host_qualified(decl);
        item.namespace_path = self.resolve_namespace(decl, ann, None);
        if let Some(params) = &ann.type_params {
            item.parameter_types = containers::split_type_params(params);
        }
        item.raw_attributes = ann.attributes.clone();
        item.location = decl.location.clone();
        self.push_item(item);
    }

    /// Note payloads that look like annotations but parse to nothing usable.
    fn note_malformed_annotations(&mut self, decl: &Decl) {
        for raw in &decl.annotations {
            let parsed = annotation::parse(raw);
            if parsed.known_category().is_none() && !raw.trim().is_empty() {
                self.diagnostics.push(
                    Diagnostic::info(
                        DiagnosticKind::MalformedAnnotation,
                        format!("unrecognized annotation '{}' on '{}'", raw, decl.name),
                    )
                    .with_location(decl.location.clone()),
                );
            }
        }
    }
}

/// True if an `ignore` annotation is present anywhere on the declaration.
pub(crate) fn is_ignored(decl: &Decl) -> bool {
    decl.annotations.iter().any(|raw| {
        matches!(
            annotation::parse(raw).known_category(),
            Some(AnnotationCategory::Ignore)
        )
    })
}

/// Find the first recognized export annotation on a declaration.
///
/// Returns `None` for unannotated declarations, or when an `ignore`
/// annotation is present anywhere on the declaration.
pub(crate) fn export_annotation(decl: &Decl) -> Option<ParsedAnnotation> {
    let mut found: Option<ParsedAnnotation> = None;
    for raw in &decl.annotations {
        let parsed = annotation::parse(raw);
        match parsed.known_category() {
            Some(AnnotationCategory::Ignore) => return None,
            Some(_) if found.is_none() => found = Some(parsed),
            _ => {}
        }
    }
    found
}
