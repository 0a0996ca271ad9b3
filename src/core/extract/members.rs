//! Class extraction: the class item, explicit member annotations, and member
//! auto-extraction.
//!
//! Once a class carries an export annotation, its public surface is exported
//! wholesale: constructors (excluding copy/move), methods, static methods, and
//! public fields are synthesized as member items even without their own
//! annotations. Explicitly annotated members are handled first so the dedup
//! guard keeps auto-extraction from shadowing them.

use crate::core::annotation::{AnnotationCategory, ParsedAnnotation};
use crate::core::item::{ClassVariant, ExportItem, ItemKind, PropertyAccess};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::frontend::{Access, Decl, DeclKind};

use super::properties::{self, PropertyAccessor};
use super::{ClassCtx, Extractor, export_annotation};

impl<'a> Extractor<'a> {
    pub(crate) fn extract_class(
        &mut self,
        decl: &'a Decl,
        ann: &ParsedAnnotation,
        variant: ClassVariant,
    ) {
        let class = ClassCtx {
            name: decl.name.clone(),
            qualified: self.host_qualified(decl),
            namespace_path: self.resolve_namespace(decl, ann, None),
        };

        let mut item = ExportItem::new(ItemKind::Class { variant }, class.name.clone());
        item.target_name = ann.attr("name").map(str::to_string);
        item.qualified_path = class.qualified.clone();
        item.namespace_path = class.namespace_path.clone();
        item.base_types = decl.bases.clone();
        item.raw_attributes = ann.attributes.clone();
        item.location = decl.location.clone();
        if !self.push_item(item) {
            // Same class already registered in this unit; nothing more to do.
            return;
        }

        let mut accessors: Vec<PropertyAccessor> = Vec::new();

        // Explicitly annotated members first: their annotations carry intent
        // (aliases, property pairing) that auto-extraction must not preempt.
        for member in &decl.members {
            if member.access != Access::Public || member.is_deleted {
                continue;
            }
            if let Some(member_ann) = export_annotation(member) {
                self.extract_annotated_member(member, &member_ann, &class, &mut accessors);
            }
        }

        // Auto-extraction of the remaining public surface.
        for member in &decl.members {
            if member.access != Access::Public
                || member.is_deleted
                || super::is_ignored(member)
                || export_annotation(member).is_some()
            {
                continue;
            }
            self.auto_extract_member(member, &class, variant);
        }

        self.promote_base_methods(&class, &decl.bases);

        properties::pair_properties(self, &class, accessors);
    }

    fn extract_annotated_member(
        &mut self,
        member: &'a Decl,
        ann: &ParsedAnnotation,
        class: &ClassCtx,
        accessors: &mut Vec<PropertyAccessor>,
    ) {
        match ann.known_category() {
            Some(AnnotationCategory::Property) => {
                accessors.push(PropertyAccessor::from_decl(member, ann));
            }
            Some(AnnotationCategory::Method) => {
                self.push_method(member, class, ann, ItemKind::Method);
            }
            Some(AnnotationCategory::StaticMethod) => {
                self.push_method(member, class, ann, ItemKind::StaticMethod);
            }
            Some(AnnotationCategory::Operator) => {
                self.push_operator(member, class, Some(ann));
            }
            Some(AnnotationCategory::Constant) | Some(AnnotationCategory::Variable) => {
                let kind = if matches!(ann.known_category(), Some(AnnotationCategory::Constant)) {
                    ItemKind::Constant
                } else {
                    ItemKind::Variable
                };
                let mut item = ExportItem::new(kind, member.name.clone());
                item.target_name = ann.attr("name").map(str::to_string);
                item.qualified_path = class.member_path(&member.name);
                item.namespace_path = class.namespace_path.clone();
                item.return_type = member.field_type.clone().unwrap_or_default();
                item.is_const = member.is_const;
                item.raw_attributes = ann.attributes.clone();
                item.location = member.location.clone();
                self.push_item(item);
            }
            Some(AnnotationCategory::Enum) => {
                let mut item = ExportItem::new(ItemKind::Enum, member.name.clone());
                item.target_name = ann.attr("name").map(str::to_string);
                item.qualified_path = class.member_path(&member.name);
                item.namespace_path = class.namespace_path.clone();
                item.enum_values = super::enums::fold_enum_values(&member.enumerators);
                item.raw_attributes = ann.attributes.clone();
                item.location = member.location.clone();
                self.push_item(item);
            }
            _ => {
                self.diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticKind::InvalidItem,
                        format!(
                            "'{}' annotation on member '{}::{}' is not a member category",
                            ann.category, class.name, member.name
                        ),
                    )
                    .with_location(member.location.clone()),
                );
            }
        }
    }

    fn auto_extract_member(&mut self, member: &'a Decl, class: &ClassCtx, variant: ClassVariant) {
        match member.kind {
            DeclKind::Constructor => {
                // Static and singleton classes are never constructed by script.
                if matches!(variant, ClassVariant::Static | ClassVariant::Singleton) {
                    return;
                }
                if member.is_copy_or_move_ctor(&class.name) {
                    return;
                }
                let mut item = ExportItem::new(ItemKind::Constructor, class.name.clone());
                item.owner = class.name.clone();
                item.namespace_path = class.namespace_path.clone();
                item.parameter_types = member.params.iter().map(|p| p.ty.clone()).collect();
                // Overloads share every other signature component, so the
                // call identity carries the parameter tuple.
                item.qualified_path =
                    format!("{}({})", class.qualified, item.parameter_types.join(","));
                item.location = member.location.clone();
                self.push_item(item);
            }
            DeclKind::Method => {
                if member.name.starts_with("operator") {
                    self.push_operator(member, class, None);
                    return;
                }
                let kind = if member.is_static {
                    ItemKind::StaticMethod
                } else {
                    ItemKind::Method
                };
                self.push_method_raw(member, class, kind, None);
            }
            DeclKind::Field => {
                // Public fields surface as read-write properties.
                let mut item = ExportItem::new(ItemKind::Property, member.name.clone());
                item.qualified_path = class.member_path(&member.name);
                item.owner = class.name.clone();
                item.namespace_path = class.namespace_path.clone();
                item.return_type = member.field_type.clone().unwrap_or_default();
                item.access = if member.is_const {
                    PropertyAccess::ReadOnly
                } else {
                    PropertyAccess::ReadWrite
                };
                item.is_static = member.is_static;
                item.location = member.location.clone();
                self.push_item(item);
            }
            // Destructors, nested classes, aliases: never auto-extracted.
            _ => {}
        }
    }

    fn push_method(
        &mut self,
        member: &'a Decl,
        class: &ClassCtx,
        ann: &ParsedAnnotation,
        kind: ItemKind,
    ) {
        self.push_method_raw(member, class, kind, Some(ann));
    }

    fn push_method_raw(
        &mut self,
        member: &'a Decl,
        class: &ClassCtx,
        kind: ItemKind,
        ann: Option<&ParsedAnnotation>,
    ) {
        let mut item = ExportItem::new(kind, member.name.clone());
        item.target_name = ann.and_then(|a| a.attr("name")).map(str::to_string);
        item.qualified_path = class.member_path(&member.name);
        item.owner = class.name.clone();
        item.namespace_path = class.namespace_path.clone();
        item.parameter_types = member.params.iter().map(|p| p.ty.clone()).collect();
        item.return_type = member.return_type.clone().unwrap_or_default();
        item.is_static = member.is_static;
        item.is_const = member.is_const;
        item.is_virtual = member.is_virtual;
        if let Some(ann) = ann {
            item.raw_attributes = ann.attributes.clone();
        }
        item.location = member.location.clone();
        self.push_item(item);
    }

    fn push_operator(&mut self, member: &'a Decl, class: &ClassCtx, ann: Option<&ParsedAnnotation>) {
        let symbol = member
            .name
            .strip_prefix("operator")
            .unwrap_or(&member.name)
            .trim()
            .to_string();
        let mut item = ExportItem::new(ItemKind::Operator, symbol);
        item.qualified_path = class.member_path(&member.name);
        item.owner = class.name.clone();
        item.namespace_path = class.namespace_path.clone();
        item.parameter_types = member.params.iter().map(|p| p.ty.clone()).collect();
        item.return_type = member.return_type.clone().unwrap_or_default();
        item.is_const = member.is_const;
        if let Some(ann) = ann {
            item.raw_attributes = ann.attributes.clone();
        }
        item.location = member.location.clone();
        self.push_item(item);
    }
}
