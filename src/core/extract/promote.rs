//! Inherited-method promotion.
//!
//! When an exported class derives from a base that is NOT itself exported,
//! script code would lose access to the base's public methods: the runtime's
//! native inheritance linkage only covers bases that have their own bindings.
//! Promotion re-homes such methods onto the derived class (owner rewritten,
//! call identity rebuilt) and recurses through chains of unexported bases.
//! Recursion stops at the first exported ancestor, whose own bindings take
//! over from there.
//!
//! Base lookup is confined to the unit under extraction; a base declared in a
//! different unit is skipped with a debug note.

use std::collections::HashSet;

use crate::core::item::{ExportItem, ItemKind, ItemSignature};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::frontend::{Access, Decl, DeclKind};

use super::{ClassCtx, Extractor};

impl<'a> Extractor<'a> {
    pub(crate) fn promote_base_methods(&mut self, class: &ClassCtx, bases: &[String]) {
        let mut visited: HashSet<String> = HashSet::new();
        self.promote_from(class, bases, &mut visited);
    }

    fn promote_from(&mut self, class: &ClassCtx, bases: &[String], visited: &mut HashSet<String>) {
        for base_name in bases {
            if !visited.insert(base_name.clone()) {
                // Cyclic or repeated base; already handled.
                continue;
            }
            if self.is_exported_class(base_name) {
                // Exported ancestor: its own bindings plus native inheritance
                // linkage cover everything from here up.
                continue;
            }
            let Some(base_decl) = self.class_decl(base_name) else {
                self.diagnostics.push(Diagnostic::debug(
                    DiagnosticKind::Note,
                    format!(
                        "base '{}' of '{}' not found in this unit; no methods promoted from it",
                        base_name, class.name
                    ),
                ));
                continue;
            };

            for member in &base_decl.members {
                if !is_promotable(member) {
                    continue;
                }
                let signature = ItemSignature {
                    kind_tag: ItemKind::Method.tag(),
                    name: member.name.clone(),
                    qualified_path: class.member_path(&member.name),
                    owner: class.name.clone(),
                };
                if self.has_signature(&signature) {
                    // The derived class already declares (or promoted) this
                    // method; closest declaration wins.
                    continue;
                }
                let mut item = ExportItem::new(ItemKind::Method, member.name.clone());
                item.qualified_path = class.member_path(&member.name);
                item.owner = class.name.clone();
                item.namespace_path = class.namespace_path.clone();
                item.parameter_types = member.params.iter().map(|p| p.ty.clone()).collect();
                item.return_type = member.return_type.clone().unwrap_or_default();
                item.is_const = member.is_const;
                item.is_virtual = member.is_virtual;
                item.location = member.location.clone();
                self.push_item(item);
            }

            let base_bases = base_decl.bases.clone();
            self.promote_from(class, &base_bases, visited);
        }
    }
}

/// Public, non-static, non-operator instance methods promote; constructors,
/// destructors, fields, and everything non-public stay behind.
fn is_promotable(member: &Decl) -> bool {
    member.kind == DeclKind::Method
        && member.access == Access::Public
        && !member.is_static
        && !member.is_deleted
        && !member.name.starts_with("operator")
        && !super::is_ignored(member)
}
