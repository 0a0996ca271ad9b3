//! Plan serialization to sol2 registration source.
//!
//! The emitter is a dumb serializer: one plan statement becomes one C++
//! statement (or one `new_usertype` call for inline types), in plan order,
//! with no reordering or merging of its own. Identical plans produce
//! byte-identical output.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::HandleId;
use crate::core::item::ContainerShape;
use crate::plan::{BindingPlan, MemberRef, PlanStatement};

/// Default output file name when neither CLI nor config name one.
pub const DEFAULT_OUTPUT_FILE: &str = "rivet_bindings.cpp";

/// Render a plan as a complete registration translation unit.
pub fn render(plan: &BindingPlan, module_name: &str) -> String {
    let mut out = String::new();
    let module = sanitize_identifier(module_name);

    let _ = writeln!(out, "// Generated by rivet. Do not edit.");
    let _ = writeln!(out, "#include <sol/sol.hpp>");
    let _ = writeln!(out);
    let _ = writeln!(out, "void register_{module}_bindings(sol::state_view lua) {{");

    let mut ctx = RenderContext::default();
    let mut first = true;
    for segment in &plan.segments {
        if !first {
            let _ = writeln!(out);
        }
        first = false;
        for statement in &segment.statements {
            ctx.render_statement(&mut out, statement);
        }
    }

    let _ = writeln!(out, "}}");
    out
}

/// Write rendered output via temp-then-rename, so a crash mid-write never
/// leaves a truncated file at the target path.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    let tmp = path.with_extension("cpp.tmp");
    fs::write(&tmp, content)
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move output into place at {}", path.display()))?;
    Ok(())
}

/// Reduce an arbitrary module name to a C identifier.
fn sanitize_identifier(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() || cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("m{cleaned}")
    } else {
        cleaned
    }
}

#[derive(Default)]
struct RenderContext {
    /// Namespace handle id → emitted table variable name.
    ns_vars: std::collections::HashMap<HandleId, String>,
}

impl RenderContext {
    fn ns_expr(&self, ns: Option<HandleId>) -> &str {
        ns.and_then(|id| self.ns_vars.get(&id))
            .map(String::as_str)
            .unwrap_or("lua")
    }

    fn render_statement(&mut self, out: &mut String, statement: &PlanStatement) {
        match statement {
            PlanStatement::CreateNamespaceHandle {
                handle,
                segment,
                path,
                parent,
            } => {
                let var = format!("ns_{}", sanitize_identifier(path));
                let parent_expr = self.ns_expr(*parent);
                let _ = writeln!(
                    out,
                    "    sol::table {var} = {parent_expr}[\"{segment}\"].get_or_create<sol::table>();"
                );
                self.ns_vars.insert(*handle, var);
            }
            PlanStatement::RegisterType {
                ns,
                owner,
                display_name,
                host_type,
                constructor_signatures,
                inline_members,
                inline_operators,
            } => {
                let ns_expr = self.ns_expr(*ns);
                let ctors = render_constructors(host_type, constructor_signatures);
                match inline_members {
                    Some(members) => {
                        let _ = write!(
                            out,
                            "    {ns_expr}.new_usertype<{host_type}>(\"{display_name}\",\n        {ctors}"
                        );
                        for (name, reference) in members {
                            let _ = write!(
                                out,
                                ",\n        \"{name}\", {}",
                                render_member_ref(reference)
                            );
                        }
                        for (metamethod, reference) in inline_operators {
                            let _ = write!(
                                out,
                                ",\n        sol::meta_function::{}, &{reference}",
                                metamethod.id()
                            );
                        }
                        let _ = writeln!(out, ");");
                    }
                    None => {
                        let var = usertype_var(owner);
                        let _ = writeln!(
                            out,
                            "    auto {var} = {ns_expr}.new_usertype<{host_type}>(\"{display_name}\",\n        {ctors});"
                        );
                    }
                }
            }
            PlanStatement::AssignMember {
                owner,
                name,
                reference,
            } => {
                let var = usertype_var(owner);
                let _ = writeln!(
                    out,
                    "    {var}[\"{name}\"] = {};",
                    render_member_ref(reference)
                );
            }
            PlanStatement::AssignOperator {
                owner,
                metamethod,
                reference,
            } => {
                let var = usertype_var(owner);
                let _ = writeln!(
                    out,
                    "    {var}[sol::meta_function::{}] = &{reference};",
                    metamethod.id()
                );
            }
            PlanStatement::RegisterFunction { ns, name, reference } => {
                let ns_expr = self.ns_expr(*ns);
                let _ = writeln!(out, "    {ns_expr}.set_function(\"{name}\", &{reference});");
            }
            PlanStatement::RegisterConstant { ns, name, reference } => {
                let ns_expr = self.ns_expr(*ns);
                let _ = writeln!(out, "    {ns_expr}[\"{name}\"] = {reference};");
            }
            PlanStatement::RegisterEnum { ns, name, values } => {
                let ns_expr = self.ns_expr(*ns);
                let _ = write!(out, "    {ns_expr}.new_enum(\"{name}\"");
                for (label, value) in values {
                    let _ = write!(out, ",\n        \"{label}\", {value}");
                }
                let _ = writeln!(out, ");");
            }
            PlanStatement::RegisterContainer {
                ns,
                display_name,
                shape,
                type_params,
            } => {
                let ns_expr = self.ns_expr(*ns);
                let host = container_host_type(*shape, type_params);
                let _ = writeln!(
                    out,
                    "    {ns_expr}.new_usertype<{host}>(\"{display_name}\");"
                );
            }
        }
    }
}

fn usertype_var(owner: &str) -> String {
    format!("ut_{}", sanitize_identifier(owner))
}

fn container_host_type(shape: ContainerShape, type_params: &[String]) -> String {
    format!("{}<{}>", shape.host_template(), type_params.join(", "))
}

fn render_constructors(host_type: &str, signatures: &[Vec<String>]) -> String {
    let tuples: Vec<String> = signatures
        .iter()
        .map(|params| format!("{host_type}({})", params.join(", ")))
        .collect();
    format!("sol::constructors<{}>()", tuples.join(", "))
}

fn render_member_ref(reference: &MemberRef) -> String {
    match reference {
        MemberRef::Direct { path } => format!("&{path}"),
        MemberRef::Property { getter, setter } => match (getter, setter) {
            (Some(g), Some(s)) => format!("sol::property(&{g}, &{s})"),
            (Some(g), None) => format!("sol::readonly_property(&{g})"),
            (None, Some(s)) => format!("sol::writeonly_property(&{s})"),
            (None, None) => "sol::property()".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::{ClassVariant, ExportItem, ItemKind};
    use crate::plan::{PlanOptions, build};
    use pretty_assertions::assert_eq;

    fn class(name: &str, ns: &str) -> ExportItem {
        let mut item = ExportItem::new(
            ItemKind::Class {
                variant: ClassVariant::Regular,
            },
            name,
        );
        item.qualified_path = name.to_string();
        item.namespace_path = ns.to_string();
        item
    }

    fn method(owner: &str, name: &str) -> ExportItem {
        let mut item = ExportItem::new(ItemKind::Method, name);
        item.owner = owner.to_string();
        item.qualified_path = format!("{owner}::{name}");
        item.return_type = "void".to_string();
        item
    }

    fn render_items(items: Vec<ExportItem>, threshold: usize) -> String {
        let mut diags = Vec::new();
        let plan = build(
            &items,
            &PlanOptions {
                weight_threshold: threshold,
            },
            &mut diags,
        );
        render(&plan, "game")
    }

    #[test]
    fn sanitizes_module_names() {
        assert_eq!(sanitize_identifier("game-core"), "game_core");
        assert_eq!(sanitize_identifier("3d"), "m3d");
        assert_eq!(sanitize_identifier(""), "m");
    }

    #[test]
    fn inline_type_renders_one_call() {
        let output = render_items(
            vec![class("Widget", ""), method("Widget", "update")],
            20,
        );
        insta::assert_snapshot!(output, @r#"
        // Generated by rivet. Do not edit.
        #include <sol/sol.hpp>

        void register_game_bindings(sol::state_view lua) {
            lua.new_usertype<Widget>("Widget",
                sol::constructors<Widget()>(),
                "update", &Widget::update);
        }
        "#);
    }

    #[test]
    fn batched_type_renders_assignments() {
        let output = render_items(
            vec![
                class("Widget", ""),
                method("Widget", "update"),
                method("Widget", "draw"),
            ],
            2,
        );
        insta::assert_snapshot!(output, @r#"
        // Generated by rivet. Do not edit.
        #include <sol/sol.hpp>

        void register_game_bindings(sol::state_view lua) {
            auto ut_Widget = lua.new_usertype<Widget>("Widget",
                sol::constructors<Widget()>());
            ut_Widget["update"] = &Widget::update;
            ut_Widget["draw"] = &Widget::draw;
        }
        "#);
    }

    #[test]
    fn namespaces_chain_through_table_variables() {
        let mut f = ExportItem::new(ItemKind::Function, "spawn");
        f.qualified_path = "game::ui::spawn".to_string();
        f.namespace_path = "game.ui".to_string();

        let output = render_items(vec![f], 20);
        insta::assert_snapshot!(output, @r#"
        // Generated by rivet. Do not edit.
        #include <sol/sol.hpp>

        void register_game_bindings(sol::state_view lua) {
            sol::table ns_game = lua["game"].get_or_create<sol::table>();
            sol::table ns_game_ui = ns_game["ui"].get_or_create<sol::table>();

            ns_game_ui.set_function("spawn", &game::ui::spawn);
        }
        "#);
    }

    #[test]
    fn enums_and_constants_render_into_their_namespace() {
        let mut e = ExportItem::new(ItemKind::Enum, "Status");
        e.namespace_path = "game".to_string();
        e.enum_values = vec![("ACTIVE".to_string(), 0), ("INACTIVE".to_string(), 5)];
        let mut c = ExportItem::new(ItemKind::Constant, "MAX_PLAYERS");
        c.namespace_path = "game".to_string();
        c.qualified_path = "game::MAX_PLAYERS".to_string();

        let output = render_items(vec![e, c], 20);
        insta::assert_snapshot!(output, @r#"
        // Generated by rivet. Do not edit.
        #include <sol/sol.hpp>

        void register_game_bindings(sol::state_view lua) {
            sol::table ns_game = lua["game"].get_or_create<sol::table>();

            ns_game["MAX_PLAYERS"] = game::MAX_PLAYERS;

            ns_game.new_enum("Status",
                "ACTIVE", 0,
                "INACTIVE", 5);
        }
        "#);
    }

    #[test]
    fn property_references_render_by_access_mode() {
        assert_eq!(
            render_member_ref(&MemberRef::Property {
                getter: Some("W::getName".to_string()),
                setter: Some("W::setName".to_string()),
            }),
            "sol::property(&W::getName, &W::setName)"
        );
        assert_eq!(
            render_member_ref(&MemberRef::Property {
                getter: Some("W::getId".to_string()),
                setter: None,
            }),
            "sol::readonly_property(&W::getId)"
        );
        assert_eq!(
            render_member_ref(&MemberRef::Property {
                getter: None,
                setter: Some("W::setSecret".to_string()),
            }),
            "sol::writeonly_property(&W::setSecret)"
        );
    }

    #[test]
    fn container_registration_uses_the_host_template() {
        let mut item = ExportItem::new(
            ItemKind::Container {
                shape: ContainerShape::Map,
            },
            "StdStringPieceMap",
        );
        item.parameter_types = vec!["std::string".to_string(), "game::Piece".to_string()];

        let output = render_items(vec![item], 20);
        assert!(output.contains(
            "lua.new_usertype<std::map<std::string, game::Piece>>(\"StdStringPieceMap\");"
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let items = vec![
            class("Widget", "game"),
            method("Widget", "update"),
            class("Panel", "game"),
        ];
        let first = render_items(items.clone(), 20);
        let second = render_items(items, 20);
        assert_eq!(first, second);
    }

    #[test]
    fn write_output_replaces_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/bindings.cpp");
        write_output(&path, "first").unwrap();
        write_output(&path, "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert!(!path.with_extension("cpp.tmp").exists());
    }
}
