//! Plan construction from the merged item set.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::item::{ExportItem, ItemKind, ItemSignature, PropertyAccess};
use crate::core::namespace::NamespaceTable;
use crate::diagnostics::{Diagnostic, DiagnosticKind};

use super::operators::{Metamethod, map_operator};
use super::{BindingPlan, MemberRef, PlanSegment, PlanStatement, SegmentKind};

/// Default registration-weight threshold above which a type is batched.
pub const DEFAULT_WEIGHT_THRESHOLD: usize = 20;

/// Plan-building options.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub weight_threshold: usize,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            weight_threshold: DEFAULT_WEIGHT_THRESHOLD,
        }
    }
}

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Normalize a type spelling: trimmed, inner whitespace collapsed.
fn normalize_type(ty: &str) -> String {
    WHITESPACE.replace_all(ty.trim(), " ").to_string()
}

/// All items of one owner, in first-seen order per bucket.
#[derive(Default)]
struct OwnerGroup<'a> {
    class: Option<&'a ExportItem>,
    constructors: Vec<&'a ExportItem>,
    methods: Vec<&'a ExportItem>,
    static_methods: Vec<&'a ExportItem>,
    properties: Vec<&'a ExportItem>,
    operators: Vec<&'a ExportItem>,
    first_seen: usize,
}

impl<'a> OwnerGroup<'a> {
    fn namespace_path(&self) -> &str {
        self.class.map(|c| c.namespace_path.as_str()).unwrap_or("")
    }
}

/// Build the whole-run binding plan from the merged, validated item set.
///
/// A failure while assembling one owner group is scoped to that group: it is
/// skipped with an error diagnostic and the run continues.
pub fn build(
    items: &[ExportItem],
    options: &PlanOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> BindingPlan {
    // Merged multi-unit input can reintroduce signature collisions.
    let mut seen: std::collections::HashSet<ItemSignature> = std::collections::HashSet::new();
    let deduped: Vec<&ExportItem> = items
        .iter()
        .filter(|item| seen.insert(item.signature()))
        .collect();

    // Partition by kind.
    let mut namespace_items: Vec<&ExportItem> = Vec::new();
    let mut groups: HashMap<String, OwnerGroup<'_>> = HashMap::new();
    let mut group_order = 0usize;
    let mut functions: Vec<&ExportItem> = Vec::new();
    let mut constants: Vec<&ExportItem> = Vec::new();
    let mut enums: Vec<&ExportItem> = Vec::new();
    let mut containers: Vec<&ExportItem> = Vec::new();

    for item in &deduped {
        match item.kind {
            ItemKind::Module | ItemKind::Namespace => namespace_items.push(item),
            ItemKind::Class { .. } | ItemKind::TemplateInstance => {
                let group = groups.entry(item.name.clone()).or_insert_with(|| {
                    group_order += 1;
                    OwnerGroup {
                        first_seen: group_order,
                        ..OwnerGroup::default()
                    }
                });
                // First class item for an owner wins; later ones were deduped
                // already unless they differ in qualified path.
                if group.class.is_none() {
                    group.class = Some(item);
                }
            }
            ItemKind::Constructor
            | ItemKind::Method
            | ItemKind::StaticMethod
            | ItemKind::Property
            | ItemKind::Operator => {
                let group = groups.entry(item.owner.clone()).or_insert_with(|| {
                    group_order += 1;
                    OwnerGroup {
                        first_seen: group_order,
                        ..OwnerGroup::default()
                    }
                });
                match item.kind {
                    ItemKind::Constructor => group.constructors.push(item),
                    ItemKind::Method => group.methods.push(item),
                    ItemKind::StaticMethod => group.static_methods.push(item),
                    ItemKind::Property => group.properties.push(item),
                    ItemKind::Operator => group.operators.push(item),
                    _ => unreachable!(),
                }
            }
            ItemKind::Function => functions.push(item),
            ItemKind::Constant | ItemKind::Variable => constants.push(item),
            ItemKind::Enum => enums.push(item),
            ItemKind::Container { .. } => containers.push(item),
        }
    }

    let mut sorted_groups: Vec<(String, OwnerGroup<'_>)> = groups.into_iter().collect();
    sorted_groups.sort_by(|(_, a), (_, b)| {
        (a.namespace_path(), a.first_seen).cmp(&(b.namespace_path(), b.first_seen))
    });
    sort_flat(&mut functions);
    sort_flat(&mut constants);
    sort_flat(&mut enums);
    sort_flat(&mut containers);

    // Hoisted handle creation: resolve every namespace path in emission order
    // before any statement references a handle.
    let mut table = NamespaceTable::new();
    for item in &namespace_items {
        table.resolve(&item.namespace_path);
    }
    for (_, group) in &sorted_groups {
        table.resolve(group.namespace_path());
    }
    for list in [&containers, &functions, &constants, &enums] {
        for item in list {
            table.resolve(&item.namespace_path);
        }
    }

    let mut plan = BindingPlan::default();

    let creates: Vec<PlanStatement> = table
        .drain_pending()
        .into_iter()
        .map(|h| PlanStatement::CreateNamespaceHandle {
            handle: h.id,
            segment: h.segment,
            path: h.path,
            parent: h.parent,
        })
        .collect();
    if !creates.is_empty() {
        plan.segments.push(PlanSegment {
            kind: SegmentKind::Namespaces,
            statements: creates,
        });
    }

    for (owner, group) in &sorted_groups {
        match build_owner_segment(owner, group, options, &mut table, diagnostics) {
            Ok(segment) => plan.segments.push(segment),
            Err(message) => {
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::PlanBuilderFailure,
                    format!("skipping type '{owner}': {message}"),
                ));
            }
        }
    }

    push_flat_segment(&mut plan, SegmentKind::Containers, &containers, &mut table, |item, ns| {
        let ItemKind::Container { shape } = item.kind else {
            unreachable!("container bucket holds only container items");
        };
        PlanStatement::RegisterContainer {
            ns,
            display_name: item.display_name().to_string(),
            shape,
            type_params: item.parameter_types.clone(),
        }
    });
    push_flat_segment(&mut plan, SegmentKind::Functions, &functions, &mut table, |item, ns| {
        PlanStatement::RegisterFunction {
            ns,
            name: item.display_name().to_string(),
            reference: item.qualified_path.clone(),
        }
    });
    push_flat_segment(&mut plan, SegmentKind::Constants, &constants, &mut table, |item, ns| {
        PlanStatement::RegisterConstant {
            ns,
            name: item.display_name().to_string(),
            reference: item.qualified_path.clone(),
        }
    });
    push_flat_segment(&mut plan, SegmentKind::Enums, &enums, &mut table, |item, ns| {
        PlanStatement::RegisterEnum {
            ns,
            name: item.display_name().to_string(),
            values: item.enum_values.clone(),
        }
    });

    plan
}

/// Stable ordering for non-member kinds: namespace path first, original
/// merge order second.
fn sort_flat(items: &mut [&ExportItem]) {
    items.sort_by(|a, b| a.namespace_path.cmp(&b.namespace_path));
}

fn push_flat_segment(
    plan: &mut BindingPlan,
    kind: SegmentKind,
    items: &[&ExportItem],
    table: &mut NamespaceTable,
    make: impl Fn(&ExportItem, Option<crate::core::HandleId>) -> PlanStatement,
) {
    if items.is_empty() {
        return;
    }
    let statements = items
        .iter()
        .map(|item| make(item, table.resolve(&item.namespace_path)))
        .collect();
    plan.segments.push(PlanSegment { kind, statements });
}

/// Assemble one owner group into an inline or batched segment.
fn build_owner_segment(
    owner: &str,
    group: &OwnerGroup<'_>,
    options: &PlanOptions,
    table: &mut NamespaceTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<PlanSegment, String> {
    let Some(class) = group.class else {
        return Err("member items without an exported class".to_string());
    };

    let constructor_signatures = assemble_constructors(&group.constructors);
    let members = member_map(group)?;
    let operators = mapped_operators(&group.operators, diagnostics);

    let weight = 1 + 2 * members.len() + 2 * operators.len();
    let ns = table.resolve(&class.namespace_path);
    let display_name = class.display_name().to_string();
    let host_type = if class.qualified_path.is_empty() {
        owner.to_string()
    } else {
        class.qualified_path.clone()
    };

    // Inline and batched shapes expose the identical name→member mapping;
    // batching changes only the serialization shape.
    if weight <= options.weight_threshold {
        Ok(PlanSegment {
            kind: SegmentKind::InlineType,
            statements: vec![PlanStatement::RegisterType {
                ns,
                owner: owner.to_string(),
                display_name,
                host_type,
                constructor_signatures,
                inline_members: Some(members),
                inline_operators: operators,
            }],
        })
    } else {
        let mut statements = Vec::with_capacity(1 + members.len() + operators.len());
        statements.push(PlanStatement::RegisterType {
            ns,
            owner: owner.to_string(),
            display_name,
            host_type,
            constructor_signatures,
            inline_members: None,
            inline_operators: Vec::new(),
        });
        for (name, reference) in members {
            statements.push(PlanStatement::AssignMember {
                owner: owner.to_string(),
                name,
                reference,
            });
        }
        for (metamethod, reference) in operators {
            statements.push(PlanStatement::AssignOperator {
                owner: owner.to_string(),
                metamethod,
                reference,
            });
        }
        Ok(PlanSegment {
            kind: SegmentKind::BatchedType,
            statements,
        })
    }
}

/// Union of distinct normalized constructor parameter-type tuples, first-seen
/// order. No constructors at all means one zero-argument tuple.
fn assemble_constructors(constructors: &[&ExportItem]) -> Vec<Vec<String>> {
    let mut signatures: Vec<Vec<String>> = Vec::new();
    for ctor in constructors {
        let tuple: Vec<String> = ctor
            .parameter_types
            .iter()
            .map(|ty| normalize_type(ty))
            .collect();
        if !signatures.contains(&tuple) {
            signatures.push(tuple);
        }
    }
    if signatures.is_empty() {
        signatures.push(Vec::new());
    }
    signatures
}

/// The name→member mapping shared by the inline and batched shapes.
fn member_map(group: &OwnerGroup<'_>) -> Result<Vec<(String, MemberRef)>, String> {
    let mut members = Vec::new();
    for item in group.methods.iter().chain(&group.static_methods) {
        members.push((
            item.display_name().to_string(),
            MemberRef::Direct {
                path: item.qualified_path.clone(),
            },
        ));
    }
    for item in &group.properties {
        let reference = match item.access {
            PropertyAccess::ReadWrite => match &item.setter_path {
                Some(setter) => MemberRef::Property {
                    getter: Some(item.qualified_path.clone()),
                    setter: Some(setter.clone()),
                },
                // Field-backed: a single direct binding is read-write.
                None => MemberRef::Direct {
                    path: item.qualified_path.clone(),
                },
            },
            PropertyAccess::ReadOnly => MemberRef::Property {
                getter: Some(item.qualified_path.clone()),
                setter: None,
            },
            PropertyAccess::WriteOnly => MemberRef::Property {
                getter: None,
                setter: Some(item.qualified_path.clone()),
            },
            PropertyAccess::None => {
                return Err(format!("property '{}' has no access mode", item.name));
            }
        };
        members.push((item.display_name().to_string(), reference));
    }
    Ok(members)
}

/// Map operator items, omitting unsupported ones with an info diagnostic.
fn mapped_operators(
    operators: &[&ExportItem],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<(Metamethod, String)> {
    let mut mapped = Vec::new();
    for item in operators {
        match map_operator(item) {
            Some(metamethod) => mapped.push((metamethod, item.qualified_path.clone())),
            None => diagnostics.push(
                Diagnostic::info(
                    DiagnosticKind::UnsupportedOperator,
                    format!(
                        "operator '{}' on '{}' has no metamethod mapping; omitted",
                        item.name, item.owner
                    ),
                )
                .with_location(item.location.clone()),
            ),
        }
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::{ClassVariant, ItemKind};
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

    fn ctor(owner: &str, params: &[&str]) -> ExportItem {
        let mut item = ExportItem::new(ItemKind::Constructor, owner);
        item.owner = owner.to_string();
        item.parameter_types = params.iter().map(|s| s.to_string()).collect();
        item.qualified_path = format!("{owner}({})", item.parameter_types.join(","));
        item
    }

    fn operator(owner: &str, symbol: &str, params: &[&str]) -> ExportItem {
        let mut item = ExportItem::new(ItemKind::Operator, symbol);
        item.owner = owner.to_string();
        item.qualified_path = format!("{owner}::operator{symbol}");
        item.parameter_types = params.iter().map(|s| s.to_string()).collect();
        item
    }

    fn build_plan(items: Vec<ExportItem>) -> (BindingPlan, Vec<Diagnostic>) {
        let mut diags = Vec::new();
        let plan = build(&items, &PlanOptions::default(), &mut diags);
        (plan, diags)
    }

    /// Extract the name→reference mapping however the segment was shaped.
    fn name_map(plan: &BindingPlan, owner: &str) -> Vec<(String, MemberRef)> {
        let mut out = Vec::new();
        for stmt in plan.statements() {
            match stmt {
                PlanStatement::RegisterType {
                    display_name,
                    inline_members: Some(members),
                    ..
                } if display_name == owner => out.extend(members.clone()),
                PlanStatement::AssignMember {
                    owner: o,
                    name,
                    reference,
                } if o == owner => out.push((name.clone(), reference.clone())),
                _ => {}
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    #[test]
    fn no_constructors_means_one_zero_argument_tuple() {
        let (plan, _) = build_plan(vec![class("Widget", "")]);
        let sig = plan
            .statements()
            .find_map(|s| match s {
                PlanStatement::RegisterType {
                    constructor_signatures,
                    ..
                } => Some(constructor_signatures.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(sig, vec![Vec::<String>::new()]);
    }

    #[test]
    fn constructor_union_normalizes_whitespace() {
        let (plan, _) = build_plan(vec![
            class("Widget", ""),
            ctor("Widget", &["int", "const  std::string &"]),
            ctor("Widget", &["int", "const std::string&"]),
        ]);
        let sig = plan
            .statements()
            .find_map(|s| match s {
                PlanStatement::RegisterType {
                    constructor_signatures,
                    ..
                } => Some(constructor_signatures.clone()),
                _ => None,
            })
            .unwrap();
        // Whitespace-only differences collapse... but `&` spacing is part of
        // the spelling, so these stay distinct tuples.
        assert_eq!(sig.len(), 2);
    }

    #[test]
    fn identical_constructor_tuples_union_to_one() {
        let (plan, _) = build_plan(vec![
            class("Widget", ""),
            ctor("Widget", &["int"]),
            ctor("Widget", &[" int "]),
        ]);
        let sig = plan
            .statements()
            .find_map(|s| match s {
                PlanStatement::RegisterType {
                    constructor_signatures,
                    ..
                } => Some(constructor_signatures.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(sig, vec![vec!["int".to_string()]]);
    }

    #[test]
    fn light_type_is_inline() {
        let (plan, _) = build_plan(vec![
            class("Widget", ""),
            method("Widget", "update"),
            method("Widget", "draw"),
        ]);
        let kinds: Vec<_> = plan.segments.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SegmentKind::InlineType]);
    }

    #[test]
    fn heavy_type_is_batched() {
        // Weight = 1 + 2*10 = 21 > 20.
        let mut items = vec![class("Widget", "")];
        for i in 0..10 {
            items.push(method("Widget", &format!("m{i}")));
        }
        let (plan, _) = build_plan(items);
        assert_eq!(plan.segments[0].kind, SegmentKind::BatchedType);
        // Bare constructors-only statement plus one assignment per member.
        assert_eq!(plan.segments[0].statements.len(), 11);
        assert!(matches!(
            plan.segments[0].statements[0],
            PlanStatement::RegisterType {
                inline_members: None,
                ..
            }
        ));
    }

    #[test]
    fn weight_exactly_at_threshold_stays_inline() {
        // Weight = 1 + 2*9 = 19; threshold 19 keeps it inline.
        let mut items = vec![class("Widget", "")];
        for i in 0..9 {
            items.push(method("Widget", &format!("m{i}")));
        }
        let mut diags = Vec::new();
        let plan = build(
            &items,
            &PlanOptions {
                weight_threshold: 19,
            },
            &mut diags,
        );
        assert_eq!(plan.segments[0].kind, SegmentKind::InlineType);
    }

    #[test]
    fn batching_preserves_the_name_to_member_mapping() {
        let mut inline_items = vec![class("Widget", "")];
        let mut batched_items = vec![class("Widget", "")];
        for i in 0..3 {
            inline_items.push(method("Widget", &format!("m{i}")));
            batched_items.push(method("Widget", &format!("m{i}")));
        }
        // Pad the batched variant's weight over the threshold with operators
        // on a second type so the Widget mapping itself stays comparable.
        let mut diags = Vec::new();
        let inline_plan = build(&inline_items, &PlanOptions::default(), &mut diags);
        let batched_plan = build(
            &batched_items,
            &PlanOptions {
                weight_threshold: 2,
            },
            &mut diags,
        );

        assert_eq!(
            name_map(&inline_plan, "Widget"),
            name_map(&batched_plan, "Widget")
        );
        assert_eq!(inline_plan.segments[0].kind, SegmentKind::InlineType);
        assert_eq!(batched_plan.segments[0].kind, SegmentKind::BatchedType);
    }

    #[test]
    fn equality_operator_maps_and_inequality_reports_info() {
        let (plan, diags) = build_plan(vec![
            class("Vec2", ""),
            operator("Vec2", "==", &["const Vec2&"]),
            operator("Vec2", "!=", &["const Vec2&"]),
        ]);

        let inline_ops = plan
            .statements()
            .find_map(|s| match s {
                PlanStatement::RegisterType {
                    inline_operators, ..
                } => Some(inline_operators.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(inline_ops.len(), 1);
        assert_eq!(inline_ops[0].0, Metamethod::EqualTo);

        let infos: Vec<_> = diags
            .iter()
            .filter(|d| d.kind == DiagnosticKind::UnsupportedOperator)
            .collect();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].severity, crate::diagnostics::Severity::Info);
    }

    #[test]
    fn namespace_handles_chain_and_are_created_once() {
        let mut a = ExportItem::new(ItemKind::Function, "fa");
        a.qualified_path = "fa".to_string();
        a.namespace_path = "a".to_string();
        let mut b = ExportItem::new(ItemKind::Function, "fb");
        b.qualified_path = "fb".to_string();
        b.namespace_path = "a.b".to_string();
        let mut c = ExportItem::new(ItemKind::Function, "fc");
        c.qualified_path = "fc".to_string();
        c.namespace_path = "a.b.c".to_string();

        let (plan, _) = build_plan(vec![a, b, c]);

        let creates: Vec<_> = plan
            .statements()
            .filter_map(|s| match s {
                PlanStatement::CreateNamespaceHandle {
                    handle,
                    path,
                    parent,
                    ..
                } => Some((*handle, path.clone(), *parent)),
                _ => None,
            })
            .collect();
        assert_eq!(creates.len(), 3);
        assert_eq!(creates[0], (0, "a".to_string(), None));
        assert_eq!(creates[1], (1, "a.b".to_string(), Some(0)));
        assert_eq!(creates[2], (2, "a.b.c".to_string(), Some(1)));
    }

    #[test]
    fn merged_duplicates_are_dropped() {
        let (plan, _) = build_plan(vec![
            class("Widget", ""),
            method("Widget", "update"),
            method("Widget", "update"),
        ]);
        assert_eq!(name_map(&plan, "Widget").len(), 1);
    }

    #[test]
    fn orphan_members_skip_their_group_with_an_error() {
        let (plan, diags) = build_plan(vec![method("Ghost", "update")]);
        assert!(plan.segments.is_empty());
        assert!(
            diags
                .iter()
                .any(|d| d.kind == DiagnosticKind::PlanBuilderFailure)
        );
    }

    #[test]
    fn output_order_is_reproducible() {
        let items = vec![
            class("Zeta", "b"),
            class("Alpha", "a"),
            method("Zeta", "z"),
            method("Alpha", "a"),
        ];
        let (first, _) = build_plan(items.clone());
        let (second, _) = build_plan(items);
        assert_eq!(first, second);

        // Sorted by namespace path: Alpha ("a") before Zeta ("b").
        let names: Vec<_> = first
            .statements()
            .filter_map(|s| match s {
                PlanStatement::RegisterType { display_name, .. } => Some(display_name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Alpha".to_string(), "Zeta".to_string()]);
    }
}
