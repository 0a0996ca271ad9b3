//! Property pairing.
//!
//! Members annotated with the `property` category are collected as accessors
//! during class extraction and collapsed here: a `getX`/`isX` getter and a
//! `setX` setter on the same owner with compatible arity become one property
//! item named `x`. Access is read-write with both accessors, read-only with a
//! getter alone, write-only with a setter alone. Attributes from either
//! accessor carry over; the raw accessor declarations produce no standalone
//! method items.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::core::annotation::ParsedAnnotation;
use crate::core::item::{ExportItem, ItemKind, PropertyAccess};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::frontend::{Decl, SourceLocation};
use crate::utils::decapitalize;

use super::{ClassCtx, Extractor};

/// One property-annotated accessor, recorded during member extraction.
#[derive(Debug, Clone)]
pub(crate) struct PropertyAccessor {
    pub name: String,
    pub param_types: Vec<String>,
    pub return_type: String,
    pub attributes: BTreeMap<String, String>,
    /// Explicit property name from a `name=` attribute.
    pub explicit_name: Option<String>,
    pub location: SourceLocation,
}

impl PropertyAccessor {
    pub(crate) fn from_decl(decl: &Decl, ann: &ParsedAnnotation) -> Self {
        Self {
            name: decl.name.clone(),
            param_types: decl.params.iter().map(|p| p.ty.clone()).collect(),
            return_type: decl.return_type.clone().unwrap_or_default(),
            attributes: ann.attributes.clone(),
            explicit_name: ann.attr("name").map(str::to_string),
            location: decl.location.clone(),
        }
    }
}

/// Accessor role, derived from the name prefix and arity.
enum Role {
    Getter,
    Setter,
}

/// Classify an accessor and derive the property name it contributes to.
fn classify(accessor: &PropertyAccessor) -> Option<(String, Role)> {
    let arity = accessor.param_types.len();

    if let Some(rest) = accessor.name.strip_prefix("get")
        && !rest.is_empty()
        && arity == 0
    {
        return Some((decapitalize(rest), Role::Getter));
    }
    if let Some(rest) = accessor.name.strip_prefix("is")
        && !rest.is_empty()
        && arity == 0
    {
        return Some((decapitalize(rest), Role::Getter));
    }
    if let Some(rest) = accessor.name.strip_prefix("set")
        && !rest.is_empty()
        && arity == 1
    {
        return Some((decapitalize(rest), Role::Setter));
    }
    // No conventional prefix: arity decides the role, the full name names
    // the property.
    match arity {
        0 => Some((decapitalize(&accessor.name), Role::Getter)),
        1 => Some((decapitalize(&accessor.name), Role::Setter)),
        _ => None,
    }
}

/// Collapse recorded accessors into property items on `class`.
pub(crate) fn pair_properties(
    extractor: &mut Extractor<'_>,
    class: &ClassCtx,
    accessors: Vec<PropertyAccessor>,
) {
    // BTreeMap keeps property emission order independent of declaration order.
    let mut pairs: BTreeMap<String, (Option<PropertyAccessor>, Option<PropertyAccessor>)> =
        BTreeMap::new();

    for accessor in accessors {
        let Some((mut property_name, role)) = classify(&accessor) else {
            extractor.diagnostics.push(
                Diagnostic::warning(
                    DiagnosticKind::InvalidItem,
                    format!(
                        "property accessor '{}::{}' has incompatible arity",
                        class.name, accessor.name
                    ),
                )
                .with_location(accessor.location.clone()),
            );
            continue;
        };
        if let Some(explicit) = &accessor.explicit_name {
            property_name = explicit.clone();
        }

        let slot = match pairs.entry(property_name) {
            Entry::Vacant(e) => e.insert((None, None)),
            Entry::Occupied(e) => e.into_mut(),
        };
        match role {
            Role::Getter => slot.0 = Some(accessor),
            Role::Setter => slot.1 = Some(accessor),
        }
    }

    for (property_name, (getter, setter)) in pairs {
        let access = match (&getter, &setter) {
            (Some(_), Some(_)) => PropertyAccess::ReadWrite,
            (Some(_), None) => PropertyAccess::ReadOnly,
            (None, Some(_)) => PropertyAccess::WriteOnly,
            (None, None) => continue,
        };

        let mut item = ExportItem::new(ItemKind::Property, property_name);
        item.owner = class.name.clone();
        item.namespace_path = class.namespace_path.clone();
        item.access = access;

        let mut attributes = BTreeMap::new();
        if let Some(g) = &getter {
            item.qualified_path = class.member_path(&g.name);
            item.return_type = g.return_type.clone();
            item.location = g.location.clone();
            attributes.extend(g.attributes.clone());
        }
        if let Some(s) = &setter {
            let path = class.member_path(&s.name);
            if getter.is_some() {
                item.setter_path = Some(path);
            } else {
                item.qualified_path = path;
                item.return_type = s.param_types[0].clone();
                item.location = s.location.clone();
            }
            item.parameter_types = s.param_types.clone();
            attributes.extend(s.attributes.clone());
        }
        item.raw_attributes = attributes;

        extractor.push_item(item);
    }
}
