//! Binding metadata items.
//!
//! [`ExportItem`] is the unit of binding metadata flowing through the whole
//! pipeline: created per annotated declaration (or synthesized by member
//! auto-extraction, promotion, and property pairing), validated, merged across
//! units, and finally consumed by the plan builder. Items are also what the
//! incremental cache persists per unit, so everything here is serde-friendly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::frontend::SourceLocation;

/// Class registration flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassVariant {
    Regular,
    Static,
    Singleton,
    Abstract,
}

/// Shape of a container marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerShape {
    Vector,
    Map,
    UnorderedMap,
    Set,
    List,
}

impl ContainerShape {
    /// Suffix appended to default container display names.
    pub fn display_suffix(&self) -> &'static str {
        match self {
            ContainerShape::Vector => "Vector",
            ContainerShape::Map => "Map",
            ContainerShape::UnorderedMap => "UnorderedMap",
            ContainerShape::Set => "Set",
            ContainerShape::List => "List",
        }
    }

    /// Host-language template the shape corresponds to.
    pub fn host_template(&self) -> &'static str {
        match self {
            ContainerShape::Vector => "std::vector",
            ContainerShape::Map => "std::map",
            ContainerShape::UnorderedMap => "std::unordered_map",
            ContainerShape::Set => "std::set",
            ContainerShape::List => "std::list",
        }
    }
}

/// Closed kind of an export item.
///
/// A tagged enum rather than a free-form string: invalid kinds cannot be
/// constructed, and matches over kinds are checked exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Module,
    Namespace,
    Class { variant: ClassVariant },
    Constructor,
    Method,
    StaticMethod,
    Property,
    Operator,
    Function,
    Constant,
    Variable,
    Enum,
    Container { shape: ContainerShape },
    TemplateInstance,
}

impl ItemKind {
    /// Stable tag used in dedup signatures and ordering.
    pub fn tag(&self) -> &'static str {
        match self {
            ItemKind::Module => "module",
            ItemKind::Namespace => "namespace",
            ItemKind::Class { .. } => "class",
            ItemKind::Constructor => "constructor",
            ItemKind::Method => "method",
            ItemKind::StaticMethod => "static_method",
            ItemKind::Property => "property",
            ItemKind::Operator => "operator",
            ItemKind::Function => "function",
            ItemKind::Constant => "constant",
            ItemKind::Variable => "variable",
            ItemKind::Enum => "enum",
            ItemKind::Container { .. } => "container",
            ItemKind::TemplateInstance => "template_instance",
        }
    }

    /// Kinds owned by a class (members of an owner group).
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            ItemKind::Constructor
                | ItemKind::Method
                | ItemKind::StaticMethod
                | ItemKind::Property
                | ItemKind::Operator
        )
    }
}

/// Property access mode. `None` for every non-property item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyAccess {
    #[default]
    None,
    ReadOnly,
    ReadWrite,
    WriteOnly,
}

/// Dedup signature: no two surviving items may share one.
///
/// Used as the collision guard during extraction, promotion, and the
/// plan builder's re-dedup over merged multi-unit input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemSignature {
    pub kind_tag: &'static str,
    pub name: String,
    pub qualified_path: String,
    pub owner: String,
}

/// The unit of binding metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportItem {
    pub kind: ItemKind,
    pub name: String,
    /// Alias overriding `name` in generated registrations.
    #[serde(default)]
    pub target_name: Option<String>,
    /// Owner-qualified call identity (e.g. `Widget::getName`).
    #[serde(default)]
    pub qualified_path: String,
    /// Resolved dotted namespace path (e.g. `game.ui`). Empty = root.
    #[serde(default)]
    pub namespace_path: String,
    /// Owning class name for member items, empty otherwise.
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub parameter_types: Vec<String>,
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub access: PropertyAccess,
    /// Setter call identity for paired properties.
    #[serde(default)]
    pub setter_path: Option<String>,
    /// Ordered base type names. Class items only.
    #[serde(default)]
    pub base_types: Vec<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_virtual: bool,
    /// Ordered (label, value) pairs. Enum items only.
    #[serde(default)]
    pub enum_values: Vec<(String, i64)>,
    /// Raw attribute map from the annotation payload.
    #[serde(default)]
    pub raw_attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub location: SourceLocation,
}

impl ExportItem {
    pub fn new(kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            target_name: None,
            qualified_path: String::new(),
            namespace_path: String::new(),
            owner: String::new(),
            parameter_types: Vec::new(),
            return_type: String::new(),
            access: PropertyAccess::None,
            setter_path: None,
            base_types: Vec::new(),
            is_static: false,
            is_const: false,
            is_virtual: false,
            enum_values: Vec::new(),
            raw_attributes: BTreeMap::new(),
            location: SourceLocation::default(),
        }
    }

    /// The `(kind, name, qualified_path, owner)` dedup key.
    pub fn signature(&self) -> ItemSignature {
        ItemSignature {
            kind_tag: self.kind.tag(),
            name: self.name.clone(),
            qualified_path: self.qualified_path.clone(),
            owner: self.owner.clone(),
        }
    }

    /// Name to expose in generated registrations (alias wins).
    pub fn display_name(&self) -> &str {
        self.target_name.as_deref().unwrap_or(&self.name)
    }
}
