//! Serde data model for declaration units.
//!
//! A *unit* is the declaration tree of one input file, as serialized by the
//! front end. Field defaults are deliberate: front ends only emit the fields
//! that apply to a declaration kind, everything else deserializes to its
//! neutral value.

use serde::{Deserialize, Serialize};

/// Source position for diagnostics. Never used for semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One declaration unit: the parsed tree of a single input file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Unit {
    /// Path of the original source file, as reported by the front end.
    #[serde(default)]
    pub path: String,
    /// Unit-level declared default namespace, if the source declared one.
    #[serde(default)]
    pub default_namespace: Option<String>,
    #[serde(default)]
    pub decls: Vec<Decl>,
}

/// Structural kind of a declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Class,
    Function,
    Method,
    Constructor,
    Destructor,
    Field,
    Enum,
    Variable,
    Alias,
}

/// Access specifier. Defaults to public for namespace-scope declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

/// A segment of the enclosing lexical scope chain, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeSegment {
    #[serde(default)]
    pub name: String,
    /// Anonymous namespaces contribute no namespace path segment.
    #[serde(default)]
    pub anonymous: bool,
}

/// A function or method parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: Option<String>,
    pub ty: String,
}

/// One enumerator of an enum declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumerator {
    pub label: String,
    /// Explicit value; unset values follow the previous enumerator.
    #[serde(default)]
    pub value: Option<i64>,
}

/// One declaration node in the tree.
///
/// Class members live in `members`; the extractor walks them when the class
/// itself carries an export annotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: String,
    /// Enclosing lexical scope chain, outermost first.
    #[serde(default)]
    pub scope: Vec<ScopeSegment>,
    #[serde(default)]
    pub access: Access,
    /// Raw annotation payload strings attached to this declaration.
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub return_type: Option<String>,
    #[serde(default)]
    pub params: Vec<Param>,
    /// Type of a field or variable declaration.
    #[serde(default)]
    pub field_type: Option<String>,
    /// Base type names, ordered. Class declarations only.
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub members: Vec<Decl>,
    #[serde(default)]
    pub enumerators: Vec<Enumerator>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_deleted: bool,
    /// Declarations originating from system/framework headers are never exported.
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub location: SourceLocation,
}

impl Default for DeclKind {
    fn default() -> Self {
        DeclKind::Class
    }
}

impl Decl {
    /// True if the declaration is a constructor copying or moving its own type.
    ///
    /// The front end reports parameter types verbatim (`const Widget&`,
    /// `Widget&&`), so this is a textual check against the owning class name.
    pub fn is_copy_or_move_ctor(&self, class_name: &str) -> bool {
        if self.kind != DeclKind::Constructor || self.params.len() != 1 {
            return false;
        }
        let ty = self.params[0].ty.replace(' ', "");
        ty == format!("const{class_name}&")
            || ty == format!("{class_name}&")
            || ty == format!("{class_name}&&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctor(param_ty: &str) -> Decl {
        Decl {
            kind: DeclKind::Constructor,
            name: "Widget".to_string(),
            params: vec![Param {
                name: None,
                ty: param_ty.to_string(),
            }],
            ..Decl::default()
        }
    }

    #[test]
    fn copy_and_move_ctors_detected() {
        assert!(ctor("const Widget&").is_copy_or_move_ctor("Widget"));
        assert!(ctor("Widget&").is_copy_or_move_ctor("Widget"));
        assert!(ctor("Widget&&").is_copy_or_move_ctor("Widget"));
        assert!(!ctor("int").is_copy_or_move_ctor("Widget"));
        assert!(!ctor("const Other&").is_copy_or_move_ctor("Widget"));
    }

    #[test]
    fn converting_ctor_with_two_params_is_not_copy() {
        let mut d = ctor("const Widget&");
        d.params.push(Param {
            name: None,
            ty: "int".to_string(),
        });
        assert!(!d.is_copy_or_move_ctor("Widget"));
    }

    #[test]
    fn unit_deserializes_with_defaults() {
        let json = r#"{
            "path": "widget.h",
            "decls": [{"kind": "class", "name": "Widget"}]
        }"#;
        let unit: Unit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.path, "widget.h");
        assert_eq!(unit.decls.len(), 1);
        assert_eq!(unit.decls[0].access, Access::Public);
        assert!(unit.decls[0].annotations.is_empty());
    }
}
