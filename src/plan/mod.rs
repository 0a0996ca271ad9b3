//! Binding plan assembly.
//!
//! The plan builder consumes the whole validated, merged item set and
//! produces a [`BindingPlan`]: ordered segments of registration statements
//! that the emitter serializes verbatim. Everything order-sensitive happens
//! here — grouping, constructor union, batching, operator mapping, namespace
//! materialization — so the emitter stays a dumb serializer and unchanged
//! input reproduces byte-identical output.

pub mod builder;
pub mod operators;

pub use builder::{DEFAULT_WEIGHT_THRESHOLD, PlanOptions, build};
pub use operators::{Metamethod, map_operator};

use crate::core::{ContainerShape, HandleId};

/// How a member is referenced in a registration statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    /// Direct binding of a single call identity: methods, static methods,
    /// and public fields.
    Direct { path: String },
    /// Accessor-backed property with optional getter and setter identities.
    Property {
        getter: Option<String>,
        setter: Option<String>,
    },
}

/// One statement of the registration output contract.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanStatement {
    CreateNamespaceHandle {
        handle: HandleId,
        segment: String,
        /// Full dotted path, for readable emitter output.
        path: String,
        parent: Option<HandleId>,
    },
    RegisterType {
        ns: Option<HandleId>,
        /// Owning class name, the key batched assignments refer back to.
        owner: String,
        /// Name exposed to script.
        display_name: String,
        /// Host type the registration binds.
        host_type: String,
        /// Distinct constructor parameter-type tuples, first-seen order.
        constructor_signatures: Vec<Vec<String>>,
        /// Inline member map; `None` in the batched shape.
        inline_members: Option<Vec<(String, MemberRef)>>,
        /// Inline operator list; empty in the batched shape.
        inline_operators: Vec<(Metamethod, String)>,
    },
    AssignMember {
        owner: String,
        name: String,
        reference: MemberRef,
    },
    AssignOperator {
        owner: String,
        metamethod: Metamethod,
        reference: String,
    },
    RegisterFunction {
        ns: Option<HandleId>,
        name: String,
        reference: String,
    },
    RegisterConstant {
        ns: Option<HandleId>,
        name: String,
        reference: String,
    },
    RegisterEnum {
        ns: Option<HandleId>,
        name: String,
        values: Vec<(String, i64)>,
    },
    RegisterContainer {
        ns: Option<HandleId>,
        display_name: String,
        shape: ContainerShape,
        type_params: Vec<String>,
    },
}

/// Segment flavor, mostly for tests and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Namespaces,
    InlineType,
    BatchedType,
    Functions,
    Constants,
    Enums,
    Containers,
}

/// An ordered run of statements serialized together.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSegment {
    pub kind: SegmentKind,
    pub statements: Vec<PlanStatement>,
}

/// The whole-run binding plan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingPlan {
    pub segments: Vec<PlanSegment>,
}

impl BindingPlan {
    /// Flat iterator over all statements in emission order.
    pub fn statements(&self) -> impl Iterator<Item = &PlanStatement> {
        self.segments.iter().flat_map(|s| s.statements.iter())
    }

    /// Total number of registrations (excludes namespace handle creation).
    pub fn registration_count(&self) -> usize {
        self.statements()
            .filter(|s| !matches!(s, PlanStatement::CreateNamespaceHandle { .. }))
            .count()
    }
}
