//! Core generation engine.
//!
//! The pipeline runs in four stages:
//!
//! 1. **Cache gate** — fingerprint every unit, decide dirty/clean
//!    ([`crate::cache`]).
//! 2. **Extraction** — dirty units run annotation-driven metadata extraction
//!    and validation in parallel (`extract`, `validate`).
//! 3. **Merge** — surviving items from all units (fresh or cached) merge into
//!    one collection after the parallel join.
//! 4. **Plan & emit** — the merged set becomes a [`crate::plan::BindingPlan`],
//!    serialized by [`crate::emit`].

pub mod annotation;
pub mod context;
pub mod extract;
pub mod item;
pub mod namespace;
pub mod validate;

pub use annotation::{AnnotationCategory, ParsedAnnotation};
pub use context::{GenerateContext, GenerateOutcome, UnitOutcome};
pub use extract::{ExtractOptions, UnitExtraction, extract_unit};
pub use item::{
    ClassVariant, ContainerShape, ExportItem, ItemKind, ItemSignature, PropertyAccess,
};
pub use namespace::{HandleId, NamespaceHandle, NamespaceTable};
pub use validate::{validate, validate_all};
