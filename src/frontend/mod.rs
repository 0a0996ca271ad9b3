//! Front-end boundary: the declaration-unit contract.
//!
//! The front end (a host-language parser, out of scope here) writes one JSON
//! file per translation unit describing its declaration tree. This module owns
//! the serde data model for that format, loading of unit files, and scanning
//! of unit files on disk. The rest of the pipeline treats the tree as
//! read-only input.

pub mod decl;
pub mod loader;
pub mod scanner;

pub use decl::{Access, Decl, DeclKind, Enumerator, Param, ScopeSegment, SourceLocation, Unit};
pub use loader::load_unit;
pub use scanner::{ScanResult, scan_units};
