//! Rivet - binding registration generator for annotated host declarations
//!
//! Rivet reads declaration trees exported by a front end as JSON units,
//! extracts binding metadata driven by lightweight export annotations,
//! assembles a batching-aware binding plan, and emits sol2-style Lua
//! registration source. An incremental content-hash cache skips
//! re-extraction of unchanged units.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `frontend`: Declaration unit contract, loading, and scanning
//! - `core`: Extraction engine (annotations, inference, validation, orchestration)
//! - `plan`: Binding plan assembly (grouping, batching, operator mapping)
//! - `emit`: Plan serialization to registration source
//! - `cache`: Incremental per-unit extraction cache
//! - `diagnostics`: Run-wide diagnostic collection
//! - `utils`: Shared utility functions

pub mod cache;
pub mod cli;
pub mod config;
pub mod core;
pub mod diagnostics;
pub mod emit;
pub mod frontend;
pub mod plan;
pub mod utils;
