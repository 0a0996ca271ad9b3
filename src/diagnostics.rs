//! Diagnostic types for generation results.
//!
//! Every stage of the pipeline (extraction, validation, plan building, cache)
//! reports problems as [`Diagnostic`] values instead of aborting. Diagnostics
//! are collected run-wide and printed at the end with their severity; only
//! fatal conditions (no processable unit at all) affect the exit code.

use serde::{Deserialize, Serialize};

use crate::frontend::SourceLocation;

// ============================================================
// Severity and DiagnosticKind
// ============================================================

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Debug,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Debug => write!(f, "debug"),
        }
    }
}

/// Category identifier for each diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Annotation payload did not match the grammar; degraded leniently.
    MalformedAnnotation,
    /// Item failed validation and was dropped.
    InvalidItem,
    /// Operator has no metamethod mapping and was omitted.
    UnsupportedOperator,
    /// Cache record was missing or unreadable; unit treated as cold.
    UnreadableCacheRecord,
    /// A unit could not be loaded or deserialized.
    FrontEndFailure,
    /// An owner group could not be assembled; the group was skipped.
    PlanBuilderFailure,
    /// Informational note (promotion skips, callback declarations, …).
    Note,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::MalformedAnnotation => write!(f, "malformed-annotation"),
            DiagnosticKind::InvalidItem => write!(f, "invalid-item"),
            DiagnosticKind::UnsupportedOperator => write!(f, "unsupported-operator"),
            DiagnosticKind::UnreadableCacheRecord => write!(f, "unreadable-cache-record"),
            DiagnosticKind::FrontEndFailure => write!(f, "front-end-failure"),
            DiagnosticKind::PlanBuilderFailure => write!(f, "plan-builder-failure"),
            DiagnosticKind::Note => write!(f, "note"),
        }
    }
}

// ============================================================
// Diagnostic
// ============================================================

/// A single reportable finding, self-contained for the reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Source location, when the finding points at a declaration.
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, message)
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, kind, message)
    }

    pub fn debug(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Debug, kind, message)
    }
}

/// Count diagnostics at [`Severity::Error`].
pub fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Info.to_string(), "info");
    }

    #[test]
    fn error_count_ignores_lower_severities() {
        let diags = vec![
            Diagnostic::error(DiagnosticKind::FrontEndFailure, "bad unit"),
            Diagnostic::warning(DiagnosticKind::InvalidItem, "dropped"),
            Diagnostic::info(DiagnosticKind::UnsupportedOperator, "!="),
        ];
        assert_eq!(error_count(&diags), 1);
    }
}
