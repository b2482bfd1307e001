//! Diagnostics produced during descriptor resolution.
//!
//! Resolution itself reports failures through [`ResolveError`]. Diagnostics
//! cover the checks that run after a class is published (supertype cycles,
//! unresolved supertypes) and give callers a way to turn a shadowing
//! conflict into a user-facing message.

use std::sync::Arc;

use crate::base::{FileId, QualifiedName};

use super::error::ResolveError;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic about one declaration.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The declaration the diagnostic is about.
    pub subject: QualifiedName,
    /// The file the declaration came from, when known.
    pub file: Option<FileId>,
    pub severity: Severity,
    /// Error/warning code (e.g., "E0007").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    pub related: Vec<RelatedInfo>,
}

/// Related information for a diagnostic.
#[derive(Clone, Debug)]
pub struct RelatedInfo {
    pub subject: QualifiedName,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(subject: QualifiedName, message: impl Into<Arc<str>>) -> Self {
        Self {
            subject,
            file: None,
            severity: Severity::Error,
            code: None,
            message: message.into(),
            related: Vec::new(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(subject: QualifiedName, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(subject, message)
        }
    }

    pub fn with_file(mut self, file: FileId) -> Self {
        self.file = Some(file);
        self
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add related information.
    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    /// The user-facing form of a resolution error, if it has one.
    ///
    /// Only shadowing conflicts are user errors; everything else is fatal.
    pub fn from_error(error: &ResolveError) -> Option<Self> {
        match error {
            ResolveError::Shadowed { name, universe } => Some(
                Diagnostic::error(name.clone(), format!("'{}' is already defined in {}", name, universe))
                    .with_code(codes::SHADOWED_BY_NATIVE),
            ),
            _ => None,
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes used by the resolver.
pub mod codes {
    /// Name already defined natively.
    pub const SHADOWED_BY_NATIVE: &str = "E0002";
    /// Circular dependency.
    pub const CIRCULAR_DEPENDENCY: &str = "E0007";

    /// Supertype not found in any universe.
    pub const UNRESOLVED_SUPERTYPE: &str = "W0004";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics for a resolution session.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Add a cyclic supertype error. `path` starts and ends with the same class.
    pub fn supertype_cycle(&mut self, path: &[QualifiedName], file: Option<FileId>) {
        let Some(subject) = path.first() else {
            return;
        };
        let chain: Vec<String> = path.iter().map(|name| name.to_string()).collect();
        let mut diag = Diagnostic::error(
            subject.clone(),
            format!("cyclic supertype hierarchy: {}", chain.join(" -> ")),
        )
        .with_code(codes::CIRCULAR_DEPENDENCY);
        if let Some(file) = file {
            diag = diag.with_file(file);
        }
        for member in path.iter().skip(1).filter(|name| *name != subject) {
            diag = diag.with_related(RelatedInfo {
                subject: member.clone(),
                message: Arc::from("part of the cycle"),
            });
        }
        self.add(diag);
    }

    /// Add an unresolved supertype warning.
    pub fn unresolved_supertype(&mut self, class: &QualifiedName, supertype: &QualifiedName, file: Option<FileId>) {
        let mut diag = Diagnostic::warning(
            class.clone(),
            format!("supertype '{}' of '{}' cannot be resolved", supertype, class),
        )
        .with_code(codes::UNRESOLVED_SUPERTYPE);
        if let Some(file) = file {
            diag = diag.with_file(file);
        }
        self.add(diag);
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics about one declaration.
    pub fn diagnostics_for(&self, subject: &QualifiedName) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| &d.subject == subject).collect()
    }

    /// Get diagnostics carrying a given code.
    pub fn with_code(&self, code: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.code.as_deref() == Some(code))
            .collect()
    }

    /// Get error count.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// Get warning count.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Clear all diagnostics.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qn(text: &str) -> QualifiedName {
        QualifiedName::parse(text).unwrap()
    }

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error(qn("a.B"), "test error");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message.as_ref(), "test error");
        assert!(diag.file.is_none());
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::warning(qn("a.B"), "w").with_code("W0004").with_file(FileId::new(2));
        assert_eq!(diag.code.as_deref(), Some("W0004"));
        assert_eq!(diag.file, Some(FileId::new(2)));
    }

    #[test]
    fn test_collector_counts() {
        let mut collector = DiagnosticCollector::new();
        collector.supertype_cycle(&[qn("a.A"), qn("a.B"), qn("a.A")], None);
        collector.unresolved_supertype(&qn("a.C"), &qn("x.Missing"), Some(FileId::new(1)));

        assert_eq!(collector.error_count(), 1);
        assert_eq!(collector.warning_count(), 1);
        assert!(collector.has_errors());
        assert_eq!(collector.with_code(codes::CIRCULAR_DEPENDENCY).len(), 1);
        assert_eq!(collector.diagnostics_for(&qn("a.C")).len(), 1);
    }

    #[test]
    fn test_supertype_cycle_message() {
        let mut collector = DiagnosticCollector::new();
        collector.supertype_cycle(&[qn("a.A"), qn("a.B"), qn("a.A")], None);
        let diag = &collector.diagnostics()[0];
        assert_eq!(diag.message.as_ref(), "cyclic supertype hierarchy: a.A -> a.B -> a.A");
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].subject, qn("a.B"));
    }

    #[test]
    fn test_take_empties_collector() {
        let mut collector = DiagnosticCollector::new();
        collector.unresolved_supertype(&qn("a.C"), &qn("x.Y"), None);
        assert_eq!(collector.take().len(), 1);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_from_error() {
        let shadowed = ResolveError::shadowed(&qn("com.acme"), "<module>");
        let diag = Diagnostic::from_error(&shadowed).unwrap();
        assert_eq!(diag.code.as_deref(), Some(codes::SHADOWED_BY_NATIVE));
        assert_eq!(diag.subject, qn("com.acme"));

        assert!(Diagnostic::from_error(&ResolveError::Cycle("x".into())).is_none());
    }
}
