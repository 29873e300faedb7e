//! Collector for accumulating diagnostics during a parse.
//!
//! The [`DiagnosticCollector`] allows the parser to report multiple errors
//! instead of failing on the first error encountered.

use log::debug;

use crate::error::Diagnostic;

/// A collector for accumulating diagnostics in the order they are found.
///
/// # Example
///
/// ```text
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(
///     Diagnostic::error("unexpected token ')' at line 2")
///         .with_code(ErrorCode::E100)
///         .with_label(Span::new(14..15), "unexpected token")
/// );
///
/// let diagnostics = collector.finish();
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        debug!(diagnostic:% = diagnostic; "Diagnostic emitted");
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` if at least one diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Number of diagnostics emitted so far.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Finish collection and return the diagnostics in emission order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
