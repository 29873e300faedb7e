//! The core diagnostic type for the Quill error system.
//!
//! A [`Diagnostic`] represents a single error with an error code, the line
//! it was found on, labeled source spans, and help text.

use std::fmt;

use quill_core::span::Span;

use crate::error::{error_code::ErrorCode, label::Label};

/// A diagnostic message with source location information.
///
/// The message itself is self-contained: it names the offending lexeme (or
/// the end of input) and the line number, so a consumer that only shows
/// strings loses nothing. Labels and help text are for richer renderers.
///
/// # Example
///
/// ```text
/// error[E100]: unexpected token ')' at line 3
///   --> main.qs:3:9
///    |
///  3 | print(x))
///    |         ^ unexpected token
///    |
///    = help: a statement starts with a name or a keyword
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    line: Option<usize>,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use quill_parser::error::{Diagnostic, ErrorCode};
    /// # use quill_core::span::Span;
    ///
    /// let diag = Diagnostic::error("unexpected end of input at line 1")
    ///     .with_code(ErrorCode::E101)
    ///     .with_line(1)
    ///     .with_label(Span::new(3..3), "expected an expression");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            line: None,
            labels: Vec::new(),
            help: None,
        }
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the 1-based line the error was reported on, if known.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the span of the primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the line number.
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
