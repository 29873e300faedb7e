//! Spans of source text attached to a [`Diagnostic`](super::Diagnostic).

use quill_core::span::Span;

/// What a labeled span shows about the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    /// The offending token, or the empty span at the end of input.
    Offending,
    /// Surrounding context, e.g. where an unfinished statement began.
    Context,
}

/// A span of the analyzed source with a short note.
///
/// For `x = ` a renderer shows both roles:
///
/// ```text
///  1 | x =
///    | - ^ expected an expression
///    | |
///    | statement starts here
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    role: LabelRole,
    span: Span,
    message: String,
}

impl Label {
    pub fn new(role: LabelRole, span: Span, message: impl Into<String>) -> Self {
        Self {
            role,
            span,
            message: message.into(),
        }
    }

    /// Label the offending token.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(LabelRole::Offending, span, message)
    }

    /// Label surrounding context.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::new(LabelRole::Context, span, message)
    }

    pub fn role(&self) -> LabelRole {
        self.role
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renderers draw the offending label as the primary one.
    pub fn is_primary(&self) -> bool {
        self.role == LabelRole::Offending
    }
}
