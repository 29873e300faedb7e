//! Error and diagnostic system for the Quill parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single syntax or lexical error with an error code, the line it occurred
//! on, one or more source locations and optional help text. A parse never
//! aborts on the first error: diagnostics are accumulated in order and
//! returned with the best tree that could be built. [`ParseError`] wraps the
//! accumulated diagnostics for callers that want a `Result`.
//!
//! # Example
//!
//! ```
//! # use quill_parser::error::{Diagnostic, ErrorCode};
//! # use quill_core::span::Span;
//!
//! let diag = Diagnostic::error("unexpected token '+' at line 1")
//!     .with_code(ErrorCode::E100)
//!     .with_line(1)
//!     .with_label(Span::new(2..3), "unexpected token")
//!     .with_secondary_label(Span::new(0..1), "statement starts here")
//!     .with_help("a statement starts with a name or a keyword");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::{Label, LabelRole};
pub use parse_error::ParseError;
