//! Error types for Quill operations.
//!
//! This module provides the main error type [`QuillError`] which wraps
//! the error conditions that can occur while loading and analyzing source.

use std::io;

use thiserror::Error;

use quill_parser::{ParseError, TableError};

/// The main error type for Quill operations.
///
/// # Diagnostic Variants
///
/// The `Syntax` variant keeps the source text next to the diagnostics so
/// callers can render labeled snippets.
#[derive(Debug, Error)]
pub enum QuillError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] TableError),

    #[error("{err}")]
    Syntax { err: ParseError, src: String },
}

impl QuillError {
    /// Create a new `Syntax` error with the associated source code.
    pub fn new_syntax_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Syntax {
            err,
            src: src.into(),
        }
    }
}
