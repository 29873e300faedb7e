//! Error codes for the Quill diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexical errors surfaced by the parser
//! - `E1xx` - Syntax errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexical Errors (E0xx)
    // =========================================================================
    /// Unexpected character.
    ///
    /// The lexer produced an `Invalid` token for a character that belongs to
    /// no token class, and the parser reached it.
    E001,

    /// Unterminated string literal.
    ///
    /// A quote or triple quote was opened but not closed before the end of
    /// the line (or of the input, for triple quotes).
    E002,

    // =========================================================================
    // Syntax Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token the grammar does not allow here.
    E100,

    /// Unexpected end of input.
    ///
    /// The input ended before a complete construct was parsed.
    E101,

    /// Nesting too deep.
    ///
    /// Blocks or expressions are nested deeper than the configured limit.
    E102,

    /// Malformed numeric literal.
    ///
    /// A number contains more than one decimal point, e.g. `1.2.3`.
    E103,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E002 => "unterminated string literal",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "nesting too deep",
            ErrorCode::E103 => "malformed numeric literal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
