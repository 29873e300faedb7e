//! # Quill Parser
//!
//! Lexer and recovering parser for the Quill source analyzer. This crate
//! turns source text into classified tokens with frequency statistics, and
//! into a syntax tree with diagnostics for every syntax error found.
//!
//! ## Usage
//!
//! ```
//! # use quill_parser::{parse, tokenize};
//! # use quill_core::stats::StatCategory;
//!
//! let (tokens, stats) = tokenize("if x >= 10:\n    print(x)");
//! assert_eq!(tokens.len(), 9);
//! assert_eq!(stats.get(StatCategory::Keywords), 2);
//!
//! let result = parse("x = 1 +\nprint(x)");
//! assert!(!result.success);
//! assert_eq!(result.messages(), ["unexpected token 'print' at line 2"]);
//! ```
//!
//! Both entry points are total: malformed input becomes `Invalid` tokens or
//! diagnostics, never a panic or an early return.

pub mod error;
mod lexer;
mod lexical_table;
mod parser;
#[cfg(test)]
mod parser_tests;

pub use error::{Diagnostic, ErrorCode, Label, LabelRole, ParseError};
pub use lexer::{Lexer, LexerOptions, LexicalAnalysis, UnterminatedStringPolicy, tokenize};
pub use lexical_table::{LexicalTable, TableError};
pub use parser::{
    DEFAULT_MAX_NESTING_DEPTH, ParseResult, Parser, ParserOptions, parse, parse_tokens,
};
