//! Configuration types for Quill analysis.
//!
//! This module provides configuration structures that control how source
//! text is tokenized and parsed. All types implement [`serde::Deserialize`]
//! so they can be loaded from external sources.
//!
//! # Overview
//!
//! - [`AnalyzerConfig`] - Top-level configuration combining lexer and parser settings.
//! - [`LexerConfig`] - Unterminated string handling, newline tokens and extra keywords.
//! - [`ParserConfig`] - Nesting bound for blocks and expressions.
//!
//! # Example
//!
//! ```
//! # use quill::config::AnalyzerConfig;
//! let config = AnalyzerConfig::default();
//! assert_eq!(config.parser().max_nesting_depth(), 64);
//! assert!(config.lexer().extra_keywords().is_empty());
//! ```

use serde::Deserialize;

use quill_parser::{
    DEFAULT_MAX_NESTING_DEPTH, LexerOptions, LexicalTable, ParserOptions, TableError,
};

pub use quill_parser::UnterminatedStringPolicy;

/// Top-level analyzer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalyzerConfig {
    /// Lexer configuration section.
    #[serde(default)]
    lexer: LexerConfig,

    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,
}

impl AnalyzerConfig {
    /// Creates a new [`AnalyzerConfig`] from its sections.
    pub fn new(lexer: LexerConfig, parser: ParserConfig) -> Self {
        Self { lexer, parser }
    }

    /// Returns the lexer configuration.
    pub fn lexer(&self) -> &LexerConfig {
        &self.lexer
    }

    /// Returns the parser configuration.
    pub fn parser(&self) -> &ParserConfig {
        &self.parser
    }
}

/// Lexer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LexerConfig {
    /// What to do with a string still open at the end of its line.
    #[serde(default)]
    unterminated_strings: UnterminatedStringPolicy,

    /// Whether displayed token listings include newline tokens.
    #[serde(default)]
    emit_newlines: bool,

    /// Words classified as keywords in addition to the built-in set.
    #[serde(default)]
    extra_keywords: Vec<String>,
}

impl LexerConfig {
    pub fn new(
        unterminated_strings: UnterminatedStringPolicy,
        emit_newlines: bool,
        extra_keywords: Vec<String>,
    ) -> Self {
        Self {
            unterminated_strings,
            emit_newlines,
            extra_keywords,
        }
    }

    pub fn unterminated_strings(&self) -> UnterminatedStringPolicy {
        self.unterminated_strings
    }

    pub fn emit_newlines(&self) -> bool {
        self.emit_newlines
    }

    pub fn extra_keywords(&self) -> &[String] {
        &self.extra_keywords
    }

    /// Builds the lexical table with the extra keywords applied.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if an extra keyword is not identifier-shaped.
    pub fn table(&self) -> Result<LexicalTable, TableError> {
        LexicalTable::default().with_keywords(self.extra_keywords.iter().cloned())
    }

    /// Options for the display lexer.
    pub fn options(&self) -> LexerOptions {
        LexerOptions::default()
            .with_newlines(self.emit_newlines)
            .with_unterminated_strings(self.unterminated_strings)
    }
}

/// Parser settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    /// Deepest block or expression nesting accepted.
    #[serde(default = "default_max_nesting_depth")]
    max_nesting_depth: usize,
}

impl ParserConfig {
    pub fn new(max_nesting_depth: usize) -> Self {
        Self { max_nesting_depth }
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }

    pub fn options(&self) -> ParserOptions {
        ParserOptions::default().with_max_nesting_depth(self.max_nesting_depth)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

fn default_max_nesting_depth() -> usize {
    DEFAULT_MAX_NESTING_DEPTH
}
