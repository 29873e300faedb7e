//! Quill - lexical and syntax analysis for a Python-like editing language.
//!
//! Tokenization with frequency statistics, and a recovering syntax check
//! that produces a tree plus one diagnostic per error found.

pub mod config;
pub mod report;

mod error;
mod source;

pub use quill_core::{ast, span, stats, token};
pub use quill_parser::{Diagnostic, ErrorCode, Label, LexicalAnalysis, ParseError, ParseResult};

pub use error::QuillError;
pub use source::read_source;

use log::{debug, info, trace};

use quill_parser::{Lexer, Parser};

use config::AnalyzerConfig;

/// Lexical and syntax results for one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub lexical: LexicalAnalysis,
    pub syntax: ParseResult,
}

/// Entry point for analyzing source text.
///
/// Holds a display lexer and a parser built from one [`AnalyzerConfig`].
/// Both share the same lexical table, so tokens shown to the user are
/// classified exactly as the parser sees them.
///
/// # Examples
///
/// ```rust
/// use quill::{Analyzer, config::AnalyzerConfig};
///
/// let analyzer = Analyzer::new(AnalyzerConfig::default())
///     .expect("default configuration is valid");
///
/// let analysis = analyzer.analyze("x = 1");
/// assert_eq!(analysis.lexical.tokens.len(), 3);
/// assert!(analysis.syntax.success);
///
/// // Or use the default configuration directly
/// let analyzer = Analyzer::default();
/// assert!(!analyzer.parse("x = ").success);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    lexer: Lexer,
    parser: Parser,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QuillError::Config`] if an extra keyword is not
    /// identifier-shaped.
    pub fn new(config: AnalyzerConfig) -> Result<Self, QuillError> {
        let table = config.lexer().table()?;
        debug!(
            extra_keywords = config.lexer().extra_keywords().len(),
            max_nesting_depth = config.parser().max_nesting_depth();
            "Analyzer configured"
        );

        let lexer_options = config.lexer().options();
        Ok(Self {
            parser: Parser::new(table.clone(), lexer_options, config.parser().options()),
            lexer: Lexer::new(table, lexer_options),
        })
    }

    /// Tokenize `source` for display.
    pub fn tokenize(&self, source: &str) -> LexicalAnalysis {
        info!(bytes = source.len(); "Tokenizing source");
        let analysis = self.lexer.tokenize(source);
        trace!(statistics:% = analysis.statistics; "Token statistics");
        analysis
    }

    /// Run the syntax check on `source`.
    pub fn parse(&self, source: &str) -> ParseResult {
        info!(bytes = source.len(); "Checking syntax");
        let result = self.parser.parse(source);
        debug!(
            success = result.success,
            diagnostics = result.diagnostics.len();
            "Syntax check finished"
        );
        result
    }

    /// Run both analyses on `source`.
    pub fn analyze(&self, source: &str) -> Analysis {
        Analysis {
            lexical: self.tokenize(source),
            syntax: self.parse(source),
        }
    }

    /// Parse `source`, treating any diagnostic as an error.
    ///
    /// # Errors
    ///
    /// Returns [`QuillError::Syntax`] carrying every diagnostic and the source.
    pub fn check(&self, source: &str) -> Result<ast::Node, QuillError> {
        self.parse(source)
            .into_result()
            .map_err(|err| QuillError::new_syntax_error(err, source))
    }
}
