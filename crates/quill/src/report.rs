//! Plain-text rendering of analysis results.
//!
//! Each function renders one section; sections end with a newline so they
//! can be concatenated.

use std::fmt::Write as _;

use quill_core::{stats::TokenStatistics, token::Token};
use quill_parser::ParseResult;

use crate::Analysis;

const INDENT: &str = "  ";

/// Render the token listing, one token per line.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    writeln!(out, "Tokens ({})", tokens.len()).expect("Writing to String buffer is infallible");
    for token in tokens {
        writeln!(out, "{INDENT}{token}").expect("Writing to String buffer is infallible");
    }
    out
}

/// Render every statistic category with its count.
pub fn render_statistics(statistics: &TokenStatistics) -> String {
    let mut out = String::from("Statistics\n");
    for (category, count) in statistics.iter() {
        writeln!(out, "{INDENT}{category}: {count}")
            .expect("Writing to String buffer is infallible");
    }
    out
}

/// Render the syntax check outcome, its diagnostics and the tree.
pub fn render_syntax(result: &ParseResult) -> String {
    let mut out = String::new();
    if result.success {
        out.push_str("Syntax: OK\n");
    } else {
        writeln!(out, "Syntax: {} error(s)", result.diagnostics.len())
            .expect("Writing to String buffer is infallible");
        for diagnostic in &result.diagnostics {
            writeln!(out, "{INDENT}{diagnostic}").expect("Writing to String buffer is infallible");
        }
    }

    match &result.ast {
        Some(ast) if result.success => out.push_str(&ast.pretty()),
        Some(ast) => {
            out.push_str("Partial tree\n");
            out.push_str(&ast.pretty());
        }
        None => {}
    }
    out
}

/// Render every section of a full analysis.
pub fn render_analysis(analysis: &Analysis) -> String {
    let mut out = render_tokens(&analysis.lexical.tokens);
    out.push_str(&render_statistics(&analysis.lexical.statistics));
    out.push_str(&render_syntax(&analysis.syntax));
    out
}

#[cfg(test)]
mod tests {
    use quill_parser::{parse, tokenize};

    use super::*;

    #[test]
    fn test_render_tokens() {
        let (tokens, _) = tokenize("x = 1");

        assert_eq!(
            render_tokens(&tokens),
            "Tokens (3)\n  IDENTIFIER('x') at 1:1\n  OPERATOR('=') at 1:3\n  NUMBER('1') at 1:5\n"
        );
    }

    #[test]
    fn test_render_statistics() {
        let (_, stats) = tokenize("if x >= 10: pass");
        let text = render_statistics(&stats);

        assert!(text.starts_with("Statistics\n"));
        assert!(text.contains("  keywords: 2\n"));
        assert!(text.contains("  numeric_chars: 2\n"));
        assert!(text.contains("  special_chars: 3\n"));
    }

    #[test]
    fn test_render_success() {
        let text = render_syntax(&parse("x = 1"));
        assert_eq!(text, "Syntax: OK\nPROGRAM\n  ASSIGN\n    x\n    VALUE\n      1\n");
    }

    #[test]
    fn test_render_failure_with_partial_tree() {
        let text = render_syntax(&parse("x = )\ny = 2"));

        assert!(text.starts_with(
            "Syntax: 1 error(s)\n  error[E100]: unexpected token ')' at line 1\n"
        ));
        assert!(text.contains("Partial tree\nPROGRAM\n  ASSIGN\n    y\n"));
    }

    #[test]
    fn test_render_failure_without_tree() {
        let text = render_syntax(&parse(""));
        assert_eq!(
            text,
            "Syntax: 1 error(s)\n  error[E101]: unexpected end of input at line 1\n"
        );
    }
}
