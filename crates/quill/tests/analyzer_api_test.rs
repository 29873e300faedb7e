//! Integration tests for the Analyzer API
//!
//! These tests verify that the public API works and is usable.

use quill::{
    Analyzer, ErrorCode, QuillError,
    ast::NodeKind,
    config::{AnalyzerConfig, LexerConfig, ParserConfig, UnterminatedStringPolicy},
    report,
    stats::StatCategory,
    token::TokenKind,
};

#[test]
fn test_analyze_valid_source() {
    let source = "total = 0\nfor n in [1, 2, 3]:\n    total = total + n\nprint(total)\n";
    let analysis = Analyzer::default().analyze(source);

    assert!(
        analysis.syntax.success,
        "Should parse valid source: {:?}",
        analysis.syntax.messages()
    );
    assert_eq!(analysis.lexical.statistics.get(StatCategory::Keywords), 3);

    let ast = analysis.syntax.ast.expect("program");
    // Blocks are greedy, so the print belongs to the loop body.
    assert_eq!(ast.sequence_nodes().count(), 2);
    assert_eq!(ast.find_all(NodeKind::Print).len(), 1);
    assert_eq!(ast.find_all(NodeKind::Assign).len(), 2);
}

#[test]
fn test_display_tokens_match_parser_classification() {
    let config = AnalyzerConfig::new(
        LexerConfig::new(
            UnterminatedStringPolicy::Invalid,
            false,
            vec!["match".to_string()],
        ),
        ParserConfig::default(),
    );
    let analyzer = Analyzer::new(config).expect("valid config");

    let analysis = analyzer.analyze("match = 1");
    assert_eq!(analysis.lexical.tokens[0].kind(), TokenKind::Keyword);
    assert_eq!(
        analysis.syntax.messages(),
        ["unexpected token 'match' at line 1"]
    );
}

#[test]
fn test_display_newlines_are_optional() {
    let config = AnalyzerConfig::new(
        LexerConfig::new(UnterminatedStringPolicy::Invalid, true, Vec::new()),
        ParserConfig::default(),
    );
    let analyzer = Analyzer::new(config).expect("valid config");

    let with_newlines = analyzer.tokenize("x = 1\n");
    let without = Analyzer::default().tokenize("x = 1\n");

    assert_eq!(with_newlines.tokens.len(), 4);
    assert_eq!(without.tokens.len(), 3);
}

#[test]
fn test_truncate_policy() {
    let config = AnalyzerConfig::new(
        LexerConfig::new(UnterminatedStringPolicy::Truncate, false, Vec::new()),
        ParserConfig::default(),
    );
    let analyzer = Analyzer::new(config).expect("valid config");

    let analysis = analyzer.analyze("x = 'open");
    assert_eq!(analysis.lexical.tokens[2].kind(), TokenKind::String);
    assert!(analysis.syntax.success);

    let strict = Analyzer::default().analyze("x = 'open");
    assert_eq!(strict.lexical.statistics.get(StatCategory::InvalidTokens), 1);
    assert_eq!(strict.syntax.diagnostics[0].code(), Some(ErrorCode::E002));
}

#[test]
fn test_nesting_limit_from_config() {
    let config = AnalyzerConfig::new(LexerConfig::default(), ParserConfig::new(1));
    let analyzer = Analyzer::new(config).expect("valid config");

    let result = analyzer.parse("x = ((1))");
    assert_eq!(result.diagnostics[0].code(), Some(ErrorCode::E102));
}

#[test]
fn test_invalid_keyword_config() {
    let config = AnalyzerConfig::new(
        LexerConfig::new(
            UnterminatedStringPolicy::Invalid,
            false,
            vec!["1st".to_string()],
        ),
        ParserConfig::default(),
    );

    let result = Analyzer::new(config);
    assert!(matches!(result, Err(QuillError::Config(_))));
}

#[test]
fn test_check_maps_syntax_errors() {
    let analyzer = Analyzer::default();

    assert!(analyzer.check("print(1)").is_ok());

    match analyzer.check("x = )") {
        Err(QuillError::Syntax { err, src }) => {
            assert_eq!(err.diagnostics().len(), 1);
            assert_eq!(src, "x = )");
        }
        other => panic!("Expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_full_report() {
    let analysis = Analyzer::default().analyze("x = 1");
    let text = report::render_analysis(&analysis);

    assert!(text.starts_with("Tokens (3)\n"));
    assert!(text.contains("Statistics\n"));
    assert!(text.ends_with("Syntax: OK\nPROGRAM\n  ASSIGN\n    x\n    VALUE\n      1\n"));
}
