//! Unit tests for the statement grammar, precedence and error recovery.

use quill_core::ast::{Child, Node, NodeKind};

use crate::{
    ErrorCode, LexerOptions, LexicalTable, ParseResult, Parser, ParserOptions,
    UnterminatedStringPolicy, lexer, parser,
};

/// Parse a source string and assert success
fn parse_ok(source: &str) -> Node {
    let result = parser::parse(source);
    assert!(
        result.success,
        "Expected parsing to succeed, but got: {:?}",
        result.messages()
    );
    result.ast.expect("successful parse has a tree")
}

/// Parse a source string and assert failure
fn parse_err(source: &str) -> ParseResult {
    let result = parser::parse(source);
    assert!(!result.success, "Expected parsing to fail for {source:?}");
    result
}

fn codes(result: &ParseResult) -> Vec<Option<ErrorCode>> {
    result.diagnostics.iter().map(|d| d.code()).collect()
}

fn statement_kinds(ast: &Node) -> Vec<NodeKind> {
    ast.sequence_nodes().map(Node::kind).collect()
}

fn first_statement(ast: &Node) -> &Node {
    ast.sequence_nodes().next().expect("at least one statement")
}

fn node_child(node: &Node, index: usize) -> &Node {
    node.child(index)
        .and_then(Child::as_node)
        .unwrap_or_else(|| panic!("child {index} of {} is not a node", node.kind()))
}

fn literal_child(node: &Node, index: usize) -> &str {
    node.child(index)
        .and_then(Child::as_literal)
        .unwrap_or_else(|| panic!("child {index} of {} is not a literal", node.kind()))
}

mod statements {
    use super::*;

    #[test]
    fn test_assignment() {
        let ast = parse_ok("x = 1");
        assert_eq!(ast.pretty(), "PROGRAM\n  ASSIGN\n    x\n    VALUE\n      1\n");
    }

    #[test]
    fn test_if_without_else() {
        let ast = parse_ok("if x:\n  return x");
        let if_node = first_statement(&ast);

        assert_eq!(if_node.kind(), NodeKind::If);
        assert!(if_node.child(2).is_some_and(Child::is_absent));
        assert_eq!(
            statement_kinds(node_child(if_node, 1)),
            [NodeKind::Return]
        );
    }

    #[test]
    fn test_if_with_else() {
        let ast = parse_ok("if x < 1:\n  y = 1\nelse:\n  y = 2");
        let if_node = first_statement(&ast);

        assert_eq!(node_child(if_node, 0).kind(), NodeKind::BinaryOp);
        assert_eq!(node_child(if_node, 2).kind(), NodeKind::Block);
    }

    #[test]
    fn test_dangling_else_binds_to_innermost_if() {
        let ast = parse_ok("if a:\n  if b:\n    x = 1\nelse:\n  x = 2");
        let outer = first_statement(&ast);
        let inner = first_statement(node_child(outer, 1));

        assert_eq!(inner.kind(), NodeKind::If);
        assert!(outer.child(2).is_some_and(Child::is_absent));
        assert_eq!(node_child(inner, 2).kind(), NodeKind::Block);
    }

    #[test]
    fn test_statement_lists_are_greedy() {
        let ast = parse_ok("while i < 10:\n  i = i + 1\nprint(i)");

        // The print statement belongs to the loop body.
        assert_eq!(statement_kinds(&ast), [NodeKind::While]);
        let body = node_child(first_statement(&ast), 1);
        assert_eq!(statement_kinds(body), [NodeKind::Assign, NodeKind::Print]);
    }

    #[test]
    fn test_for_loop() {
        let ast = parse_ok("for item in [1, 2, 3]:\n  print(item)");
        let for_node = first_statement(&ast);

        assert_eq!(for_node.kind(), NodeKind::For);
        assert_eq!(literal_child(for_node, 0), "item");
        let list = node_child(for_node, 1);
        assert_eq!(list.kind(), NodeKind::List);
        assert_eq!(list.sequence_nodes().count(), 3);
        assert_eq!(statement_kinds(node_child(for_node, 2)), [NodeKind::Print]);
    }

    #[test]
    fn test_function_def() {
        let ast = parse_ok("def add(a, b):\n  return a + b");

        let expected = "\
PROGRAM
  FUNCTION_DEF
    add
    a
    b
    BLOCK
      RETURN
        BINARY_OP
          +
          VALUE
            a
          VALUE
            b
";
        assert_eq!(ast.pretty(), expected);
    }

    #[test]
    fn test_function_def_without_parameters() {
        let ast = parse_ok("def f():\n  return 1");
        let def = first_statement(&ast);

        assert_eq!(literal_child(def, 0), "f");
        assert!(
            def.child(1)
                .and_then(Child::as_sequence)
                .is_some_and(|params| params.is_empty())
        );
    }

    #[test]
    fn test_call_statement_with_nested_call() {
        let ast = parse_ok("log(f(1), 'x')");
        let call = first_statement(&ast);

        assert_eq!(call.kind(), NodeKind::FunctionCall);
        assert_eq!(literal_child(call, 0), "log");
        let args: Vec<_> = call.sequence_nodes().map(Node::kind).collect();
        assert_eq!(args, [NodeKind::FunctionCall, NodeKind::Value]);
    }

    #[test]
    fn test_return_at_top_level() {
        let ast = parse_ok("return 1");
        assert_eq!(statement_kinds(&ast), [NodeKind::Return]);
    }

    #[test]
    fn test_trivia_between_statements() {
        let ast = parse_ok("# header\n\nx = 1 # trailing\n'''doc\nblock'''\ny = 2\n");
        assert_eq!(statement_kinds(&ast), [NodeKind::Assign, NodeKind::Assign]);
    }

    #[test]
    fn test_expression_continues_across_lines() {
        let ast = parse_ok("x = 1 +\n  2");
        assert_eq!(node_child(first_statement(&ast), 1).kind(), NodeKind::BinaryOp);
    }
}

mod expressions {
    use super::*;

    fn assigned_value(source: &str) -> Node {
        let ast = parse_ok(source);
        node_child(first_statement(&ast), 1).clone()
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let value = assigned_value("x = 1 + 2 * 3");

        assert_eq!(literal_child(&value, 0), "+");
        assert_eq!(literal_child(node_child(&value, 2), 0), "*");
    }

    #[test]
    fn test_left_associative() {
        let value = assigned_value("x = 1 - 2 - 3");

        assert_eq!(literal_child(&value, 0), "-");
        let lhs = node_child(&value, 1);
        assert_eq!(lhs.kind(), NodeKind::BinaryOp);
        assert_eq!(literal_child(node_child(lhs, 1), 0), "1");
        assert_eq!(literal_child(node_child(&value, 2), 0), "3");
    }

    #[test]
    fn test_comparison_binds_loosest() {
        let value = assigned_value("x = a + 1 < b * 2");

        assert_eq!(literal_child(&value, 0), "<");
        assert_eq!(literal_child(node_child(&value, 1), 0), "+");
        assert_eq!(literal_child(node_child(&value, 2), 0), "*");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let value = assigned_value("x = (1 + 2) * 3");

        assert_eq!(literal_child(&value, 0), "*");
        assert_eq!(literal_child(node_child(&value, 1), 0), "+");
    }

    #[test]
    fn test_lists() {
        assert_eq!(assigned_value("x = {1, 2}").kind(), NodeKind::List);

        let empty = assigned_value("x = []");
        assert_eq!(empty.kind(), NodeKind::List);
        assert_eq!(empty.sequence_nodes().count(), 0);
    }

    #[test]
    fn test_string_and_float_values() {
        assert_eq!(literal_child(&assigned_value("x = \"hi\""), 0), "\"hi\"");
        assert_eq!(literal_child(&assigned_value("x = 2.5"), 0), "2.5");
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_empty_input() {
        let result = parse_err("");

        assert!(result.ast.is_none());
        assert_eq!(result.messages(), ["unexpected end of input at line 1"]);
        assert_eq!(codes(&result), [Some(ErrorCode::E101)]);
    }

    #[test]
    fn test_missing_value_at_end_of_input() {
        let result = parse_err("x = ");

        assert!(result.ast.is_none());
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.messages(), ["unexpected end of input at line 1"]);

        let diagnostic = &result.diagnostics[0];
        assert_eq!(diagnostic.line(), Some(1));
        assert_eq!(diagnostic.labels().len(), 2);
        assert_eq!(diagnostic.help(), Some("expected an expression"));
    }

    #[test]
    fn test_keyword_constants_are_not_values() {
        let result = parse_err("while True:\n  x = None");

        assert!(result.ast.is_none());
        assert_eq!(
            result.messages(),
            [
                "unexpected token 'True' at line 1",
                "unexpected token 'None' at line 2",
            ]
        );
        assert_eq!(result.diagnostics[0].help(), Some("expected an expression"));
    }

    #[test]
    fn test_dangling_operator() {
        let result = parse_err("1 +");

        assert!(result.ast.is_none());
        assert_eq!(result.messages(), ["unexpected token '1' at line 1"]);
    }

    #[test]
    fn test_recovery_resumes_on_next_line() {
        let result = parse_err("1 +\ny = 2");

        assert_eq!(result.diagnostics.len(), 1);
        let ast = result.ast.expect("recovered statement");
        let assign = first_statement(&ast);
        assert_eq!(assign.kind(), NodeKind::Assign);
        assert_eq!(literal_child(assign, 0), "y");
    }

    #[test]
    fn test_recovery_keeps_partial_block() {
        let result = parse_err("def f():\n  x = )\n  return x");

        assert_eq!(result.messages(), ["unexpected token ')' at line 2"]);
        let ast = result.ast.expect("partial tree");
        let body = node_child(first_statement(&ast), 2);
        assert_eq!(statement_kinds(body), [NodeKind::Return]);
    }

    #[test]
    fn test_recovery_stops_at_statement_keyword() {
        let result = parse_err("x = )\ny = 2 +\nprint(y)");

        assert_eq!(
            result.messages(),
            [
                "unexpected token ')' at line 1",
                "unexpected token 'print' at line 3"
            ]
        );
        let ast = result.ast.expect("partial tree");
        assert_eq!(statement_kinds(&ast), [NodeKind::Print]);
    }

    #[test]
    fn test_stray_else() {
        let result = parse_err("else:\n  x = 1");

        assert_eq!(result.messages(), ["unexpected token 'else' at line 1"]);
        let ast = result.ast.expect("statement after recovery");
        assert_eq!(statement_kinds(&ast), [NodeKind::Assign]);
    }

    #[test]
    fn test_missing_colon_has_help() {
        let result = parse_err("if x\n  y = 1");

        assert_eq!(result.messages(), ["unexpected token 'y' at line 2"]);
        assert_eq!(result.diagnostics[0].help(), Some("expected `:`"));
    }

    #[test]
    fn test_print_requires_parentheses() {
        let result = parse_err("print x");

        assert_eq!(result.messages(), ["unexpected token 'x' at line 1"]);
        assert_eq!(result.diagnostics[0].help(), Some("expected `(`"));
    }

    #[test]
    fn test_augmented_assignment_is_not_a_statement() {
        let result = parse_err("x += 1");
        assert_eq!(result.messages(), ["unexpected token '+=' at line 1"]);
    }

    #[test]
    fn test_invalid_character() {
        let result = parse_err("x = $");

        assert_eq!(result.messages(), ["unexpected character '$' at line 1"]);
        assert_eq!(codes(&result), [Some(ErrorCode::E001)]);
    }

    #[test]
    fn test_unterminated_string() {
        let result = parse_err("x = 'abc");

        assert_eq!(result.messages(), ["unterminated string 'abc at line 1"]);
        assert_eq!(codes(&result), [Some(ErrorCode::E002)]);
    }

    #[test]
    fn test_malformed_number_keeps_value() {
        let result = parse_err("x = 1.2.3");

        assert_eq!(
            result.messages(),
            ["malformed numeric literal '1.2.3' at line 1"]
        );
        assert_eq!(codes(&result), [Some(ErrorCode::E103)]);
        let ast = result.ast.expect("tree is still built");
        assert_eq!(literal_child(node_child(first_statement(&ast), 1), 0), "1.2.3");
    }

    #[test]
    fn test_error_display() {
        let err = parser::parse("x = )")
            .into_result()
            .expect_err("syntax error");

        assert_eq!(
            err.to_string(),
            "error[E100]: unexpected token ')' at line 1"
        );
    }
}

mod nesting {
    use super::*;

    fn parser_with_depth(depth: usize) -> Parser {
        Parser::new(
            LexicalTable::default(),
            LexerOptions::default(),
            ParserOptions::default().with_max_nesting_depth(depth),
        )
    }

    #[test]
    fn test_deep_parentheses_are_reported() {
        let source = format!("x = {}1{}", "(".repeat(100), ")".repeat(100));
        let result = parse_err(&source);

        assert_eq!(codes(&result), [Some(ErrorCode::E102)]);
        assert_eq!(
            result.messages(),
            ["nesting deeper than 64 levels at line 1"]
        );
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let source = format!("x = {}1{}", "(".repeat(10), ")".repeat(10));
        parse_ok(&source);
    }

    #[test]
    fn test_configured_expression_depth() {
        let parser = parser_with_depth(2);

        assert!(parser.parse("x = ((1))").success);
        let result = parser.parse("x = (((1)))");
        assert_eq!(codes(&result), [Some(ErrorCode::E102)]);
    }

    #[test]
    fn test_configured_block_depth() {
        let result = parser_with_depth(1).parse("if a:\n  if b:\n    x = 1");

        assert_eq!(codes(&result), [Some(ErrorCode::E102)]);
        let ast = result.ast.expect("outer statement survives");
        assert_eq!(statement_kinds(&ast), [NodeKind::If]);
    }
}

mod configuration {
    use super::*;

    #[test]
    fn test_parse_display_tokens() {
        let (tokens, _) = lexer::tokenize("x = 1\ny = x");
        let result = parser::parse_tokens(&tokens, ParserOptions::default());

        assert!(result.success);
        let ast = result.ast.expect("tree");
        assert_eq!(statement_kinds(&ast), [NodeKind::Assign, NodeKind::Assign]);
    }

    #[test]
    fn test_extra_keyword_cannot_start_statement() {
        let table = LexicalTable::default()
            .with_keywords(["match"])
            .expect("valid keyword");
        let parser = Parser::new(table, LexerOptions::default(), ParserOptions::default());

        let result = parser.parse("match = 1");
        assert_eq!(result.messages(), ["unexpected token 'match' at line 1"]);
    }

    #[test]
    fn test_truncate_policy_accepts_open_string() {
        let parser = Parser::new(
            LexicalTable::default(),
            LexerOptions::default().with_unterminated_strings(UnterminatedStringPolicy::Truncate),
            ParserOptions::default(),
        );

        let result = parser.parse("x = 'abc");
        assert!(result.success);
    }
}
