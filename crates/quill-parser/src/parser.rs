//! Recovering parser for Quill source tokens.
//!
//! This module turns the token stream produced by the [`lexer`](super::lexer)
//! into a [`Node`] tree. Parsing is recursive descent over a winnow
//! [`TokenSlice`]; binary expressions use a binding-power table so that
//! `* /` bind tighter than `+ -`, which bind tighter than comparisons.
//!
//! Newline and comment tokens are trivia: every terminal parser skips them
//! before matching.
//!
//! A syntax error never ends the parse. The statement list that was parsing
//! when the error surfaced records one [`Diagnostic`], discards tokens up to
//! the next line or statement keyword, and carries on. The result is a
//! [`ParseResult`] holding every diagnostic plus the best tree that could be
//! built.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{preceded, repeat, separated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{Stream, TokenSlice},
    token::any,
};

use quill_core::{
    ast::Node,
    span::Span,
    token::{Token, TokenKind},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::{Lexer, LexerOptions},
    lexical_table::LexicalTable,
};

/// Default bound on block and expression nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Keywords that start a statement and act as synchronization points.
const STATEMENT_KEYWORDS: [&str; 6] = ["if", "while", "for", "def", "print", "return"];

/// Context attached to parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
enum Context {
    /// Description of what was expected, e.g. "an expression"
    Label(&'static str),
    /// Exact keyword or punctuation that was expected
    Token(&'static str),
    /// The nesting bound was exceeded
    NestingTooDeep,
}

impl Context {
    fn describe(&self) -> Option<String> {
        match self {
            Context::Label(label) => Some((*label).to_string()),
            Context::Token(text) => Some(format!("`{text}`")),
            Context::NestingTooDeep => None,
        }
    }
}

type Input<'t> = TokenSlice<'t, Token>;
type IResult<O> = ModalResult<O, ContextError<Context>>;

/// Build a recoverable error carrying `context`.
fn expected(input: &Input<'_>, context: Context) -> ErrMode<ContextError<Context>> {
    ErrMode::Backtrack(ContextError::new().add_context(input, &input.checkpoint(), context))
}

fn too_deep(input: &Input<'_>) -> ErrMode<ContextError<Context>> {
    ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        Context::NestingTooDeep,
    ))
}

/// Parse a single newline or comment token
fn trivia(input: &mut Input<'_>) -> IResult<()> {
    any.verify(|token: &Token| token.kind().is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more newline or comment tokens
fn trivia0(input: &mut Input<'_>) -> IResult<()> {
    repeat(0.., trivia).parse_next(input)
}

/// Parse the keyword `word`, skipping leading trivia
fn keyword<'t>(input: &mut Input<'t>, word: &'static str) -> IResult<&'t Token> {
    preceded(trivia0, any.verify(|token: &Token| token.is_keyword(word)))
        .context(Context::Token(word))
        .parse_next(input)
}

/// Parse the operator or delimiter `text`, skipping leading trivia
fn punct<'t>(input: &mut Input<'t>, text: &'static str) -> IResult<&'t Token> {
    preceded(trivia0, any.verify(|token: &Token| token.is_punct(text)))
        .context(Context::Token(text))
        .parse_next(input)
}

fn identifier<'t>(input: &mut Input<'t>) -> IResult<&'t Token> {
    preceded(
        trivia0,
        any.verify(|token: &Token| token.kind() == TokenKind::Identifier),
    )
    .context(Context::Label("an identifier"))
    .parse_next(input)
}

/// Parse whatever significant token comes next
fn significant<'t>(input: &mut Input<'t>) -> IResult<&'t Token> {
    preceded(trivia0, any)
        .context(Context::Label("a token"))
        .parse_next(input)
}

/// Parse a comma separated list of parameter names: `a, b, c`
fn parameters<'t>(input: &mut Input<'t>) -> IResult<Vec<String>> {
    separated(
        0..,
        identifier.map(|token: &'t Token| token.lexeme().to_string()),
        |input: &mut Input<'t>| punct(input, ","),
    )
    .parse_next(input)
}

/// The next token that is not trivia, without consuming anything.
fn peek_significant<'t>(input: &Input<'t>) -> Option<&'t Token> {
    input
        .iter_offsets()
        .map(|(_, token)| token)
        .find(|token| !token.kind().is_trivia())
}

fn next_is_punct(input: &Input<'_>, text: &str) -> bool {
    peek_significant(input).is_some_and(|token| token.is_punct(text))
}

fn is_statement_keyword(token: &Token) -> bool {
    token.kind() == TokenKind::Keyword && STATEMENT_KEYWORDS.contains(&token.lexeme())
}

fn starts_statement(token: &Token) -> bool {
    token.kind() == TokenKind::Identifier || is_statement_keyword(token)
}

/// Binding power of an infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BindingPower {
    /// How tightly the operator binds to its left operand.
    left: u8,
    /// How tightly the operator binds to its right operand.
    right: u8,
}

impl BindingPower {
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }
}

fn binary_binding_power(op: &str) -> Option<BindingPower> {
    match op {
        "==" | "!=" | "<" | ">" | "<=" | ">=" => Some(BindingPower::left_assoc(10)),
        "+" | "-" => Some(BindingPower::left_assoc(20)),
        "*" | "/" => Some(BindingPower::left_assoc(30)),
        _ => None,
    }
}

/// Where the parser is in the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParserState {
    /// No token examined yet.
    Initial,
    /// Parsing statements.
    InStatementList,
    /// Parsing an expression inside a statement.
    InExpression,
    /// Discarding tokens after a syntax error.
    ErrorRecovery,
    /// End of input reached.
    Done,
}

/// Which statement list is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// The whole program: must consume every token.
    Program,
    /// A block body: ends at the first token that cannot start a statement.
    Block,
}

/// Per-call parser state.
pub(crate) struct ParseSession<'t> {
    tokens: &'t [Token],
    diagnostics: DiagnosticCollector,
    state: ParserState,
    max_depth: usize,
    #[cfg(test)]
    history: Vec<ParserState>,
}

impl<'t> ParseSession<'t> {
    pub(crate) fn new(tokens: &'t [Token], max_depth: usize) -> Self {
        Self {
            tokens,
            diagnostics: DiagnosticCollector::new(),
            state: ParserState::Initial,
            max_depth,
            #[cfg(test)]
            history: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> ParserState {
        self.state
    }

    /// Every state entered so far, oldest first.
    #[cfg(test)]
    pub(crate) fn history(&self) -> &[ParserState] {
        &self.history
    }

    fn transition(&mut self, next: ParserState) {
        if self.state != next {
            trace!(from:? = self.state, to:? = next; "Parser state changed");
            self.state = next;
            #[cfg(test)]
            self.history.push(next);
        }
    }

    /// Parse a whole program.
    ///
    /// Returns `None` when not a single statement could be built.
    pub(crate) fn program(&mut self, input: &mut Input<'t>) -> Option<Node> {
        let statements = self.statement_list(input, 0, Scope::Program);
        self.transition(ParserState::Done);

        if statements.is_empty() {
            if !self.diagnostics.has_errors() {
                // A program needs at least one statement.
                let diagnostic =
                    self.diagnose(expected(input, Context::Label("a statement")), None, None);
                self.diagnostics.emit(diagnostic);
            }
            return None;
        }
        Some(Node::program(statements))
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        debug!(diagnostics = self.diagnostics.len(); "Parsing finished");
        self.diagnostics.finish()
    }

    fn statement_list(&mut self, input: &mut Input<'t>, depth: usize, scope: Scope) -> Vec<Node> {
        let mut statements = Vec::new();

        while let Some(token) = peek_significant(input) {
            self.transition(ParserState::InStatementList);
            let start = input.eof_offset();

            if !starts_statement(token) {
                if scope == Scope::Block {
                    break;
                }
                let err = expected(input, Context::Label("a statement"));
                self.recover(input, err, start);
                continue;
            }

            match self.statement(input, depth) {
                Ok(node) => statements.push(node),
                Err(err) => self.recover(input, err, start),
            }
        }
        statements
    }

    /// Record a diagnostic for `err` and skip to a synchronization point.
    fn recover(&mut self, input: &mut Input<'t>, err: ErrMode<ContextError<Context>>, start: usize) {
        self.transition(ParserState::ErrorRecovery);

        let offending = peek_significant(input);
        let diagnostic = self.diagnose(err, offending, self.token_at(start));
        debug!(
            code:? = diagnostic.code(),
            line:? = diagnostic.line();
            "Syntax error, recovering"
        );
        self.diagnostics.emit(diagnostic);

        let line = offending.map_or(usize::MAX, Token::line);
        self.synchronize(input, line, input.eof_offset() == start);
        self.transition(ParserState::InStatementList);
    }

    /// Discard tokens until one starts a later line than `line` or is a
    /// statement keyword.
    ///
    /// With `must_advance`, at least one token is discarded so that a
    /// statement list always makes progress.
    fn synchronize(&mut self, input: &mut Input<'t>, line: usize, must_advance: bool) {
        let mut skipped = 0usize;
        while let Some((_, token)) = input.iter_offsets().next() {
            let boundary = token.line() > line || is_statement_keyword(token);
            if boundary && (skipped > 0 || !must_advance) {
                break;
            }
            input.next_token();
            skipped += 1;
        }
        debug!(skipped = skipped; "Resuming after synchronization point");
    }

    fn statement(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        let Some(token) = peek_significant(input) else {
            return Err(expected(input, Context::Label("a statement")));
        };

        if token.kind() != TokenKind::Keyword {
            return self.name_statement(input, depth);
        }
        match token.lexeme() {
            "if" => self.if_statement(input, depth),
            "while" => self.while_statement(input, depth),
            "for" => self.for_statement(input, depth),
            "def" => self.function_def(input, depth),
            "print" => self.print_statement(input, depth),
            "return" => self.return_statement(input, depth),
            _ => Err(expected(input, Context::Label("a statement"))),
        }
    }

    /// Parse a block body: one or more statements.
    fn block(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        if depth > self.max_depth {
            return Err(too_deep(input));
        }
        if !peek_significant(input).is_some_and(starts_statement) {
            return Err(expected(input, Context::Label("a statement")));
        }
        let statements = self.statement_list(input, depth, Scope::Block);
        Ok(Node::block(statements))
    }

    /// Parse `if cond: block [else: block]`
    fn if_statement(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        keyword(input, "if")?;
        let condition = self.expression(input, depth)?;
        punct(input, ":")?;
        let then_block = self.block(input, depth + 1)?;

        // The innermost open `if` claims the `else`.
        let else_block = if peek_significant(input).is_some_and(|token| token.is_keyword("else")) {
            keyword(input, "else")?;
            punct(input, ":")?;
            Some(self.block(input, depth + 1)?)
        } else {
            None
        };

        Ok(Node::if_else(condition, then_block, else_block))
    }

    fn while_statement(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        keyword(input, "while")?;
        let condition = self.expression(input, depth)?;
        punct(input, ":")?;
        let body = self.block(input, depth + 1)?;
        Ok(Node::while_loop(condition, body))
    }

    fn for_statement(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        keyword(input, "for")?;
        let variable = identifier(input)?;
        keyword(input, "in")?;
        let iterable = self.expression(input, depth)?;
        punct(input, ":")?;
        let body = self.block(input, depth + 1)?;
        Ok(Node::for_loop(variable.lexeme(), iterable, body))
    }

    /// Parse `def name(params): block`
    fn function_def(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        keyword(input, "def")?;
        let name = identifier(input)?;
        punct(input, "(")?;
        let params = parameters(input)?;
        punct(input, ")")?;
        punct(input, ":")?;
        let body = self.block(input, depth + 1)?;
        Ok(Node::function_def(name.lexeme(), params, body))
    }

    fn print_statement(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        keyword(input, "print")?;
        punct(input, "(")?;
        let argument = self.expression(input, depth + 1)?;
        punct(input, ")")?;
        Ok(Node::print(argument))
    }

    fn return_statement(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        keyword(input, "return")?;
        let value = self.expression(input, depth)?;
        Ok(Node::return_value(value))
    }

    /// Parse a statement starting with a name: an assignment or a call.
    fn name_statement(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        let name = identifier(input)?;

        if next_is_punct(input, "=") {
            punct(input, "=")?;
            let value = self.expression(input, depth)?;
            Ok(Node::assign(name.lexeme(), value))
        } else if next_is_punct(input, "(") {
            self.call(input, name, depth)
        } else {
            Err(expected(input, Context::Label("`=` or `(`")))
        }
    }

    /// Parse the argument list of a call to `name`.
    fn call(&mut self, input: &mut Input<'t>, name: &Token, depth: usize) -> IResult<Node> {
        punct(input, "(")?;
        let args = self.arguments(input, depth + 1, ")")?;
        punct(input, ")")?;
        Ok(Node::function_call(name.lexeme(), args))
    }

    /// Parse comma separated expressions up to (not including) `close`.
    fn arguments(
        &mut self,
        input: &mut Input<'t>,
        depth: usize,
        close: &'static str,
    ) -> IResult<Vec<Node>> {
        let mut args = Vec::new();
        if next_is_punct(input, close) {
            return Ok(args);
        }
        loop {
            args.push(self.expression(input, depth)?);
            if !next_is_punct(input, ",") {
                break;
            }
            punct(input, ",")?;
        }
        Ok(args)
    }

    /// Parse an expression, then return to the state it was entered from.
    fn expression(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        let outer = self.state;
        self.transition(ParserState::InExpression);
        let result = self.binary_expression(input, depth, 0);
        self.transition(outer);
        result
    }

    /// Parse operands joined by infix operators binding at least `min_power`.
    fn binary_expression(
        &mut self,
        input: &mut Input<'t>,
        depth: usize,
        min_power: u8,
    ) -> IResult<Node> {
        let mut lhs = self.primary(input, depth)?;

        while let Some(op) =
            peek_significant(input).filter(|token| token.kind() == TokenKind::Operator)
        {
            let Some(power) = binary_binding_power(op.lexeme()) else {
                break;
            };
            if power.left < min_power {
                break;
            }
            significant(input)?;
            let rhs = self.binary_expression(input, depth + 1, power.right)?;
            lhs = Node::binary_op(op.lexeme(), lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parse an operand: a literal, a name, a call, a list or a parenthesized
    /// expression.
    fn primary(&mut self, input: &mut Input<'t>, depth: usize) -> IResult<Node> {
        if depth > self.max_depth {
            return Err(too_deep(input));
        }
        let Some(token) = peek_significant(input) else {
            return Err(expected(input, Context::Label("an expression")));
        };

        match token.kind() {
            TokenKind::Number => {
                significant(input)?;
                self.check_number(token);
                Ok(Node::value(token.lexeme()))
            }
            TokenKind::String => {
                significant(input)?;
                Ok(Node::value(token.lexeme()))
            }
            TokenKind::Identifier => {
                significant(input)?;
                if next_is_punct(input, "(") {
                    self.call(input, token, depth)
                } else {
                    Ok(Node::value(token.lexeme()))
                }
            }
            TokenKind::Delimiter if token.is_punct("(") => {
                significant(input)?;
                let inner = self.expression(input, depth + 1)?;
                punct(input, ")")?;
                Ok(inner)
            }
            TokenKind::Delimiter if token.is_punct("[") => self.list(input, depth, "[", "]"),
            TokenKind::Delimiter if token.is_punct("{") => self.list(input, depth, "{", "}"),
            _ => Err(expected(input, Context::Label("an expression"))),
        }
    }

    fn list(
        &mut self,
        input: &mut Input<'t>,
        depth: usize,
        open: &'static str,
        close: &'static str,
    ) -> IResult<Node> {
        punct(input, open)?;
        let elements = self.arguments(input, depth + 1, close)?;
        punct(input, close)?;
        Ok(Node::list(elements))
    }

    /// Report numbers with more than one decimal point.
    ///
    /// The literal is still accepted so the tree stays complete.
    fn check_number(&mut self, token: &Token) {
        if token.lexeme().matches('.').count() > 1 {
            let code = ErrorCode::E103;
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "malformed numeric literal '{}' at line {}",
                    token.lexeme(),
                    token.line()
                ))
                .with_code(code)
                .with_line(token.line())
                .with_label(token.span(), code.description())
                .with_help("a number has at most one decimal point"),
            );
        }
    }

    /// First significant token at or after the position `remaining` tokens
    /// before the end.
    fn token_at(&self, remaining: usize) -> Option<&'t Token> {
        let index = self.tokens.len().checked_sub(remaining)?;
        self.tokens
            .get(index..)?
            .iter()
            .find(|token| !token.kind().is_trivia())
    }

    /// Line and empty span used to report the end of input.
    fn end_of_input(&self) -> (usize, Span) {
        let line = self
            .tokens
            .iter()
            .rev()
            .find(|token| !token.kind().is_trivia())
            .map_or(1, Token::line);
        let end = self.tokens.last().map_or(0, |token| token.span().end());
        (line, Span::new(end..end))
    }

    /// Convert a parser error at `offending` into a diagnostic.
    fn diagnose(
        &self,
        err: ErrMode<ContextError<Context>>,
        offending: Option<&Token>,
        statement_start: Option<&Token>,
    ) -> Diagnostic {
        let context = match err {
            ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
            ErrMode::Incomplete(_) => ContextError::new(),
        };
        let too_deep = context
            .context()
            .any(|ctx| *ctx == Context::NestingTooDeep);
        let expected: Vec<String> = context.context().filter_map(Context::describe).collect();

        let (line, span) = match offending {
            Some(token) => (token.line(), token.span()),
            None => self.end_of_input(),
        };

        let code = match offending {
            _ if too_deep => ErrorCode::E102,
            None => ErrorCode::E101,
            Some(token) if token.kind() == TokenKind::Invalid => {
                if token.lexeme().starts_with(['\'', '"']) {
                    ErrorCode::E002
                } else {
                    ErrorCode::E001
                }
            }
            Some(_) => ErrorCode::E100,
        };

        let message = match (code, offending) {
            (ErrorCode::E102, _) => format!(
                "nesting deeper than {} levels at line {line}",
                self.max_depth
            ),
            (_, None) => format!("unexpected end of input at line {line}"),
            (ErrorCode::E002, Some(token)) => {
                format!("unterminated string {} at line {line}", token.lexeme())
            }
            (ErrorCode::E001, Some(token)) => {
                format!("unexpected character '{}' at line {line}", token.lexeme())
            }
            (_, Some(token)) => format!("unexpected token '{}' at line {line}", token.lexeme()),
        };

        let mut diagnostic = Diagnostic::error(message)
            .with_code(code)
            .with_line(line)
            .with_label(span, code.description());

        if let (None, Some(start)) = (offending, statement_start) {
            diagnostic = diagnostic.with_secondary_label(start.span(), "statement starts here");
        }
        if too_deep {
            diagnostic = diagnostic.with_help("split the construct into smaller pieces");
        } else if !expected.is_empty() {
            diagnostic = diagnostic.with_help(format!("expected {}", expected.join(" or ")));
        }
        diagnostic
    }
}

/// Outcome of a parse.
///
/// `success` is `false` exactly when `diagnostics` is non-empty. `ast` holds
/// the program whenever at least one top-level statement was built, even if
/// errors were recovered from along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub ast: Option<Node>,
}

impl ParseResult {
    /// Diagnostic messages in the order they were found.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|diagnostic| diagnostic.message().to_string())
            .collect()
    }

    /// Convert into a `Result`, treating any diagnostic as a failure.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] holding every diagnostic when the parse did
    /// not succeed.
    pub fn into_result(self) -> Result<Node, ParseError> {
        match (self.success, self.ast) {
            (true, Some(ast)) => Ok(ast),
            _ => Err(ParseError::new(self.diagnostics)),
        }
    }
}

/// Parser options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest block or expression nesting accepted before reporting
    /// [`ErrorCode::E102`].
    pub max_nesting_depth: usize,
}

impl ParserOptions {
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// A configured parser.
///
/// The parser always scans with newline tokens enabled, whatever the lexer
/// options say, and treats them as trivia.
#[derive(Debug, Clone)]
pub struct Parser {
    lexer: Lexer,
    options: ParserOptions,
}

impl Parser {
    pub fn new(table: LexicalTable, lexer_options: LexerOptions, options: ParserOptions) -> Self {
        Self {
            lexer: Lexer::new(table, lexer_options.with_newlines(true)),
            options,
        }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Tokenize and parse `source`.
    pub fn parse(&self, source: &str) -> ParseResult {
        let tokens = self.lexer.tokenize(source).tokens;
        parse_tokens(&tokens, self.options)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(
            LexicalTable::default(),
            LexerOptions::default(),
            ParserOptions::default(),
        )
    }
}

/// Parse an already scanned token list.
///
/// Newline and comment tokens may be present; they are skipped.
pub fn parse_tokens(tokens: &[Token], options: ParserOptions) -> ParseResult {
    debug!(tokens = tokens.len(); "Parsing tokens");

    let mut input = TokenSlice::new(tokens);
    let mut session = ParseSession::new(tokens, options.max_nesting_depth);
    let ast = session.program(&mut input);
    let diagnostics = session.finish();

    ParseResult {
        success: diagnostics.is_empty(),
        diagnostics,
        ast,
    }
}

/// Parse `source` with the default table and options.
pub fn parse(source: &str) -> ParseResult {
    Parser::default().parse(source)
}
