//! Lexical analyzer for Quill source text.
//!
//! The lexer converts source text into a list of [`Token`]s together with
//! the [`TokenStatistics`] of the scan. It is total: text it cannot classify
//! becomes [`TokenKind::Invalid`] tokens and scanning continues.
//!
//! Scanning is line oriented. Each line is scanned with winnow combinators
//! over a [`LocatingSlice`], and the only state that crosses a line
//! boundary is an explicit `ScanState`, which records whether a
//! triple-quoted block comment is still open.
//!
//! The public entry points are [`tokenize`] and [`Lexer::tokenize`].

use log::{debug, trace};
use serde::Deserialize;
use winnow::{
    Parser as _,
    combinator::alt,
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, one_of, rest, take_until, take_while},
};

use quill_core::{
    span::Span,
    stats::TokenStatistics,
    token::{Token, TokenKind},
};

use crate::lexical_table::LexicalTable;

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError>;

const TRIPLE_SINGLE: &str = "'''";
const TRIPLE_DOUBLE: &str = "\"\"\"";

/// What to do with a string or block comment still open when its line (or
/// the input) ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnterminatedStringPolicy {
    /// Emit the text as one [`TokenKind::Invalid`] token.
    #[default]
    Invalid,
    /// Keep the text as the token it would have been if closed.
    Truncate,
}

impl UnterminatedStringPolicy {
    fn kind_for(self, closed: TokenKind) -> TokenKind {
        match self {
            UnterminatedStringPolicy::Invalid => TokenKind::Invalid,
            UnterminatedStringPolicy::Truncate => closed,
        }
    }
}

/// Options controlling a [`Lexer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Emit a [`TokenKind::Newline`] token at the end of every line
    /// terminated by `\n`.
    pub emit_newlines: bool,
    pub unterminated_strings: UnterminatedStringPolicy,
}

impl LexerOptions {
    pub fn with_newlines(mut self, emit_newlines: bool) -> Self {
        self.emit_newlines = emit_newlines;
        self
    }

    pub fn with_unterminated_strings(mut self, policy: UnterminatedStringPolicy) -> Self {
        self.unterminated_strings = policy;
        self
    }
}

/// Tokens and statistics produced by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalAnalysis {
    pub tokens: Vec<Token>,
    pub statistics: TokenStatistics,
}

impl LexicalAnalysis {
    pub fn into_parts(self) -> (Vec<Token>, TokenStatistics) {
        (self.tokens, self.statistics)
    }
}

/// A configured lexer.
///
/// Holds only immutable configuration; every call to [`Lexer::tokenize`]
/// keeps its scan state on the stack.
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    table: LexicalTable,
    options: LexerOptions,
}

impl Lexer {
    pub fn new(table: LexicalTable, options: LexerOptions) -> Self {
        Self { table, options }
    }

    pub fn table(&self) -> &LexicalTable {
        &self.table
    }

    pub fn options(&self) -> LexerOptions {
        self.options
    }

    /// Scan `source` into tokens and statistics.
    pub fn tokenize(&self, source: &str) -> LexicalAnalysis {
        debug!(
            bytes = source.len(),
            emit_newlines = self.options.emit_newlines;
            "Tokenizing source"
        );

        let mut scanner = LineScanner::new(&self.table, self.options);
        let mut state = ScanState::Normal;
        for line in source_lines(source) {
            state = scanner.scan_line(&line, state);
        }
        let analysis = scanner.finish(state);

        debug!(tokens = analysis.tokens.len(); "Tokenizing finished");
        analysis
    }
}

/// Scan `source` with the default table and options.
///
/// Newline tokens are not emitted; this is the display path.
pub fn tokenize(source: &str) -> (Vec<Token>, TokenStatistics) {
    Lexer::default().tokenize(source).into_parts()
}

/// Scanner state carried from one line to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum ScanState {
    #[default]
    Normal,
    InMultiline(OpenBlock),
}

/// A triple-quoted block comment whose closing delimiter has not been seen.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenBlock {
    delimiter: &'static str,
    text: String,
    line: usize,
    column: usize,
    /// Source covered so far, from the opening delimiter.
    span: Span,
}

/// One physical line of the source, without its `\n`.
#[derive(Debug, Clone, Copy)]
struct SourceLine<'a> {
    text: &'a str,
    number: usize,
    offset: usize,
    terminated: bool,
}

impl SourceLine<'_> {
    /// Span of the line from byte `from`, including its `\n` if any.
    fn tail_span(&self, from: usize) -> Span {
        let end = self.offset + self.text.len() + usize::from(self.terminated);
        Span::new(self.offset + from..end)
    }
}

fn source_lines(source: &str) -> impl Iterator<Item = SourceLine<'_>> {
    source
        .split_inclusive('\n')
        .enumerate()
        .scan(0, |offset, (index, piece)| {
            let line = SourceLine {
                text: piece.strip_suffix('\n').unwrap_or(piece),
                number: index + 1,
                offset: *offset,
                terminated: piece.ends_with('\n'),
            };
            *offset += piece.len();
            Some(line)
        })
}

/// 1-based character column of byte offset `at` in `text`.
fn column(text: &str, at: usize) -> usize {
    text.get(..at).map_or(1, |prefix| prefix.chars().count() + 1)
}

/// A lexeme recognized at the start of the remaining line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme<'a> {
    Whitespace,
    Token(TokenKind, &'a str),
    /// A block comment opened on this line and still open at its end.
    OpenBlock(&'static str, &'a str),
}

fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    take_while(1.., char::is_whitespace)
        .value(Lexeme::Whitespace)
        .parse_next(input)
}

/// Parse a `#` comment running to the end of the line.
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    ('#', rest)
        .take()
        .map(|text| Lexeme::Token(TokenKind::Comment, text))
        .parse_next(input)
}

fn block_delimiter(input: &mut Input<'_>) -> IResult<&'static str> {
    alt((
        literal(TRIPLE_SINGLE).value(TRIPLE_SINGLE),
        literal(TRIPLE_DOUBLE).value(TRIPLE_DOUBLE),
    ))
    .parse_next(input)
}

/// Consume up to and including `delimiter`, or the rest of the line.
///
/// Returns `true` if the delimiter was found.
fn block_tail(input: &mut Input<'_>, delimiter: &'static str) -> IResult<bool> {
    alt((
        (take_until(0.., delimiter), delimiter).value(true),
        rest.value(false),
    ))
    .parse_next(input)
}

fn block_body(input: &mut Input<'_>) -> IResult<(&'static str, bool)> {
    let delimiter = block_delimiter(input)?;
    let closed = block_tail(input, delimiter)?;
    Ok((delimiter, closed))
}

/// Parse a triple-quoted block comment, which may stay open past the line.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    let ((delimiter, closed), text) = block_body.with_taken().parse_next(input)?;
    Ok(if closed {
        Lexeme::Token(TokenKind::Comment, text)
    } else {
        Lexeme::OpenBlock(delimiter, text)
    })
}

fn quote(input: &mut Input<'_>) -> IResult<char> {
    one_of(['\'', '"']).parse_next(input)
}

/// Consume a quoted string up to its matching quote or the end of the line.
///
/// A backslash skips the character after it. Returns `true` if the string
/// was closed.
fn quoted_body(input: &mut Input<'_>) -> IResult<bool> {
    let opening = quote(input)?;
    while let Some(c) = input.next_token() {
        if c == '\\' {
            input.next_token();
        } else if c == opening {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Parse an identifier-shaped word.
fn word<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// Parse a run of digits and dots starting with a digit.
fn number<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    (
        one_of(|c: char| c.is_ascii_digit()),
        take_while(0.., |c: char| c.is_ascii_digit() || c == '.'),
    )
        .take()
        .map(|text| Lexeme::Token(TokenKind::Number, text))
        .parse_next(input)
}

fn unexpected_char<'a>(input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
    any.take()
        .map(|text| Lexeme::Token(TokenKind::Invalid, text))
        .parse_next(input)
}

/// Per-call scanner that accumulates tokens and statistics.
struct LineScanner<'l> {
    table: &'l LexicalTable,
    options: LexerOptions,
    tokens: Vec<Token>,
    statistics: TokenStatistics,
}

impl<'l> LineScanner<'l> {
    fn new(table: &'l LexicalTable, options: LexerOptions) -> Self {
        Self {
            table,
            options,
            tokens: Vec::new(),
            statistics: TokenStatistics::new(),
        }
    }

    fn string<'a>(&self, input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
        let (closed, text) = quoted_body.with_taken().parse_next(input)?;
        let kind = if closed {
            TokenKind::String
        } else {
            self.options
                .unterminated_strings
                .kind_for(TokenKind::String)
        };
        Ok(Lexeme::Token(kind, text))
    }

    fn identifier_or_keyword<'a>(&self, input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
        word.map(|text| Lexeme::Token(self.table.classify_word(text), text))
            .parse_next(input)
    }

    /// Parse the longest operator in the table that prefixes the input.
    fn operator<'a>(&self, input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
        let remaining: &'a str = **input;
        match self.table.longest_operator(remaining) {
            Some(op) => literal(op)
                .map(|text| Lexeme::Token(TokenKind::Operator, text))
                .parse_next(input),
            None => Err(ErrMode::Backtrack(ContextError::new())),
        }
    }

    fn delimiter<'a>(&self, input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
        one_of(|c: char| self.table.is_delimiter(c))
            .take()
            .map(|text| Lexeme::Token(TokenKind::Delimiter, text))
            .parse_next(input)
    }

    fn next_lexeme<'a>(&self, input: &mut Input<'a>) -> IResult<Lexeme<'a>> {
        alt((
            whitespace,
            line_comment,
            block_comment, // Must come before string
            |input: &mut Input<'a>| self.string(input),
            |input: &mut Input<'a>| self.identifier_or_keyword(input),
            number,
            |input: &mut Input<'a>| self.operator(input), // Must come before delimiter
            |input: &mut Input<'a>| self.delimiter(input),
            unexpected_char,
        ))
        .parse_next(input)
    }

    fn record(&mut self, token: Token) {
        trace!(token:% = token; "Token scanned");
        self.statistics.record(&token);
        self.tokens.push(token);
    }

    /// Record a token found at byte `at` and character column `column` of `line`.
    fn push(
        &mut self,
        kind: TokenKind,
        text: &str,
        line: &SourceLine<'_>,
        at: usize,
        column: usize,
    ) {
        let start = line.offset + at;
        self.record(Token::new(
            kind,
            text,
            line.number,
            column,
            Span::new(start..start + text.len()),
        ));
    }

    fn scan_line(&mut self, line: &SourceLine<'_>, state: ScanState) -> ScanState {
        let state = match state {
            ScanState::Normal => self.scan_segment(line, 0),
            ScanState::InMultiline(block) => self.continue_block(line, block),
        };

        if state == ScanState::Normal && line.terminated && self.options.emit_newlines {
            let end = line.text.len();
            self.push(TokenKind::Newline, "\n", line, end, column(line.text, end));
        }
        state
    }

    /// Look for the closing delimiter of `block` on this line.
    fn continue_block(&mut self, line: &SourceLine<'_>, mut block: OpenBlock) -> ScanState {
        let Some(end) = line
            .text
            .find(block.delimiter)
            .map(|index| index + block.delimiter.len())
        else {
            block.text.push_str(line.text);
            if line.terminated {
                block.text.push('\n');
            }
            block.span = block.span.union(line.tail_span(0));
            return ScanState::InMultiline(block);
        };

        block.text.push_str(&line.text[..end]);
        trace!(opened_at = block.line, closed_at = line.number; "Block comment closed");
        let span = block
            .span
            .union(Span::new(line.offset..line.offset + end));
        self.record(Token::new(
            TokenKind::Comment,
            block.text,
            block.line,
            block.column,
            span,
        ));
        self.scan_segment(line, end)
    }

    /// Scan `line` from byte offset `from` to its end.
    ///
    /// The character column is carried along with the cursor so a long line
    /// is counted once.
    fn scan_segment(&mut self, line: &SourceLine<'_>, from: usize) -> ScanState {
        let Some(segment) = line.text.get(from..) else {
            return ScanState::Normal;
        };
        let mut input = LocatingSlice::new(segment);
        let mut next_column = column(line.text, from);

        while !input.is_empty() {
            let offset = input.current_token_start();
            let at = from + offset;
            let lexeme = self.next_lexeme(&mut input);
            let token_column = next_column;
            next_column += segment
                .get(offset..input.current_token_start())
                .map_or(0, |consumed| consumed.chars().count());

            match lexeme {
                Ok(Lexeme::Whitespace) => {}
                Ok(Lexeme::Token(kind, text)) => self.push(kind, text, line, at, token_column),
                Ok(Lexeme::OpenBlock(delimiter, text)) => {
                    trace!(line = line.number; "Block comment opened");
                    let mut text = text.to_string();
                    if line.terminated {
                        text.push('\n');
                    }
                    return ScanState::InMultiline(OpenBlock {
                        delimiter,
                        text,
                        line: line.number,
                        column: token_column,
                        span: line.tail_span(at),
                    });
                }
                Err(err) => {
                    // `unexpected_char` accepts any character, so only an
                    // empty segment can get here.
                    debug!(line = line.number, err:? = err; "Lexeme scan failed");
                    break;
                }
            }
        }
        ScanState::Normal
    }

    /// Flush a block comment left open at end of input and return the result.
    fn finish(mut self, state: ScanState) -> LexicalAnalysis {
        if let ScanState::InMultiline(block) = state {
            debug!(line = block.line; "Block comment still open at end of input");
            let kind = self
                .options
                .unterminated_strings
                .kind_for(TokenKind::Comment);
            self.record(Token::new(
                kind,
                block.text,
                block.line,
                block.column,
                block.span,
            ));
        }
        LexicalAnalysis {
            tokens: self.tokens,
            statistics: self.statistics,
        }
    }
}
