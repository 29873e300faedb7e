//! Token types produced by the Quill lexer.
//!
//! A [`Token`] pairs a [`TokenKind`] classification with the exact lexeme it
//! was scanned from and its position in the source, both as a 1-based
//! line/column pair (for display) and as a byte [`Span`] (for diagnostics).

use std::fmt;

use crate::span::Span;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier-shaped lexeme that is not a keyword.
    Identifier,
    /// Identifier-shaped lexeme found in the keyword set.
    Keyword,
    /// Run of digits and dots starting with a digit.
    Number,
    /// Quoted string literal, quotes included.
    String,
    /// Longest-match operator such as `+`, `//=` or `->`.
    Operator,
    /// Single punctuation character such as `(` or `,`.
    Delimiter,
    /// `#` line comment or triple-quoted block comment.
    Comment,
    /// End of a source line. Only produced on request.
    Newline,
    /// Unrecognized character or unterminated literal.
    Invalid,
}

impl TokenKind {
    /// All kinds, in declaration order.
    pub const ALL: [TokenKind; 9] = [
        TokenKind::Identifier,
        TokenKind::Keyword,
        TokenKind::Number,
        TokenKind::String,
        TokenKind::Operator,
        TokenKind::Delimiter,
        TokenKind::Comment,
        TokenKind::Newline,
        TokenKind::Invalid,
    ];

    /// Upper-case tag used when tokens are rendered for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Delimiter => "DELIMITER",
            TokenKind::Comment => "COMMENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Invalid => "INVALID",
        }
    }

    /// Returns `true` for tokens the grammar ignores (newlines and comments).
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified lexeme with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    line: usize,
    column: usize,
    span: Span,
}

impl Token {
    /// Create a new token.
    ///
    /// # Arguments
    ///
    /// * `kind` - Lexical category
    /// * `lexeme` - Exact source text of the token
    /// * `line` - 1-based line of the first character
    /// * `column` - 1-based character column of the first character
    /// * `span` - Byte range of the lexeme in the source
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        line: usize,
        column: usize,
        span: Span,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
            span,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// The `(line, column)` pair used to order tokens.
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Returns `true` if this is a keyword token with exactly this text.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == word
    }

    /// Returns `true` if this is an operator or delimiter with exactly this text.
    pub fn is_punct(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Operator | TokenKind::Delimiter) && self.lexeme == text
    }

    /// Number of characters in the lexeme.
    pub fn char_len(&self) -> usize {
        self.lexeme.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lexeme = match self.kind {
            TokenKind::Newline => "\\n".to_string(),
            _ => self.lexeme.escape_debug().to_string(),
        };
        write!(
            f,
            "{}('{}') at {}:{}",
            self.kind, lexeme, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_accessors() {
        let token = Token::new(TokenKind::Keyword, "while", 3, 5, Span::new(20..25));

        assert_eq!(token.kind(), TokenKind::Keyword);
        assert_eq!(token.lexeme(), "while");
        assert_eq!(token.position(), (3, 5));
        assert_eq!(token.span(), Span::new(20..25));
        assert!(token.is_keyword("while"));
        assert!(!token.is_keyword("if"));
        assert!(!token.is_punct("while"));
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Operator, "<=", 1, 3, Span::new(2..4));
        assert_eq!(token.to_string(), "OPERATOR('<=') at 1:3");

        let newline = Token::new(TokenKind::Newline, "\n", 2, 9, Span::new(10..11));
        assert_eq!(newline.to_string(), "NEWLINE('\\n') at 2:9");
    }

    #[test]
    fn test_char_len_counts_characters() {
        let token = Token::new(TokenKind::String, "'héllo'", 1, 1, Span::new(0..8));
        assert_eq!(token.char_len(), 7);
    }

    #[test]
    fn test_trivia_kinds() {
        let trivia: Vec<_> = TokenKind::ALL.iter().filter(|k| k.is_trivia()).collect();
        assert_eq!(trivia, [&TokenKind::Comment, &TokenKind::Newline]);
    }
}
