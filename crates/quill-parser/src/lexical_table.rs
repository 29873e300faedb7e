//! The single lexical table shared by the display lexer and the parser.
//!
//! A [`LexicalTable`] decides how identifier-shaped words and punctuation
//! are classified. Both tokenizing paths use the same table, so a lexeme is
//! classified the same way whether it is shown to the user or fed to the
//! grammar.

use indexmap::IndexSet;
use thiserror::Error;

use quill_core::token::TokenKind;

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else", "except",
    "False", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "None",
    "nonlocal", "not", "or", "pass", "raise", "return", "True", "try", "while", "with", "yield",
    // Reserved by the grammar's `print(...)` statement.
    "print",
];

const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "//", "%", "**", "=", "+=", "-=", "*=", "/=", "//=", "%=", "**=", "==",
    "!=", ">", "<", ">=", "<=", "->",
];

const DELIMITERS: &[char] = &['(', ')', '[', ']', '{', '}', ':', ',', '.', ';', '@'];

/// Errors raised while extending a lexical table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("keyword `{0}` is not identifier-shaped")]
    InvalidKeyword(String),
}

/// Keyword, operator and delimiter sets used to classify lexemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalTable {
    keywords: IndexSet<String>,
    operators: IndexSet<String>,
    delimiters: IndexSet<char>,
    longest_operator: usize,
}

impl LexicalTable {
    /// The table for the analyzed Python-like language.
    pub fn python() -> Self {
        let operators: IndexSet<String> = OPERATORS.iter().map(|op| op.to_string()).collect();
        let longest_operator = operators.iter().map(String::len).max().unwrap_or(0);
        Self {
            keywords: KEYWORDS.iter().map(|kw| kw.to_string()).collect(),
            operators,
            delimiters: DELIMITERS.iter().copied().collect(),
            longest_operator,
        }
    }

    /// Add keywords to the table.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidKeyword`] for a word the identifier rule
    /// could never produce, since such a keyword would never match.
    pub fn with_keywords<I, S>(mut self, words: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for word in words {
            let word = word.into();
            if !is_identifier_shaped(&word) {
                return Err(TableError::InvalidKeyword(word));
            }
            self.keywords.insert(word);
        }
        Ok(self)
    }

    /// Returns `true` if `word` is a keyword.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(word)
    }

    /// Classify an identifier-shaped word.
    pub fn classify_word(&self, word: &str) -> TokenKind {
        if self.is_keyword(word) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        }
    }

    /// Returns `true` if `c` is a delimiter character.
    pub fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.contains(&c)
    }

    /// The longest operator that is a prefix of `input`, if any.
    pub fn longest_operator(&self, input: &str) -> Option<&str> {
        (1..=self.longest_operator.min(input.len()))
            .rev()
            .filter_map(|len| input.get(..len))
            .find_map(|prefix| self.operators.get(prefix).map(String::as_str))
    }

    /// Keywords in table order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl Default for LexicalTable {
    fn default() -> Self {
        Self::python()
    }
}

fn is_identifier_shaped(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word() {
        let table = LexicalTable::python();

        assert_eq!(table.classify_word("if"), TokenKind::Keyword);
        assert_eq!(table.classify_word("print"), TokenKind::Keyword);
        assert_eq!(table.classify_word("None"), TokenKind::Keyword);
        assert_eq!(table.classify_word("none"), TokenKind::Identifier);
        assert_eq!(table.classify_word("iffy"), TokenKind::Identifier);
    }

    #[test]
    fn test_longest_operator_prefers_longest_match() {
        let table = LexicalTable::python();

        assert_eq!(table.longest_operator("//= 2"), Some("//="));
        assert_eq!(table.longest_operator("**x"), Some("**"));
        assert_eq!(table.longest_operator("->"), Some("->"));
        assert_eq!(table.longest_operator("!="), Some("!="));
        assert_eq!(table.longest_operator("=="), Some("=="));
        assert_eq!(table.longest_operator("<"), Some("<"));
    }

    #[test]
    fn test_longest_operator_rejects_non_operators() {
        let table = LexicalTable::python();

        assert_eq!(table.longest_operator("!x"), None);
        assert_eq!(table.longest_operator("("), None);
        assert_eq!(table.longest_operator(""), None);
        // Multi-byte character right after a valid prefix length
        assert_eq!(table.longest_operator("é+"), None);
    }

    #[test]
    fn test_delimiters() {
        let table = LexicalTable::python();

        for c in ['(', ')', '[', ']', '{', '}', ':', ',', '.', ';', '@'] {
            assert!(table.is_delimiter(c), "{c} should be a delimiter");
        }
        assert!(!table.is_delimiter('$'));
    }

    #[test]
    fn test_with_keywords() {
        let table = LexicalTable::python()
            .with_keywords(["match", "case"])
            .expect("identifier-shaped keywords are accepted");

        assert!(table.is_keyword("match"));
        assert_eq!(table.keywords().last(), Some("case"));

        let err = LexicalTable::python().with_keywords(["not-a-word"]);
        assert_eq!(
            err,
            Err(TableError::InvalidKeyword("not-a-word".to_string()))
        );
    }
}
