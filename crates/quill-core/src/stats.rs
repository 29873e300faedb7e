//! Token frequency statistics.
//!
//! [`TokenStatistics`] is an ordered map from [`StatCategory`] to a count.
//! Every category has exactly one definition in terms of the tokens of a
//! scan, so the totals can always be recomputed from a token list with
//! [`TokenStatistics::from_tokens`].

use std::fmt;

use indexmap::IndexMap;

use crate::token::{Token, TokenKind};

/// A statistic reported for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    /// Characters inside `Number` tokens.
    NumericChars,
    /// Characters inside `Operator` and `Delimiter` tokens.
    SpecialChars,
    /// `Keyword` tokens.
    Keywords,
    /// `Invalid` tokens.
    InvalidTokens,
    /// `Comment` tokens.
    Comments,
    /// `Operator` tokens.
    Operators,
}

impl StatCategory {
    /// All categories, in display order.
    pub const ALL: [StatCategory; 6] = [
        StatCategory::NumericChars,
        StatCategory::SpecialChars,
        StatCategory::Keywords,
        StatCategory::InvalidTokens,
        StatCategory::Comments,
        StatCategory::Operators,
    ];

    /// Stable snake_case name of the category.
    pub fn name(&self) -> &'static str {
        match self {
            StatCategory::NumericChars => "numeric_chars",
            StatCategory::SpecialChars => "special_chars",
            StatCategory::Keywords => "keywords",
            StatCategory::InvalidTokens => "invalid_tokens",
            StatCategory::Comments => "comments",
            StatCategory::Operators => "operators",
        }
    }

    /// How much a single token contributes to this category.
    pub fn contribution(&self, token: &Token) -> usize {
        match (self, token.kind()) {
            (StatCategory::NumericChars, TokenKind::Number) => token.char_len(),
            (StatCategory::SpecialChars, TokenKind::Operator | TokenKind::Delimiter) => {
                token.char_len()
            }
            (StatCategory::Keywords, TokenKind::Keyword)
            | (StatCategory::InvalidTokens, TokenKind::Invalid)
            | (StatCategory::Comments, TokenKind::Comment)
            | (StatCategory::Operators, TokenKind::Operator) => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts accumulated over one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatistics {
    counts: IndexMap<StatCategory, usize>,
}

impl TokenStatistics {
    /// Create statistics with every category at zero.
    pub fn new() -> Self {
        Self {
            counts: StatCategory::ALL.iter().map(|&c| (c, 0)).collect(),
        }
    }

    /// Compute statistics for an already scanned token list.
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> Self {
        let mut stats = Self::new();
        for token in tokens {
            stats.record(token);
        }
        stats
    }

    /// Add one token's contribution to every category.
    pub fn record(&mut self, token: &Token) {
        for (category, count) in self.counts.iter_mut() {
            *count += category.contribution(token);
        }
    }

    /// Count for a category.
    pub fn get(&self, category: StatCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or_default()
    }

    /// Iterate `(category, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (StatCategory, usize)> + '_ {
        self.counts.iter().map(|(&category, &count)| (category, count))
    }
}

impl Default for TokenStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TokenStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (category, count) in self.iter() {
            writeln!(f, "{category}: {count}")?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::span::Span;

    // ===================
    // Strategies
    // ===================

    fn kind_strategy() -> impl Strategy<Value = TokenKind> {
        prop_oneof![
            Just(TokenKind::Identifier),
            Just(TokenKind::Keyword),
            Just(TokenKind::Number),
            Just(TokenKind::String),
            Just(TokenKind::Operator),
            Just(TokenKind::Delimiter),
            Just(TokenKind::Comment),
            Just(TokenKind::Newline),
            Just(TokenKind::Invalid),
        ]
    }

    fn token_strategy() -> impl Strategy<Value = Token> {
        (kind_strategy(), "[a-z0-9.+=é]{1,6}").prop_map(|(kind, lexeme)| {
            let len = lexeme.len();
            Token::new(kind, lexeme, 1, 1, Span::new(0..len))
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every category total is the sum of the per-token contributions.
    fn check_totals_are_sums(tokens: &[Token]) -> Result<(), TestCaseError> {
        let stats = TokenStatistics::from_tokens(tokens);

        for category in StatCategory::ALL {
            let expected: usize = tokens.iter().map(|t| category.contribution(t)).sum();
            prop_assert_eq!(stats.get(category), expected);
        }
        Ok(())
    }

    /// Totals do not depend on the order tokens are recorded in.
    fn check_order_independent(tokens: &[Token]) -> Result<(), TestCaseError> {
        let forward = TokenStatistics::from_tokens(tokens);
        let backward = TokenStatistics::from_tokens(tokens.iter().rev());

        prop_assert_eq!(forward, backward);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn totals_are_sums(tokens in prop::collection::vec(token_strategy(), 0..40)) {
            check_totals_are_sums(&tokens)?;
        }

        #[test]
        fn order_independent(tokens in prop::collection::vec(token_strategy(), 0..40)) {
            check_order_independent(&tokens)?;
        }
    }
}
