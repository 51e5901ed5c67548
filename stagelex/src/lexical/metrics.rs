//! Per-kind token tallies for the summary tables

use crate::tokens::{Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Token counts accumulated across one or more stages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetrics {
    pub counts: BTreeMap<TokenKind, usize>,
    pub total_tokens: usize,
    /// Longest lexeme seen, excluding trivia
    pub longest_lexeme: Option<String>,
    pub comment_bytes_removed: usize,
}

impl TokenMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_token(&mut self, token: &Token) {
        *self.counts.entry(token.kind).or_insert(0) += 1;
        self.total_tokens += 1;

        if token.kind == TokenKind::Comment {
            self.comment_bytes_removed += token.len();
        }
        if !token.kind.is_trivia() {
            let longer = self
                .longest_lexeme
                .as_ref()
                .map_or(true, |current| token.lexeme.len() > current.len());
            if longer {
                self.longest_lexeme = Some(token.lexeme.clone());
            }
        }
    }

    pub fn record_tokens<'a, I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = &'a Token>,
    {
        for token in tokens {
            self.record_token(token);
        }
    }

    pub fn count(&self, kind: TokenKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Number of constants of every radix and type
    pub fn constant_count(&self) -> usize {
        self.sum_where(TokenKind::is_constant)
    }

    pub fn symbol_count(&self) -> usize {
        self.sum_where(TokenKind::is_symbol)
    }

    pub fn word_count(&self) -> usize {
        self.sum_where(TokenKind::is_word)
    }

    fn sum_where(&self, predicate: fn(&TokenKind) -> bool) -> usize {
        self.counts
            .iter()
            .filter(|(kind, _)| predicate(kind))
            .map(|(_, count)| count)
            .sum()
    }

    /// Non-zero counts in kind order
    pub fn rows(&self) -> impl Iterator<Item = (TokenKind, usize)> + '_ {
        TokenKind::ALL
            .iter()
            .map(|kind| (*kind, self.count(*kind)))
            .filter(|(_, count)| *count > 0)
    }

    pub fn merge(&mut self, other: &TokenMetrics) {
        for (kind, count) in &other.counts {
            *self.counts.entry(*kind).or_insert(0) += count;
        }
        self.total_tokens += other.total_tokens;
        self.comment_bytes_removed += other.comment_bytes_removed;
        if let Some(lexeme) = &other.longest_lexeme {
            let longer = self
                .longest_lexeme
                .as_ref()
                .map_or(true, |current| lexeme.len() > current.len());
            if longer {
                self.longest_lexeme = Some(lexeme.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::new(0, text.len()))
    }

    #[test]
    fn test_counts_by_kind() {
        let mut metrics = TokenMetrics::new();
        metrics.record_tokens(&[
            token(TokenKind::Keyword, "int"),
            token(TokenKind::Identifier, "counter"),
            token(TokenKind::DecInt, "5"),
            token(TokenKind::Float, "1.5e3"),
            token(TokenKind::Operator, "="),
            token(TokenKind::Comment, "// a long comment"),
        ]);

        assert_eq!(metrics.total_tokens, 6);
        assert_eq!(metrics.count(TokenKind::Keyword), 1);
        assert_eq!(metrics.count(TokenKind::Bool), 0);
        assert_eq!(metrics.constant_count(), 2);
        assert_eq!(metrics.word_count(), 2);
        assert_eq!(metrics.symbol_count(), 1);
        assert_eq!(metrics.comment_bytes_removed, 17);
        assert_eq!(metrics.longest_lexeme.as_deref(), Some("counter"));
        assert_eq!(metrics.rows().count(), 6);
    }

    #[test]
    fn test_merge() {
        let mut a = TokenMetrics::new();
        a.record_token(&token(TokenKind::Identifier, "x"));
        let mut b = TokenMetrics::new();
        b.record_token(&token(TokenKind::Identifier, "longer"));
        b.record_token(&token(TokenKind::Punctuator, ";"));

        a.merge(&b);
        assert_eq!(a.count(TokenKind::Identifier), 2);
        assert_eq!(a.total_tokens, 3);
        assert_eq!(a.longest_lexeme.as_deref(), Some("longer"));
    }
}
