//! Token kinds, tokens and the per-stage output record
use crate::utils::{OffsetMap, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// `// ...` or `/* ... */`
    Comment,
    /// A maximal run of whitespace
    Whitespace,
    StringLiteral,
    CharLiteral,
    HexInt,
    BinInt,
    OctInt,
    DecInt,
    Float,
    Bool,
    /// Reserved word of the active language profile
    Keyword,
    Identifier,
    Operator,
    Punctuator,
    /// Text no rule could classify, or a candidate demoted by a skip set
    Unknown,
}

impl TokenKind {
    /// Every kind, in declaration order
    pub const ALL: [TokenKind; 15] = [
        TokenKind::Comment,
        TokenKind::Whitespace,
        TokenKind::StringLiteral,
        TokenKind::CharLiteral,
        TokenKind::HexInt,
        TokenKind::BinInt,
        TokenKind::OctInt,
        TokenKind::DecInt,
        TokenKind::Float,
        TokenKind::Bool,
        TokenKind::Keyword,
        TokenKind::Identifier,
        TokenKind::Operator,
        TokenKind::Punctuator,
        TokenKind::Unknown,
    ];

    /// Short display label, also used as the serialized name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::Whitespace => "whitespace",
            Self::StringLiteral => "string-literal",
            Self::CharLiteral => "char-literal",
            Self::HexInt => "hex-int",
            Self::BinInt => "bin-int",
            Self::OctInt => "oct-int",
            Self::DecInt => "dec-int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::Operator => "operator",
            Self::Punctuator => "punctuator",
            Self::Unknown => "unknown",
        }
    }

    /// Check if this kind is a literal constant
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Self::StringLiteral
                | Self::CharLiteral
                | Self::HexInt
                | Self::BinInt
                | Self::OctInt
                | Self::DecInt
                | Self::Float
                | Self::Bool
        )
    }

    /// Check if this kind is an integer constant of any radix
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::HexInt | Self::BinInt | Self::OctInt | Self::DecInt
        )
    }

    /// Check if this kind came from the symbol table
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Operator | Self::Punctuator)
    }

    /// Check if this kind is a word (keyword or identifier)
    pub fn is_word(&self) -> bool {
        matches!(self, Self::Keyword | Self::Identifier)
    }

    /// Comments and whitespace are removed rather than reported
    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment | Self::Whitespace)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified lexeme with its span in the text it was scanned from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub lexeme: String,
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a token for `span` of `text`
    pub fn new(kind: TokenKind, text: &str, span: Span) -> Self {
        Self {
            lexeme: span.slice(text).to_string(),
            kind,
            span,
        }
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} @ {}", self.kind, self.lexeme, self.span)
    }
}

/// What a stage produced: the text for the next stage and the tokens it found
///
/// Token spans index the stage's *input* text. `origin` maps offsets of
/// `text` back to the input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageOutput {
    pub text: String,
    pub tokens: Vec<Token>,
    #[serde(skip)]
    pub origin: OffsetMap,
}

impl StageOutput {
    /// Output of a stage that hands its input through unchanged
    pub fn passthrough(text: &str, tokens: Vec<Token>) -> Self {
        Self {
            text: text.to_string(),
            tokens,
            origin: OffsetMap::identity(text.len()),
        }
    }

    /// Tokens that were actually classified (everything except `Unknown`)
    pub fn found(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.kind != TokenKind::Unknown)
    }

    /// Tokens of one kind
    pub fn of_kind(&self, kind: TokenKind) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |t| t.kind == kind)
    }

    /// Lexemes of one kind, in order
    pub fn lexemes(&self, kind: TokenKind) -> Vec<&str> {
        self.of_kind(kind).map(|t| t.lexeme.as_str()).collect()
    }

    /// Keep only tokens matching `keep`
    pub fn retain_tokens<F>(&mut self, keep: F)
    where
        F: FnMut(&Token) -> bool,
    {
        self.tokens.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_categories() {
        let constants: Vec<_> = TokenKind::ALL.iter().filter(|k| k.is_constant()).collect();
        assert_eq!(constants.len(), 8);
        assert!(TokenKind::HexInt.is_integer());
        assert!(!TokenKind::Float.is_integer());
        assert!(TokenKind::Punctuator.is_symbol());
        assert!(TokenKind::Identifier.is_word());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Unknown.is_constant());
    }

    #[test]
    fn test_kind_serializes_as_label() {
        for kind in TokenKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.label()));
        }
    }

    #[test]
    fn test_token_takes_lexeme_from_span() {
        let token = Token::new(TokenKind::DecInt, "x = 42;", Span::new(4, 6));
        assert_eq!(token.lexeme, "42");
        assert_eq!(token.len(), 2);
        assert_eq!(token.to_string(), "dec-int \"42\" @ 4..6");
    }

    #[test]
    fn test_stage_output_queries() {
        let text = "a 1 @";
        let output = StageOutput::passthrough(
            text,
            vec![
                Token::new(TokenKind::DecInt, text, Span::new(2, 3)),
                Token::new(TokenKind::Unknown, text, Span::new(4, 5)),
            ],
        );
        assert_eq!(output.found().count(), 1);
        assert_eq!(output.lexemes(TokenKind::DecInt), vec!["1"]);
        assert_eq!(output.of_kind(TokenKind::Unknown).count(), 1);
        assert!(output.origin.is_identity());
    }
}
