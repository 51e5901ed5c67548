//! Stage 6: operator and punctuator tokenization

use super::literals::SkipSet;
use super::scanner::{char_at, ident_run_end, is_ident_char, is_layout, numeric_len_at};
use crate::grammar::{SymbolClass, SymbolTable};
use crate::tokens::{StageOutput, Token, TokenKind};
use crate::utils::Span;

/// Tokenize every operator and punctuator of `text` outside `skip`
///
/// At each position the longest symbol of `table` wins. Words, numeric
/// literals and whitespace are stepped over. Any other character is
/// reported as a one-character `Unknown` token.
pub fn classify_symbols(text: &str, skip: &SkipSet, table: &SymbolTable) -> StageOutput {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = char_at(text, pos) {
        if let Some(span) = skip.span_containing(pos) {
            pos = span.end;
            continue;
        }
        if is_layout(c) {
            pos += 1;
            continue;
        }
        if let Some(len) = numeric_len_at(text, pos) {
            pos += len;
            continue;
        }
        if is_ident_char(c) {
            pos = ident_run_end(text, pos);
            continue;
        }

        let (len, kind) = match table.longest_match(&bytes[pos..]) {
            Some((len, SymbolClass::Operator)) => (len, TokenKind::Operator),
            Some((len, SymbolClass::Punctuator)) => (len, TokenKind::Punctuator),
            None => (c.len_utf8(), TokenKind::Unknown),
        };
        tokens.push(Token::new(kind, text, Span::at(pos, len)));
        pos += len;
    }

    StageOutput::passthrough(text, tokens)
}
