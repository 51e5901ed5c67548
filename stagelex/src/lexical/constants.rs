//! Stage 4: constant classification
//!
//! Walks the text once, trying the priority-ordered rules of
//! [`CONSTANT_RULES`](crate::grammar::CONSTANT_RULES) at every position.
//! A match starting inside the skip set is reported as `Unknown`.

use super::literals::SkipSet;
use super::scanner::{char_at, char_before, ident_run_end, is_ident_char};
use crate::grammar::rules::match_constant;
use crate::tokens::{StageOutput, Token, TokenKind};
use crate::utils::Span;

/// Tokenize every literal constant of `text`
///
/// `skip` holds spans whose constants were already accounted for (the char
/// literals of range idioms). Identifier runs are stepped over whole, so the
/// `1F` of `x1F` is never a number.
pub fn classify_constants(text: &str, skip: &SkipSet) -> StageOutput {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = char_at(text, pos) {
        if let Some((rule, len)) = match_constant(&text[pos..], char_before(text, pos)) {
            let kind = if skip.contains(pos) {
                TokenKind::Unknown
            } else {
                rule.kind
            };
            tokens.push(Token::new(kind, text, Span::at(pos, len)));
            pos += len;
        } else if is_ident_char(c) {
            pos = ident_run_end(text, pos);
        } else {
            pos += c.len_utf8();
        }
    }

    StageOutput::passthrough(text, tokens)
}
