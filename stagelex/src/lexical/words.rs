//! Stage 5: keyword and identifier classification

use super::literals::SkipSet;
use super::scanner::{
    at_word_start, char_at, ident_run_end, is_ident_char, is_ident_start, numeric_len_at,
};
use crate::grammar::KeywordTable;
use crate::tokens::{StageOutput, Token, TokenKind};
use crate::utils::Span;

/// Tokenize every identifier-shaped word of `text` outside `skip`
///
/// Words are matched whole: `return_value` is one identifier, never the
/// keyword `return` followed by text. Numeric literals are stepped over so
/// the exponent of `1e5` or the digits of `0x1F` never start a word.
pub fn classify_words(text: &str, skip: &SkipSet, keywords: &KeywordTable) -> StageOutput {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = char_at(text, pos) {
        if let Some(span) = skip.span_containing(pos) {
            pos = span.end;
            continue;
        }

        if is_ident_start(c) && at_word_start(text, pos) {
            let end = ident_run_end(text, pos);
            let span = Span::new(pos, end);
            let kind = if keywords.contains(span.slice(text)) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, text, span));
            pos = end;
        } else if let Some(len) = numeric_len_at(text, pos) {
            pos += len;
        } else if is_ident_char(c) {
            pos = ident_run_end(text, pos);
        } else {
            pos += c.len_utf8();
        }
    }

    StageOutput::passthrough(text, tokens)
}
