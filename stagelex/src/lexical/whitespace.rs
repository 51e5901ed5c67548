//! Stage 2: whitespace normalization

use super::scanner::is_layout;
use crate::tokens::{StageOutput, Token, TokenKind};
use crate::utils::{OffsetMap, Span};

/// Collapse every whitespace run to one space and trim both ends
///
/// Every run in the input is reported as a `Whitespace` token. Interior runs
/// map back to the first byte of the run they replace.
pub fn normalize_whitespace(text: &str) -> StageOutput {
    let mut tokens = Vec::new();
    let mut builder = OffsetMap::builder(text.len());
    let mut output = String::with_capacity(text.len());
    let mut copy_from = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if !is_layout(c) {
            continue;
        }
        let mut end = start + 1;
        while let Some(&(i, next)) = chars.peek() {
            if !is_layout(next) {
                break;
            }
            end = i + 1;
            chars.next();
        }

        tokens.push(Token::new(TokenKind::Whitespace, text, Span::new(start, end)));

        builder.copy(copy_from, start - copy_from);
        output.push_str(&text[copy_from..start]);
        if start > 0 && end < text.len() {
            builder.copy(start, 1);
            output.push(' ');
        }
        copy_from = end;
    }
    builder.copy(copy_from, text.len() - copy_from);
    output.push_str(&text[copy_from..]);

    let origin = builder.finish(output.len());
    StageOutput {
        text: output,
        tokens,
        origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_collapse_and_ends_trim() {
        let out = normalize_whitespace("\nint x=5;\n\nfloat y=1.5e3;");
        assert_eq!(out.text, "int x=5; float y=1.5e3;");
        assert_eq!(out.of_kind(TokenKind::Whitespace).count(), 4);
    }

    #[test]
    fn test_tabs_and_carriage_returns() {
        let out = normalize_whitespace("a\t\r\n  b");
        assert_eq!(out.text, "a b");
        assert_eq!(out.lexemes(TokenKind::Whitespace), vec!["\t\r\n  "]);
    }

    #[test]
    fn test_idempotence() {
        let inputs = ["  a  b  ", "a\n\n\tb", "", "   ", "x", " \"s  t\" "];
        for input in inputs {
            let once = normalize_whitespace(input).text;
            let twice = normalize_whitespace(&once).text;
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_all_whitespace_becomes_empty() {
        let out = normalize_whitespace(" \n\t ");
        assert_eq!(out.text, "");
        assert_eq!(out.tokens.len(), 1);
    }

    #[test]
    fn test_origin_points_into_input() {
        let out = normalize_whitespace("  a \n\n b");
        assert_eq!(out.text, "a b");
        assert_eq!(out.origin.to_source(0), 2);
        assert_eq!(out.origin.to_source(1), 3);
        assert_eq!(out.origin.to_source(2), 7);
    }

    #[test]
    fn test_non_ascii_text_is_untouched() {
        let out = normalize_whitespace("é  ü");
        assert_eq!(out.text, "é ü");
    }
}
