//! Stage 1: comment stripping

use super::scanner::{is_layout, quoted_len};
use crate::tokens::{StageOutput, Token, TokenKind};
use crate::utils::{OffsetMap, Span};

/// End offset of the comment starting at `pos` (`//` or `/*`)
///
/// A line comment stops before its newline. A block comment without `*/`
/// runs to the end of the text.
fn comment_end(text: &str, pos: usize) -> usize {
    let body = pos + 2;
    if text[pos..].starts_with("//") {
        text[body..].find('\n').map_or(text.len(), |i| body + i)
    } else {
        text[body..].find("*/").map_or(text.len(), |i| body + i + 2)
    }
}

/// Remove line and block comments, then trim trailing whitespace
///
/// Literals are copied through untouched, so `"//"` inside a string is not a
/// comment. Removed comments and the trimmed trailing whitespace are
/// reported as tokens; the output text is exactly the input minus the tokens.
pub fn strip_comments(text: &str) -> StageOutput {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut kept: Vec<Span> = Vec::new();
    let mut copy_from = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => pos += quoted_len(text, pos).unwrap_or(1),
            b'/' if matches!(bytes.get(pos + 1), Some(b'/' | b'*')) => {
                let end = comment_end(text, pos);
                if copy_from < pos {
                    kept.push(Span::new(copy_from, pos));
                }
                tokens.push(Token::new(TokenKind::Comment, text, Span::new(pos, end)));
                pos = end;
                copy_from = end;
            }
            _ => pos += 1,
        }
    }
    if copy_from < text.len() {
        kept.push(Span::new(copy_from, text.len()));
    }

    trim_trailing_layout(text, &mut kept, &mut tokens);
    tokens.sort_by_key(|t| t.span.start);

    let mut builder = OffsetMap::builder(text.len());
    let mut output = String::with_capacity(text.len());
    for piece in &kept {
        builder.copy(piece.start, piece.len());
        output.push_str(piece.slice(text));
    }
    let origin = builder.finish(output.len());

    StageOutput {
        text: output,
        tokens,
        origin,
    }
}

/// Cut trailing layout off the kept pieces, reporting each cut as whitespace
fn trim_trailing_layout(text: &str, kept: &mut Vec<Span>, tokens: &mut Vec<Token>) {
    while let Some(last) = kept.last_mut() {
        let piece = last.slice(text);
        let trimmed_len = piece.trim_end_matches(is_layout).len();
        if trimmed_len < piece.len() {
            let cut = Span::new(last.start + trimmed_len, last.end);
            tokens.push(Token::new(TokenKind::Whitespace, text, cut));
        }
        if trimmed_len > 0 {
            last.end = last.start + trimmed_len;
            break;
        }
        kept.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::reconstruct;

    #[test]
    fn test_line_comment_keeps_newline() {
        let out = strip_comments("// hi\nint x=5;");
        assert_eq!(out.text, "\nint x=5;");
        assert_eq!(out.lexemes(TokenKind::Comment), vec!["// hi"]);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let out = strip_comments("a /* one\ntwo */ b");
        assert_eq!(out.text, "a  b");
        assert_eq!(out.lexemes(TokenKind::Comment), vec!["/* one\ntwo */"]);
    }

    #[test]
    fn test_block_comment_is_not_greedy() {
        let out = strip_comments("a/*x*/b/*y*/c");
        assert_eq!(out.text, "abc");
        assert_eq!(out.of_kind(TokenKind::Comment).count(), 2);
    }

    #[test]
    fn test_unterminated_block_comment_consumes_to_end() {
        let out = strip_comments("int a; /* never closed\nint b;");
        assert_eq!(out.text, "int a;");
        assert_eq!(
            out.lexemes(TokenKind::Comment),
            vec!["/* never closed\nint b;"]
        );
    }

    #[test]
    fn test_comment_markers_inside_literals_are_kept() {
        let text = r#"s = "http://x /* y */"; c = '/';"#;
        let out = strip_comments(text);
        assert_eq!(out.text, text);
        assert!(out.tokens.is_empty());
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed_and_reported() {
        let text = "x  /* c */  \n";
        let out = strip_comments(text);
        assert_eq!(out.text, "x");
        assert_eq!(out.lexemes(TokenKind::Whitespace), vec!["  ", "  \n"]);
        assert_eq!(reconstruct(text, &out.tokens), text);
    }

    #[test]
    fn test_leading_whitespace_is_kept() {
        let out = strip_comments("  \n int");
        assert_eq!(out.text, "  \n int");
    }

    #[test]
    fn test_origin_maps_past_removed_comment() {
        let out = strip_comments("a/*xyz*/b");
        assert_eq!(out.origin.to_source(1), 8);
    }

    #[test]
    fn test_division_is_not_a_comment() {
        let out = strip_comments("a = b / c;");
        assert_eq!(out.text, "a = b / c;");
    }

    #[test]
    fn test_string_spanning_lines_hides_comment_marker() {
        let text = "a = \"x; // c\nb = \";";
        let out = strip_comments(text);
        assert_eq!(out.text, text);
        assert_eq!(out.of_kind(TokenKind::Comment).count(), 0);
    }
}
