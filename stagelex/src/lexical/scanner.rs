//! Character-level helpers shared by every stage
//!
//! All stages agree on three things: what a closed string or char literal
//! is, where an identifier-shaped run starts and ends, and how long a numeric
//! literal at a position is. Keeping them here is what lets the literal
//! index built once per text line up with every later scan.

use crate::grammar::rules;

pub use crate::grammar::rules::is_ident_char;

/// Identifier start character (`[A-Za-z_]`)
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whitespace collapsed by normalization and trimmed by comment stripping
pub fn is_layout(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Character starting at byte `pos`
pub fn char_at(text: &str, pos: usize) -> Option<char> {
    text[pos..].chars().next()
}

/// Character ending at byte `pos`
pub fn char_before(text: &str, pos: usize) -> Option<char> {
    text[..pos].chars().next_back()
}

/// Whether `pos` starts a new word (the previous char is not `[A-Za-z0-9_]`)
pub fn at_word_start(text: &str, pos: usize) -> bool {
    !char_before(text, pos).is_some_and(is_ident_char)
}

/// End of the `[A-Za-z0-9_]` run starting at `pos`
pub fn ident_run_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map_or(text.len(), |(i, _)| pos + i)
}

/// Length of a closed string (`"..."`) or char (`'x'`) literal at `pos`
///
/// A backslash escapes the following character. An empty char literal `''`
/// and a literal with no closing quote both return `None`.
pub fn quoted_len(text: &str, pos: usize) -> Option<usize> {
    let rest = &text[pos..];
    let mut chars = rest.char_indices();
    let quote = match chars.next() {
        Some((_, q @ ('"' | '\''))) => q,
        _ => return None,
    };

    if quote == '\'' {
        // Exactly one character or one escape between the quotes
        match chars.next() {
            Some((_, '\\')) => {
                chars.next()?;
            }
            Some((_, '\'')) | None => return None,
            Some(_) => {}
        }
        return match chars.next() {
            Some((i, '\'')) => Some(i + 1),
            _ => None,
        };
    }

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            '"' => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Length of a numeric constant (integer or float) starting at `pos`
pub fn numeric_len_at(text: &str, pos: usize) -> Option<usize> {
    let first = char_at(text, pos)?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    match rules::match_constant(&text[pos..], char_before(text, pos)) {
        Some((rule, len)) if rule.kind.is_integer() || rule.kind == crate::tokens::TokenKind::Float => {
            Some(len)
        }
        _ => None,
    }
}
