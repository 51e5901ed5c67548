//! Gap/token walk over a scanned text
//!
//! Every scan accounts for every byte of its input: bytes covered by a token
//! belong to that token, all other bytes are gap text. Walking both in order
//! reproduces the input exactly.
use super::token::Token;

/// One element of the ordered gap/token sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Unclassified filler text between tokens
    Gap(&'a str),
    Token(&'a Token),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            Segment::Gap(text) => text,
            Segment::Token(token) => token.lexeme.as_str(),
        }
    }
}

/// Iterator produced by [`segments`]
pub struct Segments<'a> {
    input: &'a str,
    tokens: std::slice::Iter<'a, Token>,
    pending: Option<&'a Token>,
    cursor: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            self.cursor = token.span.end;
            return Some(Segment::Token(token));
        }

        match self.tokens.next() {
            Some(token) if token.span.start > self.cursor => {
                let gap = &self.input[self.cursor..token.span.start];
                self.cursor = token.span.start;
                self.pending = Some(token);
                Some(Segment::Gap(gap))
            }
            Some(token) => {
                self.cursor = token.span.end;
                Some(Segment::Token(token))
            }
            None if self.cursor < self.input.len() => {
                let gap = &self.input[self.cursor..];
                self.cursor = self.input.len();
                Some(Segment::Gap(gap))
            }
            None => None,
        }
    }
}

/// Walk `input` as alternating gaps and tokens; `tokens` must be ordered and
/// non-overlapping with spans inside `input`
pub fn segments<'a>(input: &'a str, tokens: &'a [Token]) -> Segments<'a> {
    Segments {
        input,
        tokens: tokens.iter(),
        pending: None,
        cursor: 0,
    }
}

/// Concatenate gaps and token lexemes back into text
pub fn reconstruct(input: &str, tokens: &[Token]) -> String {
    let mut out = String::with_capacity(input.len());
    for segment in segments(input, tokens) {
        out.push_str(segment.text());
    }
    out
}

/// Check that tokens are ordered, non-overlapping, non-empty and in bounds
pub fn is_well_formed(input: &str, tokens: &[Token]) -> bool {
    let mut cursor = 0;
    for token in tokens {
        if token.span.start < cursor
            || token.span.is_empty()
            || token.span.end > input.len()
            || !input.is_char_boundary(token.span.start)
            || !input.is_char_boundary(token.span.end)
            || token.span.slice(input) != token.lexeme
        {
            return false;
        }
        cursor = token.span.end;
    }
    true
}
