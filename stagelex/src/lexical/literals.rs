//! Literal span index
//!
//! [`scan_literals`] finds every closed string and char literal of a text
//! once. Later stages query the result by offset to keep text inside a
//! literal from being classified again.

use super::scanner::{char_at, is_layout, quoted_len};
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Sorted, non-overlapping spans queried by offset
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkipSet {
    spans: Vec<Span>,
}

impl SkipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary spans; overlapping or touching spans are merged
    pub fn from_spans<I: IntoIterator<Item = Span>>(spans: I) -> Self {
        let mut sorted: Vec<Span> = spans.into_iter().filter(|s| !s.is_empty()).collect();
        sorted.sort();

        let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
        for span in sorted {
            match merged.last_mut() {
                Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
                _ => merged.push(span),
            }
        }
        Self { spans: merged }
    }

    /// The span containing `offset`, if any
    pub fn span_containing(&self, offset: usize) -> Option<Span> {
        let idx = self.spans.partition_point(|s| s.end <= offset);
        self.spans.get(idx).copied().filter(|s| s.contains(offset))
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.span_containing(offset).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Span> {
        self.spans.iter()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Literal spans of one text, built once and shared by the classification stages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiteralIndex {
    literals: SkipSet,
    ranges: SkipSet,
}

impl LiteralIndex {
    /// Every closed string and char literal
    pub fn literals(&self) -> &SkipSet {
        &self.literals
    }

    /// The char literals of every `'a'..'z'` range idiom
    pub fn ranges(&self) -> &SkipSet {
        &self.ranges
    }

    pub fn is_literal(&self, offset: usize) -> bool {
        self.literals.contains(offset)
    }
}

/// Length of `..` surrounded by optional layout at `pos`, if present
fn range_operator_len(text: &str, pos: usize) -> Option<usize> {
    let rest = &text[pos..];
    let lead = rest.len() - rest.trim_start_matches(is_layout).len();
    let after_lead = &rest[lead..];
    let tail = after_lead.strip_prefix("..")?;
    // "..." is an ellipsis, not a range
    if tail.starts_with('.') {
        return None;
    }
    let trail = tail.len() - tail.trim_start_matches(is_layout).len();
    Some(lead + 2 + trail)
}

/// Find every string and char literal of `text`
///
/// Unclosed literals and the empty char literal `''` are not literals: the
/// quote is stepped over and scanning continues after it.
pub fn scan_literals(text: &str) -> LiteralIndex {
    let mut literals = Vec::new();
    let mut ranges = Vec::new();
    let mut pos = 0;

    while let Some(c) = char_at(text, pos) {
        if c != '"' && c != '\'' {
            pos += c.len_utf8();
            continue;
        }

        let Some(len) = quoted_len(text, pos) else {
            pos += if text[pos..].starts_with("''") { 2 } else { 1 };
            continue;
        };

        let span = Span::at(pos, len);
        literals.push(span);
        pos = span.end;

        if c == '\'' {
            if let Some(op_len) = range_operator_len(text, pos) {
                let upper_start = pos + op_len;
                if text[upper_start..].starts_with('\'') {
                    if let Some(upper_len) = quoted_len(text, upper_start) {
                        let upper = Span::at(upper_start, upper_len);
                        ranges.push(span);
                        ranges.push(upper);
                        literals.push(upper);
                        pos = upper.end;
                    }
                }
            }
        }
    }

    LiteralIndex {
        literals: SkipSet::from_spans(literals),
        ranges: SkipSet::from_spans(ranges),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(set: &SkipSet) -> Vec<(usize, usize)> {
        set.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_skip_set_lookup() {
        let set = SkipSet::from_spans([Span::new(10, 12), Span::new(2, 5), Span::new(4, 7)]);
        assert_eq!(spans(&set), vec![(2, 7), (10, 12)]);
        assert!(set.contains(2));
        assert!(set.contains(6));
        assert!(!set.contains(7));
        assert!(!set.contains(9));
        assert_eq!(set.span_containing(11), Some(Span::new(10, 12)));
        assert!(SkipSet::new().is_empty());
    }

    #[test]
    fn test_finds_strings_and_chars() {
        let text = r#"s = "a // b"; c = '\n';"#;
        let index = scan_literals(text);
        assert_eq!(spans(index.literals()), vec![(4, 12), (18, 22)]);
        assert!(index.ranges().is_empty());
        assert!(index.is_literal(5));
    }

    #[test]
    fn test_range_idiom_marks_both_ends() {
        let text = "for (c in 'a'..'z')";
        let index = scan_literals(text);
        assert_eq!(spans(index.ranges()), vec![(10, 13), (15, 18)]);
        assert_eq!(spans(index.literals()), vec![(10, 13), (15, 18)]);
    }

    #[test]
    fn test_range_idiom_allows_spaces() {
        let index = scan_literals("'0' .. '9'");
        assert_eq!(spans(index.ranges()), vec![(0, 3), (7, 10)]);
    }

    #[test]
    fn test_ellipsis_is_not_a_range() {
        let index = scan_literals("'a'...'z'");
        assert!(index.ranges().is_empty());
        assert_eq!(index.literals().len(), 2);
    }

    #[test]
    fn test_empty_char_is_not_a_literal() {
        let index = scan_literals("x = ''; y = 'b';");
        assert_eq!(spans(index.literals()), vec![(12, 15)]);
    }

    #[test]
    fn test_unclosed_string_is_not_a_literal() {
        let index = scan_literals("s = \"abc");
        assert!(index.literals().is_empty());
    }
}
