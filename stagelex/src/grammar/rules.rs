//! Priority-ordered constant rule table
//!
//! Rules are tried top to bottom at each scan position; the first rule that
//! matches wins. Patterns are anchored at the scan position and compiled once.
use crate::tokens::TokenKind;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantRule {
    pub name: &'static str,
    pub kind: TokenKind,
    /// Anchored pattern, matched against the text from the scan position on
    pub pattern: &'static str,
    /// The match must not directly follow an identifier character
    pub word_start: bool,
}

pub const CONSTANT_RULES: &[ConstantRule] = &[
    ConstantRule {
        name: "string",
        kind: TokenKind::StringLiteral,
        pattern: r#"^"(?:\\(?s:.)|[^"\\])*""#,
        word_start: false,
    },
    ConstantRule {
        name: "char",
        kind: TokenKind::CharLiteral,
        pattern: r"^'(?:\\(?s:.)|[^'\\])'",
        word_start: false,
    },
    ConstantRule {
        name: "empty-char",
        kind: TokenKind::Unknown,
        pattern: r"^''",
        word_start: false,
    },
    ConstantRule {
        name: "hex",
        kind: TokenKind::HexInt,
        pattern: r"^0[xX][0-9A-Fa-f]+",
        word_start: true,
    },
    ConstantRule {
        name: "binary",
        kind: TokenKind::BinInt,
        pattern: r"^0[bB][01]+",
        word_start: true,
    },
    ConstantRule {
        name: "octal",
        kind: TokenKind::OctInt,
        pattern: r"^0[0-7]+",
        word_start: true,
    },
    ConstantRule {
        name: "float",
        kind: TokenKind::Float,
        pattern: r"^(?:[0-9]+\.[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[fFlL]?",
        word_start: true,
    },
    ConstantRule {
        name: "float-exponent",
        kind: TokenKind::Float,
        pattern: r"^[0-9]+[eE][+-]?[0-9]+[fFlL]?",
        word_start: true,
    },
    ConstantRule {
        name: "decimal",
        kind: TokenKind::DecInt,
        pattern: r"^[0-9]+(?-u:\b)",
        word_start: true,
    },
    ConstantRule {
        name: "bool",
        kind: TokenKind::Bool,
        pattern: r"^(?:true|false)(?-u:\b)",
        word_start: true,
    },
];

/// A rule with its compiled pattern
#[derive(Debug)]
pub struct CompiledRule {
    pub rule: &'static ConstantRule,
    pub regex: Regex,
}

/// The constant rules compiled in priority order
pub fn compiled_rules() -> &'static [CompiledRule] {
    static COMPILED: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        CONSTANT_RULES
            .iter()
            .filter_map(|rule| match Regex::new(rule.pattern) {
                Ok(regex) => Some(CompiledRule { rule, regex }),
                Err(e) => {
                    crate::log_error!(crate::logging::codes::system::INTERNAL_ERROR,
                        "Constant rule pattern failed to compile",
                        "rule" => rule.name,
                        "error" => e.to_string()
                    );
                    None
                }
            })
            .collect()
    })
}

/// First rule matching at the start of `rest`, as `(rule, match length)`
///
/// `prev` is the character before the scan position, used for `word_start`.
/// A leading `.` already separates the constant from any word before it.
pub fn match_constant(rest: &str, prev: Option<char>) -> Option<(&'static ConstantRule, usize)> {
    let first = rest.chars().next()?;
    if !could_start_constant(first) {
        return None;
    }
    let at_word_start = first == '.' || !prev.is_some_and(is_ident_char);

    compiled_rules().iter().find_map(|compiled| {
        if compiled.rule.word_start && !at_word_start {
            return None;
        }
        compiled
            .regex
            .find(rest)
            .map(|m| (compiled.rule, m.end()))
    })
}

/// Cheap prefilter over the first character of a candidate
pub fn could_start_constant(c: char) -> bool {
    matches!(c, '"' | '\'' | '.' | 't' | 'f') || c.is_ascii_digit()
}

/// Identifier continuation character (`[A-Za-z0-9_]`)
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
