//! Reserved-word tables
//!
//! A [`KeywordTable`] is built once per language profile and is read-only
//! afterwards. Lookup is exact and case-sensitive.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reserved words of the built-in C++ profile
pub const CPP_KEYWORDS: &[&str] = &[
    // Types
    "auto",
    "bool",
    "char",
    "char16_t",
    "char32_t",
    "char8_t",
    "double",
    "float",
    "int",
    "long",
    "short",
    "signed",
    "unsigned",
    "void",
    "wchar_t",
    "decltype",
    "nullptr_t",
    // Storage and qualifiers
    "extern",
    "mutable",
    "register",
    "static",
    "thread_local",
    "volatile",
    "const",
    // Control flow
    "break",
    "case",
    "continue",
    "default",
    "do",
    "else",
    "for",
    "goto",
    "if",
    "return",
    "switch",
    "while",
    // Declarations
    "class",
    "struct",
    "union",
    "enum",
    "template",
    "typename",
    "using",
    "namespace",
    "inline",
    "virtual",
    "explicit",
    "friend",
    "operator",
    "this",
    // Memory and exceptions
    "new",
    "delete",
    "try",
    "catch",
    "throw",
    "noexcept",
    // Casts
    "const_cast",
    "static_cast",
    "dynamic_cast",
    "reinterpret_cast",
    // Literal words
    "true",
    "false",
    "nullptr",
    // Compile-time
    "sizeof",
    "typeid",
    "alignof",
    "alignas",
    "constexpr",
    "consteval",
    "constinit",
    // Modules, concepts and coroutines
    "export",
    "import",
    "requires",
    "concept",
    "co_await",
    "co_yield",
    "co_return",
];

/// Check whether `word` has identifier shape (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_identifier_shaped(word: &str) -> bool {
    let mut bytes = word.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Immutable set of reserved words
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordTable {
    words: BTreeSet<String>,
}

impl KeywordTable {
    /// Build a table from any list of words; duplicates collapse
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// The C++ reserved-word table
    pub fn cpp() -> Self {
        Self::new(CPP_KEYWORDS.iter().copied())
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Add words from another table
    pub fn extend(&mut self, other: &KeywordTable) {
        self.words.extend(other.words.iter().cloned());
    }
}
