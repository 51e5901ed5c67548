//! Operator and punctuator tables
//!
//! Entries are kept longest-first and compiled into a byte trie. At any
//! position [`SymbolTable::longest_match`] walks the trie as far as the input
//! allows and returns the deepest accepting node, so no shorter symbol can
//! shadow a longer one sharing its prefix.
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;

/// Operators of the built-in C++ profile, longest first
pub const CPP_OPERATORS: &[&str] = &[
    ">>=", "<<=", "->*", ".*", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&",
    "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "~", "!", "+", "-", "*", "/", "%",
    "&", "|", "^", "=", "<", ">", "?", ":", ".",
];

/// Punctuators of the built-in C++ profile, longest first
pub const CPP_PUNCTUATORS: &[&str] = &[
    "...", "::", "##", ",", ";", "(", ")", "{", "}", "[", "]", "#",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolClass {
    Operator,
    Punctuator,
}

impl SymbolClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Punctuator => "punctuator",
        }
    }
}

impl fmt::Display for SymbolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub text: String,
    pub class: SymbolClass,
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<u8, usize>,
    accept: Option<SymbolClass>,
}

/// Ordered symbol table with its maximal-munch automaton
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    nodes: Vec<TrieNode>,
}

impl SymbolTable {
    /// Build from `(symbol, class)` pairs. Later duplicates replace earlier ones;
    /// empty symbols are ignored.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = (S, SymbolClass)>,
        S: Into<String>,
    {
        let mut by_text: BTreeMap<String, SymbolClass> = BTreeMap::new();
        for (text, class) in symbols {
            let text = text.into();
            if !text.is_empty() {
                by_text.insert(text, class);
            }
        }

        let mut entries: Vec<SymbolEntry> = by_text
            .into_iter()
            .map(|(text, class)| SymbolEntry { text, class })
            .collect();
        // Longest first; ties keep lexical order for a stable listing
        entries.sort_by_key(|e| Reverse(e.text.len()));

        let mut nodes = vec![TrieNode::default()];
        for entry in &entries {
            let mut node = 0;
            for &byte in entry.text.as_bytes() {
                node = match nodes[node].children.get(&byte) {
                    Some(&next) => next,
                    None => {
                        nodes.push(TrieNode::default());
                        let next = nodes.len() - 1;
                        nodes[node].children.insert(byte, next);
                        next
                    }
                };
            }
            nodes[node].accept = Some(entry.class);
        }

        Self { entries, nodes }
    }

    /// The C++ operator and punctuator table
    pub fn cpp() -> Self {
        Self::from_lists(CPP_OPERATORS.iter().copied(), CPP_PUNCTUATORS.iter().copied())
    }

    /// Build from separate operator and punctuator lists
    pub fn from_lists<O, P, S>(operators: O, punctuators: P) -> Self
    where
        O: IntoIterator<Item = S>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ops = operators.into_iter().map(|s| (s, SymbolClass::Operator));
        let puncts = punctuators
            .into_iter()
            .map(|s| (s, SymbolClass::Punctuator));
        Self::new(ops.chain(puncts))
    }

    /// Longest symbol starting at the beginning of `input`
    pub fn longest_match(&self, input: &[u8]) -> Option<(usize, SymbolClass)> {
        let mut node = 0;
        let mut best = None;
        for (i, byte) in input.iter().enumerate() {
            match self.nodes[node].children.get(byte) {
                Some(&next) => node = next,
                None => break,
            }
            if let Some(class) = self.nodes[node].accept {
                best = Some((i + 1, class));
            }
        }
        best
    }

    /// Class of an exact symbol
    pub fn class_of(&self, symbol: &str) -> Option<SymbolClass> {
        match self.longest_match(symbol.as_bytes()) {
            Some((len, class)) if len == symbol.len() => Some(class),
            _ => None,
        }
    }

    /// Entries, longest first
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Symbols of one class, longest first
    pub fn symbols(&self, class: SymbolClass) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |e| e.class == class)
            .map(|e| e.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the longest symbol
    pub fn max_symbol_len(&self) -> usize {
        self.entries.first().map_or(0, |e| e.text.len())
    }
}

impl PartialEq for SymbolTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for SymbolTable {}
