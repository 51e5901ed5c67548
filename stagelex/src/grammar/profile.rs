//! Language profiles: a keyword table plus a symbol table
//!
//! The built-in profile is C++. Other profiles load from TOML:
//!
//! ```toml
//! name = "mini"
//! extends = "cpp"          # optional; start from the built-in tables
//! keywords = ["let", "fn"]
//! operators = ["=>", "|>"]
//! punctuators = ["@"]
//! ```

use super::keywords::{is_identifier_shaped, KeywordTable};
use super::rules::is_ident_char;
use super::symbols::{SymbolClass, SymbolTable, CPP_OPERATORS, CPP_PUNCTUATORS};
use crate::logging::codes;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Keyword {0:?} is not identifier-shaped")]
    InvalidKeyword(String),

    #[error("Empty {class} symbol")]
    EmptySymbol { class: SymbolClass },

    #[error("{class} symbol {text:?} starts with a word, number, quote or whitespace character")]
    UnmatchableSymbol { text: String, class: SymbolClass },

    #[error("Symbol {0:?} is listed as both operator and punctuator")]
    ConflictingSymbol(String),

    #[error("Unknown base profile {0:?}")]
    UnknownBase(String),
}

impl ProfileError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ProfileError::Io { .. } => codes::source::IO_ERROR,
            ProfileError::Parse(_) => codes::profile::PROFILE_PARSE_ERROR,
            ProfileError::InvalidKeyword(_) => codes::profile::INVALID_KEYWORD,
            ProfileError::EmptySymbol { .. } => codes::profile::EMPTY_SYMBOL,
            ProfileError::UnmatchableSymbol { .. } => codes::profile::UNMATCHABLE_SYMBOL,
            ProfileError::ConflictingSymbol(_) => codes::profile::CONFLICTING_SYMBOL,
            ProfileError::UnknownBase(_) => codes::profile::UNKNOWN_BASE_PROFILE,
        }
    }
}

/// Shape of a profile file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    name: String,
    extends: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    operators: Vec<String>,
    #[serde(default)]
    punctuators: Vec<String>,
}

/// The tables one pipeline run classifies against; read-only once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    pub name: String,
    pub keywords: KeywordTable,
    pub symbols: SymbolTable,
}

impl LanguageProfile {
    pub fn new(name: impl Into<String>, keywords: KeywordTable, symbols: SymbolTable) -> Self {
        Self {
            name: name.into(),
            keywords,
            symbols,
        }
    }

    /// The built-in C++ profile
    pub fn cpp() -> Self {
        Self::new("cpp", KeywordTable::cpp(), SymbolTable::cpp())
    }

    /// Built-in profile by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "cpp" | "c++" => Some(Self::cpp()),
            _ => None,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ProfileError> {
        let file: ProfileFile = toml::from_str(text)?;

        let (mut keywords, mut symbols) = match file.extends.as_deref() {
            None => (Vec::new(), BTreeMap::new()),
            Some(base) => {
                let base = Self::builtin(base)
                    .ok_or_else(|| ProfileError::UnknownBase(base.to_string()))?;
                let inherited: BTreeMap<String, SymbolClass> = base
                    .symbols
                    .entries()
                    .iter()
                    .map(|e| (e.text.clone(), e.class))
                    .collect();
                (base.keywords.iter().map(str::to_string).collect(), inherited)
            }
        };

        for word in file.keywords {
            if !is_identifier_shaped(&word) {
                return Err(ProfileError::InvalidKeyword(word));
            }
            keywords.push(word);
        }

        // Symbols declared by this file must not conflict with each other;
        // they may reclassify an inherited symbol.
        let mut declared: BTreeMap<String, SymbolClass> = BTreeMap::new();
        let listed = file
            .operators
            .into_iter()
            .map(|s| (s, SymbolClass::Operator))
            .chain(
                file.punctuators
                    .into_iter()
                    .map(|s| (s, SymbolClass::Punctuator)),
            );
        for (text, class) in listed {
            if text.is_empty() {
                return Err(ProfileError::EmptySymbol { class });
            }
            if !starts_like_symbol(&text) {
                return Err(ProfileError::UnmatchableSymbol { text, class });
            }
            if let Some(previous) = declared.insert(text.clone(), class) {
                if previous != class {
                    return Err(ProfileError::ConflictingSymbol(text));
                }
            }
        }
        symbols.extend(declared);

        Ok(Self::new(
            file.name,
            KeywordTable::new(keywords),
            SymbolTable::new(symbols),
        ))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_toml_str(&text)?;

        crate::log_success!(codes::success::PROFILE_LOADED, "Language profile loaded",
            "profile" => &profile.name,
            "path" => path.display(),
            "keywords" => profile.keywords.len(),
            "symbols" => profile.symbols.len()
        );
        Ok(profile)
    }
}

/// Symbol classification never looks at text that begins a word, a number,
/// a quoted literal or a whitespace run, so a symbol must start elsewhere.
fn starts_like_symbol(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if is_ident_char(c) => false,
        Some(c) if c.is_whitespace() || c == '"' || c == '\'' => false,
        Some('.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(_) => true,
        None => false,
    }
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self::cpp()
    }
}
