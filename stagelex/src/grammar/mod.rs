//! Language tables: reserved words, symbols, constant rules and profiles

pub mod keywords;
pub mod profile;
pub mod rules;
pub mod symbols;

pub use keywords::{is_identifier_shaped, KeywordTable, CPP_KEYWORDS};
pub use profile::{LanguageProfile, ProfileError};
pub use rules::{ConstantRule, CONSTANT_RULES};
pub use symbols::{SymbolClass, SymbolEntry, SymbolTable, CPP_OPERATORS, CPP_PUNCTUATORS};
