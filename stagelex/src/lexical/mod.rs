//! Lexical core: the six stage functions and the helpers they share
//!
//! Every stage is a pure function of its input text. The two
//! text-transforming stages ([`strip_comments`], [`normalize_whitespace`])
//! produce a new text plus an offset map back to their input; the three
//! classification stages hand their text through and report tokens.
//! [`scan_literals`] is computed once per normalized text and passed by
//! reference to the classifiers.

pub mod comments;
pub mod constants;
pub mod literals;
pub mod metrics;
pub mod scanner;
pub mod symbols;
pub mod whitespace;
pub mod words;

pub use comments::strip_comments;
pub use constants::classify_constants;
pub use literals::{scan_literals, LiteralIndex, SkipSet};
pub use metrics::TokenMetrics;
pub use symbols::classify_symbols;
pub use whitespace::normalize_whitespace;
pub use words::classify_words;
