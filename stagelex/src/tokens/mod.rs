//! Token system for stagelex
//!
//! Every stage reports what it recognized as a list of [`Token`]s whose spans
//! index the text the stage was given. Tokens within one list are ordered by
//! start offset and never overlap; the bytes between them are gap text that
//! [`reconstruct`] copies through verbatim.
//!
//! ## Key Components
//!
//! - **[`TokenKind`]** - the fifteen lexical categories
//! - **[`Token`]** - lexeme, kind and span
//! - **[`StageOutput`]** - next-stage text plus the stage's tokens
//! - **[`segments`]** / **[`reconstruct`]** - gap/token walk

pub mod segments;
pub mod token;

pub use segments::{is_well_formed, reconstruct, segments, Segment, Segments};
pub use token::{StageOutput, Token, TokenKind};
