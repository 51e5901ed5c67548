//! Shared location types: byte spans, line/column lookup and offset maps

pub mod offset_map;
pub mod span;

pub use offset_map::{OffsetMap, OffsetMapBuilder};
pub use span::{Position, SourceMap, Span};
