// Internal modules
pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod source;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity};
pub use grammar::{LanguageProfile, ProfileError};
pub use pipeline::{
    process_file, process_source, PipelineContext, PipelineError, PipelineReport, PipelineResult,
    Stage,
};
pub use source::{SourceError, SourceFile, SourceReader};
pub use tokens::{StageOutput, Token, TokenKind};
pub use utils::{OffsetMap, SourceMap, Span};
