//! Source acquisition: the I/O boundary in front of stage 1
//!
//! Reads a file as UTF-8 under the compile-time size and line limits and
//! the runtime extension and empty-input preferences. Failures are logged
//! with their code and returned; the pipeline never starts on them.

mod processor;

pub use processor::{
    human_readable_bytes, SourceError, SourceFile, SourceMetadata, SourceReader,
};
use std::path::Path;

/// Read a source file with the default preferences
pub fn read_source(path: &Path) -> Result<SourceFile, SourceError> {
    SourceReader::new().read(path)
}
