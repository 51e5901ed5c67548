//! Source acquisition with compile-time limits and global logging integration

use crate::config::compile_time::source::{MAX_LINE_COUNT, MAX_SOURCE_SIZE};
use crate::config::runtime::SourcePreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Source acquisition errors; all of them halt before stage 1
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: {extension:?} is not in the allowed list")]
    InvalidExtension { extension: Option<String> },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid UTF-8 encoding in file: {path}")]
    InvalidEncoding { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("File exceeds maximum line count: {lines} (max: {max_lines})")]
    TooManyLines { lines: usize, max_lines: usize },
}

impl SourceError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SourceError::FileNotFound { .. } => codes::source::FILE_NOT_FOUND,
            SourceError::InvalidExtension { .. } => codes::source::INVALID_EXTENSION,
            SourceError::FileTooLarge { .. } => codes::source::FILE_TOO_LARGE,
            SourceError::EmptyFile { .. } => codes::source::EMPTY_FILE,
            SourceError::PermissionDenied { .. } => codes::source::PERMISSION_DENIED,
            SourceError::InvalidEncoding { .. } => codes::source::INVALID_ENCODING,
            SourceError::IoError { .. } => codes::source::IO_ERROR,
            SourceError::InvalidPath { .. } => codes::source::INVALID_PATH,
            SourceError::TooManyLines { .. } => codes::source::TOO_MANY_LINES,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    /// Map an I/O failure on `path` to the closest variant
    fn from_io(path: &Path, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => SourceError::FileNotFound {
                path: path.display().to_string(),
            },
            std::io::ErrorKind::PermissionDenied => SourceError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => SourceError::IoError {
                message: format!("{}: {}", path.display(), error),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    pub line_count: usize,
    pub modified: Option<std::time::SystemTime>,
}

impl SourceMetadata {
    pub fn human_readable_size(&self) -> String {
        human_readable_bytes(self.size)
    }
}

/// Format a byte count with a binary unit
pub fn human_readable_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Raw source text with its metadata
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub text: String,
    pub metadata: SourceMetadata,
    pub read_duration: Duration,
}

impl SourceFile {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the text is empty or whitespace only
    pub fn is_effectively_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Reads source files under the compile-time limits and runtime preferences
#[derive(Debug, Clone)]
pub struct SourceReader {
    preferences: SourcePreferences,
}

impl SourceReader {
    pub fn new() -> Self {
        Self::from_preferences(SourcePreferences::default())
    }

    pub fn from_preferences(preferences: SourcePreferences) -> Self {
        Self { preferences }
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferences.allowed_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_empty_rejected(mut self, reject: bool) -> Self {
        self.preferences.reject_empty_input = reject;
        self
    }

    pub fn preferences(&self) -> &SourcePreferences {
        &self.preferences
    }

    pub fn read(&self, path: &Path) -> Result<SourceFile, SourceError> {
        let start_time = Instant::now();
        log_debug!("Reading source", "file" => path.display());

        let metadata = self.collect_metadata(path)?;
        self.validate(&metadata)?;

        let bytes = fs::read(path).map_err(|e| {
            let error = SourceError::from_io(path, &e);
            log_error!(error.error_code(), "Failed to read source file",
                "file" => path.display(),
                "io_error" => e
            );
            error
        })?;

        let text = String::from_utf8(bytes).map_err(|e| {
            let error = SourceError::InvalidEncoding {
                path: path.display().to_string(),
            };
            log_error!(error.error_code(), "Source file is not valid UTF-8",
                "file" => path.display(),
                "valid_up_to" => e.utf8_error().valid_up_to()
            );
            error
        })?;

        let line_count = text.lines().count();
        if line_count > MAX_LINE_COUNT {
            let error = SourceError::TooManyLines {
                lines: line_count,
                max_lines: MAX_LINE_COUNT,
            };
            log_error!(error.error_code(), "Source exceeds maximum line count",
                "file" => path.display(),
                "lines" => line_count,
                "max_lines" => MAX_LINE_COUNT
            );
            return Err(error);
        }

        let source = SourceFile {
            text,
            metadata: SourceMetadata {
                line_count,
                ..metadata
            },
            read_duration: start_time.elapsed(),
        };

        if self.preferences.enable_performance_logging {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS, "Source read",
                "file" => path.display(),
                "size" => source.metadata.human_readable_size(),
                "lines" => source.metadata.line_count,
                "chars" => source.char_count(),
                "duration_ms" => format!("{:.2}", source.read_duration.as_secs_f64() * 1000.0)
            );
        }
        Ok(source)
    }

    fn collect_metadata(&self, path: &Path) -> Result<SourceMetadata, SourceError> {
        if path.as_os_str().is_empty() {
            let error = SourceError::InvalidPath {
                path: String::new(),
            };
            log_error!(error.error_code(), "Empty source path");
            return Err(error);
        }

        let meta = fs::metadata(path).map_err(|e| {
            let error = SourceError::from_io(path, &e);
            log_error!(error.error_code(), "Failed to read source metadata",
                "file" => path.display(),
                "io_error" => e
            );
            error
        })?;

        if !meta.is_file() {
            let error = SourceError::InvalidPath {
                path: path.display().to_string(),
            };
            log_error!(error.error_code(), "Source path is not a file", "file" => path.display());
            return Err(error);
        }

        Ok(SourceMetadata {
            path: path.to_path_buf(),
            size: meta.len(),
            extension: path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|s| s.to_lowercase()),
            line_count: 0,
            modified: meta.modified().ok(),
        })
    }

    fn validate(&self, metadata: &SourceMetadata) -> Result<(), SourceError> {
        if metadata.size > MAX_SOURCE_SIZE {
            let error = SourceError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_SOURCE_SIZE,
            };
            log_error!(error.error_code(), "Source exceeds compile-time size limit",
                "file" => metadata.path.display(),
                "size" => metadata.human_readable_size(),
                "limit" => human_readable_bytes(MAX_SOURCE_SIZE)
            );
            return Err(error);
        }

        if metadata.size == 0 && self.preferences.reject_empty_input {
            let error = SourceError::EmptyFile {
                path: metadata.path.display().to_string(),
            };
            log_error!(error.error_code(), "Source file is empty", "file" => metadata.path.display());
            return Err(error);
        }

        if !self
            .preferences
            .accepts_extension(metadata.extension.as_deref())
        {
            let error = SourceError::InvalidExtension {
                extension: metadata.extension.clone(),
            };
            log_error!(error.error_code(), "Source extension not allowed",
                "file" => metadata.path.display(),
                "extension" => metadata.extension.as_deref().unwrap_or("none"),
                "allowed" => self.preferences.allowed_extensions.join(",")
            );
            return Err(error);
        }

        Ok(())
    }
}

impl Default for SourceReader {
    fn default() -> Self {
        Self::new()
    }
}
