//! Error and success codes with their classification metadata
//!
//! Every error type in the crate maps to one of these codes through its
//! `error_code()` method; the registry below is the single source of the
//! category, severity and recommended action for each code.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Source acquisition error codes
pub mod source {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Lexical diagnostic codes
pub mod lexical {
    use super::Code;

    pub const UNRECOGNIZED_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_LITERAL: Code = Code::new("E021");
    pub const UNTERMINATED_COMMENT: Code = Code::new("W022");
    pub const EMPTY_CHAR_LITERAL: Code = Code::new("W023");
}

/// Language profile error codes
pub mod profile {
    use super::Code;

    pub const PROFILE_PARSE_ERROR: Code = Code::new("E030");
    pub const INVALID_KEYWORD: Code = Code::new("E031");
    pub const EMPTY_SYMBOL: Code = Code::new("E032");
    pub const CONFLICTING_SYMBOL: Code = Code::new("E033");
    pub const UNKNOWN_BASE_PROFILE: Code = Code::new("E034");
    pub const UNMATCHABLE_SYMBOL: Code = Code::new("E035");
}

/// Pipeline state machine error codes
pub mod pipeline {
    use super::Code;

    pub const STAGE_OUT_OF_ORDER: Code = Code::new("E040");
    pub const PIPELINE_ALREADY_COMPLETE: Code = Code::new("E041");
}

/// Batch processing error codes
pub mod batch {
    use super::Code;

    pub const NO_INPUT_FILES: Code = Code::new("E050");
    pub const TOO_MANY_FILES: Code = Code::new("E051");
    pub const DIRECTORY_WALK_ERROR: Code = Code::new("E052");
    pub const WORKER_FAILURE: Code = Code::new("E053");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const STAGE_COMPLETE: Code = Code::new("I020");
    pub const PIPELINE_COMPLETE: Code = Code::new("I030");
    pub const PROFILE_LOADED: Code = Code::new("I031");
    pub const BATCH_COMPLETE: Code = Code::new("I050");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

use Severity::{Critical, High, Low, Medium};

const METADATA: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Critical,
        false,
        true,
        "Critical internal system error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Critical,
        false,
        true,
        "System initialization failure",
        "Check logging configuration and environment variables",
    ),
    // Source acquisition
    ErrorMetadata::new(
        "E005",
        "Source",
        Medium,
        false,
        true,
        "Source file not found at specified path",
        "Check the path and ensure the file exists",
    ),
    ErrorMetadata::new(
        "E006",
        "Source",
        Low,
        true,
        false,
        "Source file extension is not in the allowed list",
        "Rename the file or adjust STAGELEX_ALLOWED_EXTENSIONS",
    ),
    ErrorMetadata::new(
        "E007",
        "Source",
        Medium,
        false,
        true,
        "Source file exceeds maximum size limit",
        "Split the input or rebuild with a larger limit profile",
    ),
    ErrorMetadata::new(
        "E008",
        "Source",
        Low,
        true,
        false,
        "Source file is empty",
        "Provide a file with content or allow empty input",
    ),
    ErrorMetadata::new(
        "E009",
        "Source",
        Medium,
        false,
        true,
        "Permission denied reading source file",
        "Check file permissions and user access rights",
    ),
    ErrorMetadata::new(
        "E010",
        "Source",
        Medium,
        false,
        true,
        "Source file is not valid UTF-8",
        "Convert the file to UTF-8",
    ),
    ErrorMetadata::new(
        "E011",
        "Source",
        Medium,
        true,
        true,
        "I/O error while reading source",
        "Check disk and filesystem health, then retry",
    ),
    ErrorMetadata::new(
        "E012",
        "Source",
        Medium,
        false,
        true,
        "Path is not a regular file",
        "Pass a file, or a directory for batch mode",
    ),
    ErrorMetadata::new(
        "E013",
        "Source",
        Medium,
        false,
        true,
        "Source file exceeds maximum line count",
        "Split the input or rebuild with a larger limit profile",
    ),
    // Lexical diagnostics
    ErrorMetadata::new(
        "E020",
        "Lexical",
        High,
        true,
        false,
        "Character does not belong to any token class",
        "Remove the character or add it to the language profile",
    ),
    ErrorMetadata::new(
        "E021",
        "Lexical",
        High,
        true,
        false,
        "String or character literal is not closed",
        "Add the closing quote",
    ),
    ErrorMetadata::new(
        "W022",
        "Lexical",
        Low,
        true,
        false,
        "Block comment runs to end of input",
        "Add the closing */",
    ),
    ErrorMetadata::new(
        "W023",
        "Lexical",
        Low,
        true,
        false,
        "Empty character literal",
        "Put exactly one character between the quotes",
    ),
    // Language profiles
    ErrorMetadata::new(
        "E030",
        "Profile",
        High,
        false,
        true,
        "Language profile is not valid TOML",
        "Fix the profile file syntax",
    ),
    ErrorMetadata::new(
        "E031",
        "Profile",
        High,
        false,
        true,
        "Keyword is not identifier shaped",
        "Keywords must match [A-Za-z_][A-Za-z0-9_]*",
    ),
    ErrorMetadata::new(
        "E032",
        "Profile",
        High,
        false,
        true,
        "Empty operator or punctuator",
        "Remove the empty entry from the profile",
    ),
    ErrorMetadata::new(
        "E033",
        "Profile",
        High,
        false,
        true,
        "Symbol listed as both operator and punctuator",
        "Keep the symbol in exactly one list",
    ),
    ErrorMetadata::new(
        "E034",
        "Profile",
        High,
        false,
        true,
        "Profile extends an unknown base profile",
        "Use extends = \"cpp\" or remove the key",
    ),
    ErrorMetadata::new(
        "E035",
        "Profile",
        High,
        false,
        true,
        "Symbol starts with a word, number, quote or whitespace character",
        "Declare word-like symbols as keywords instead",
    ),
    // Pipeline
    ErrorMetadata::new(
        "E040",
        "Pipeline",
        Medium,
        true,
        false,
        "Stage requested out of order",
        "Run stages in order, or restart from the raw stage",
    ),
    ErrorMetadata::new(
        "E041",
        "Pipeline",
        Low,
        true,
        false,
        "Pipeline already reached its final stage",
        "Start a new pipeline context",
    ),
    // Batch
    ErrorMetadata::new(
        "E050",
        "Batch",
        Medium,
        true,
        false,
        "No input files found",
        "Check the directory and allowed extensions",
    ),
    ErrorMetadata::new(
        "E051",
        "Batch",
        Medium,
        false,
        true,
        "Too many files for one batch",
        "Split the batch or rebuild with a larger limit profile",
    ),
    ErrorMetadata::new(
        "E052",
        "Batch",
        Medium,
        true,
        false,
        "Directory traversal failed",
        "Check directory permissions",
    ),
    ErrorMetadata::new(
        "E053",
        "Batch",
        High,
        false,
        true,
        "Worker thread panicked",
        "File a bug report with the input that triggered it",
    ),
    // Success
    ErrorMetadata::new(
        "I004",
        "System",
        Low,
        true,
        false,
        "Logging system initialized",
        "Continue processing",
    ),
    ErrorMetadata::new(
        "I006",
        "Source",
        Low,
        true,
        false,
        "Source file acquired",
        "Continue to comment stripping",
    ),
    ErrorMetadata::new(
        "I020",
        "Pipeline",
        Low,
        true,
        false,
        "Stage completed",
        "Continue to the next stage",
    ),
    ErrorMetadata::new(
        "I030",
        "Pipeline",
        Low,
        true,
        false,
        "All stages completed",
        "Review tokens and diagnostics",
    ),
    ErrorMetadata::new(
        "I031",
        "Profile",
        Low,
        true,
        false,
        "Language profile loaded",
        "Continue processing",
    ),
    ErrorMetadata::new(
        "I050",
        "Batch",
        Low,
        true,
        false,
        "Batch processing completed",
        "Review the batch summary",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| METADATA.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let mut seen = HashSet::new();
        for metadata in METADATA {
            assert!(seen.insert(metadata.code), "duplicate code {}", metadata.code);
        }
    }

    #[test]
    fn test_every_constant_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            source::FILE_NOT_FOUND,
            source::INVALID_EXTENSION,
            source::FILE_TOO_LARGE,
            source::EMPTY_FILE,
            source::PERMISSION_DENIED,
            source::INVALID_ENCODING,
            source::IO_ERROR,
            source::INVALID_PATH,
            source::TOO_MANY_LINES,
            lexical::UNRECOGNIZED_CHARACTER,
            lexical::UNTERMINATED_LITERAL,
            lexical::UNTERMINATED_COMMENT,
            lexical::EMPTY_CHAR_LITERAL,
            profile::PROFILE_PARSE_ERROR,
            profile::INVALID_KEYWORD,
            profile::EMPTY_SYMBOL,
            profile::CONFLICTING_SYMBOL,
            profile::UNKNOWN_BASE_PROFILE,
            profile::UNMATCHABLE_SYMBOL,
            pipeline::STAGE_OUT_OF_ORDER,
            pipeline::PIPELINE_ALREADY_COMPLETE,
            batch::NO_INPUT_FILES,
            batch::TOO_MANY_FILES,
            batch::DIRECTORY_WALK_ERROR,
            batch::WORKER_FAILURE,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::FILE_PROCESSING_SUCCESS,
            success::STAGE_COMPLETE,
            success::PIPELINE_COMPLETE,
            success::PROFILE_LOADED,
            success::BATCH_COMPLETE,
        ];
        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
        assert_eq!(codes.len(), METADATA.len());
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("E005"));
        assert!(is_recoverable("W022"));
        assert_eq!(get_category("E033"), "Profile");
        assert_eq!(get_description("nope"), "Unknown error");
        assert_eq!(get_action("nope"), "No specific action available");
    }
}
