// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePreferences {
    /// Extensions accepted by source acquisition; empty accepts any file
    pub allowed_extensions: Vec<String>,

    /// Whether an empty input file is rejected instead of producing empty stages
    pub reject_empty_input: bool,

    /// Whether to log acquisition metrics (size, lines, duration)
    pub enable_performance_logging: bool,
}

impl Default for SourcePreferences {
    fn default() -> Self {
        Self {
            allowed_extensions: env::var(env_vars::ALLOWED_EXTENSIONS)
                .ok()
                .map(|v| parse_extension_list(&v))
                .unwrap_or_default(),
            reject_empty_input: env::var(env_vars::REJECT_EMPTY_INPUT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

impl SourcePreferences {
    /// Check whether a file extension passes the allow list
    pub fn accepts_extension(&self, extension: Option<&str>) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        match extension {
            Some(ext) => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Language profile TOML file; `None` selects the built-in C++ profile
    pub profile_path: Option<PathBuf>,

    /// Whether to collect per-kind token metrics for every stage
    pub collect_detailed_metrics: bool,

    /// Whether to log every stage transition at debug level
    pub log_stage_transitions: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            profile_path: env::var(env_vars::PROFILE_PATH).ok().map(PathBuf::from),
            collect_detailed_metrics: env::var(env_vars::DETAILED_METRICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_stage_transitions: env::var(env_vars::LOG_STAGE_TRANSITIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to forward events to the `log` facade instead of stdout/stderr
    pub use_log_facade: bool,

    /// Minimum level that reaches the logger
    pub min_log_level: LogLevel,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            use_log_facade: env::var(env_vars::LOGGING_USE_FACADE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            include_file_context: env::var(env_vars::LOGGING_INCLUDE_FILE_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to the event level used by the logging service
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Split a comma separated extension list, dropping leading dots and blanks
fn parse_extension_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub source: SourcePreferences,
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Source acquisition
    pub const ALLOWED_EXTENSIONS: &str = "STAGELEX_ALLOWED_EXTENSIONS";
    pub const REJECT_EMPTY_INPUT: &str = "STAGELEX_REJECT_EMPTY_INPUT";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "STAGELEX_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const PROFILE_PATH: &str = "STAGELEX_PROFILE";
    pub const DETAILED_METRICS: &str = "STAGELEX_DETAILED_METRICS";
    pub const LOG_STAGE_TRANSITIONS: &str = "STAGELEX_LOG_STAGE_TRANSITIONS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "STAGELEX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_USE_FACADE: &str = "STAGELEX_LOGGING_USE_FACADE";
    pub const LOGGING_MIN_LEVEL: &str = "STAGELEX_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "STAGELEX_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_extension_list_parsing() {
        let parsed = parse_extension_list(".cpp, h,,  .KT ");
        assert_eq!(parsed, vec!["cpp", "h", "KT"]);
    }

    #[test]
    fn test_accepts_extension() {
        let mut prefs = SourcePreferences {
            allowed_extensions: Vec::new(),
            reject_empty_input: false,
            enable_performance_logging: false,
        };
        assert!(prefs.accepts_extension(None));
        assert!(prefs.accepts_extension(Some("anything")));

        prefs.allowed_extensions = vec!["cpp".to_string(), "kt".to_string()];
        assert!(prefs.accepts_extension(Some("CPP")));
        assert!(prefs.accepts_extension(Some("kt")));
        assert!(!prefs.accepts_extension(Some("rs")));
        assert!(!prefs.accepts_extension(None));
    }
}
