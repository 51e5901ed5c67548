//! Logging configuration: compile-time limits plus runtime preferences
//!
//! Limits come from the generated `compile_time::logging` constants and
//! cannot be changed at runtime. Preferences are read from the environment
//! once, or installed explicitly with [`init_runtime_preferences`].

use crate::config::compile_time::logging::{MAX_LOG_EVENTS_PER_FILE, MAX_LOG_MESSAGE_LENGTH};
use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Install runtime preferences; fails if they were already installed or read
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

fn get_runtime_preferences() -> &'static LoggingPreferences {
    RUNTIME_PREFERENCES.get_or_init(LoggingPreferences::default)
}

/// Minimum level that reaches the logger
pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Whether events go to the `log` facade instead of stdout/stderr
pub fn use_log_facade() -> bool {
    get_runtime_preferences().use_log_facade
}

pub fn include_file_context() -> bool {
    get_runtime_preferences().include_file_context
}

pub fn get_max_log_events_per_file() -> usize {
    MAX_LOG_EVENTS_PER_FILE
}

pub fn get_max_log_message_length() -> usize {
    MAX_LOG_MESSAGE_LENGTH
}

/// Cut a message to the configured maximum length on a char boundary
pub fn truncate_message(message: &str) -> &str {
    let max = MAX_LOG_MESSAGE_LENGTH;
    if message.len() <= max {
        return message;
    }
    let mut end = max;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}

/// Validate the compile-time limits
pub fn validate_config() -> Result<(), String> {
    if MAX_LOG_EVENTS_PER_FILE == 0 {
        return Err("max_log_events_per_file must be positive".to_string());
    }
    if MAX_LOG_MESSAGE_LENGTH < 16 {
        return Err(format!(
            "max_log_message_length too small: {}",
            MAX_LOG_MESSAGE_LENGTH
        ));
    }
    Ok(())
}

/// Configuration summary for diagnostics
pub fn get_config_summary() -> String {
    let preferences = get_runtime_preferences();

    format!(
        "Logging Configuration:\n\
         === Limits (Compile-time) ===\n\
         - Max events per file: {}\n\
         - Max message length: {}\n\
         === Preferences (Runtime) ===\n\
         - Min log level: {}\n\
         - Structured logging: {}\n\
         - Log facade: {}\n\
         - Include file context: {}",
        MAX_LOG_EVENTS_PER_FILE,
        MAX_LOG_MESSAGE_LENGTH,
        preferences.min_log_level.as_str(),
        preferences.use_structured_logging,
        preferences.use_log_facade,
        preferences.include_file_context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_generated_limits() {
        assert!(validate_config().is_ok());
    }

    #[test]
    fn test_truncate_message_respects_char_boundaries() {
        let short = "short";
        assert_eq!(truncate_message(short), short);

        let long = "é".repeat(MAX_LOG_MESSAGE_LENGTH);
        let cut = truncate_message(&long);
        assert!(cut.len() <= MAX_LOG_MESSAGE_LENGTH);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_summary_lists_limits() {
        let summary = get_config_summary();
        assert!(summary.contains("Max events per file"));
        assert!(summary.contains("Min log level"));
    }
}
