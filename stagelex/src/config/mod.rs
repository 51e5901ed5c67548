//! Configuration module for stagelex
//! Compile-time limits come from `config/<profile>.toml` via build.rs,
//! runtime preferences come from `STAGELEX_*` environment variables.

// Include generated limits from build.rs
include!(concat!(env!("OUT_DIR"), "/limits.rs"));

pub mod runtime;

pub use runtime::{LexicalPreferences, LoggingPreferences, SourcePreferences};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("STAGELEX_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("STAGELEX_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::source::MAX_SOURCE_SIZE > 0);
        assert!(compile_time::source::MAX_LINE_COUNT > 0);
        assert!(compile_time::batch::MAX_WORKER_THREADS >= 1);
        assert!(compile_time::logging::MAX_LOG_MESSAGE_LENGTH > 0);
    }

    #[test]
    fn test_build_info() {
        assert!(super::build_info::source_info().ends_with(".toml"));
    }
}
