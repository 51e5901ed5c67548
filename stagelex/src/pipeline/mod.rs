//! Six-stage pipeline: Raw -> CommentsStripped -> WhitespaceNormalized ->
//! ConstantsTagged -> KeywordsTagged -> IdentifiersTagged -> SymbolsTagged

mod context;
mod error;
pub mod output;
mod result;
mod stage;

pub use context::PipelineContext;
pub use error::PipelineError;
pub use output::{PipelineReport, StageReport, TokenReport};
pub use result::{PipelineResult, PipelineSummary, StageRecord, StageSummary};
pub use stage::Stage;

use crate::config::runtime::LexicalPreferences;
use crate::diagnostics;
use crate::grammar::{LanguageProfile, ProfileError};
use crate::lexical::TokenMetrics;
use crate::logging;
use crate::source::SourceReader;
use std::path::Path;
use std::time::Instant;

/// Run all six stages over `source`
pub fn process_source(source: &str, profile: &LanguageProfile) -> PipelineResult {
    let preferences = LexicalPreferences {
        profile_path: None,
        collect_detailed_metrics: true,
        log_stage_transitions: false,
    };
    process_source_with_preferences(source, profile, &preferences)
}

pub fn process_source_with_preferences(
    source: &str,
    profile: &LanguageProfile,
    preferences: &LexicalPreferences,
) -> PipelineResult {
    let started = Instant::now();
    let mut ctx = PipelineContext::new(source, profile)
        .with_transition_logging(preferences.log_stage_transitions);
    let stages = ctx.run_remaining();
    let literal_index = ctx.literal_index().cloned().unwrap_or_default();

    let mut metrics = TokenMetrics::new();
    for record in &stages {
        metrics.record_tokens(&record.output.tokens);
    }

    let mut result = PipelineResult {
        path: None,
        profile_name: profile.name.clone(),
        source: source.to_string(),
        stages,
        literal_index,
        diagnostics: Vec::new(),
        metrics,
        duration: started.elapsed(),
    };
    result.diagnostics = diagnostics::collect(&result);
    for diagnostic in &result.diagnostics {
        diagnostic.log();
    }

    if preferences.collect_detailed_metrics {
        for (kind, count) in result.metrics.rows() {
            crate::log_debug!("Token count", "kind" => kind, "count" => count);
        }
    }
    result
}

/// Profile selected by the preferences: a TOML file or the built-in C++ one
pub fn load_profile(preferences: &LexicalPreferences) -> Result<LanguageProfile, ProfileError> {
    match &preferences.profile_path {
        Some(path) => LanguageProfile::from_toml_file(path),
        None => Ok(LanguageProfile::cpp()),
    }
}

/// Read a file and run all six stages over it with default preferences
pub fn process_file(path: &Path) -> Result<PipelineResult, PipelineError> {
    let preferences = LexicalPreferences::default();
    let profile = load_profile(&preferences).map_err(|e| {
        crate::log_error!(e.error_code(), "Failed to load language profile",
            "error" => &e
        );
        e
    })?;
    logging::with_file_context(path.to_path_buf(), 0, || {
        process_file_with(path, &SourceReader::new(), &profile, &preferences)
    })
}

/// Read a file with `reader` and run all six stages against `profile`
///
/// Source errors halt before stage 1. The caller sets the file context.
pub fn process_file_with(
    path: &Path,
    reader: &SourceReader,
    profile: &LanguageProfile,
    preferences: &LexicalPreferences,
) -> Result<PipelineResult, PipelineError> {
    crate::log_info!("Starting lexical pipeline", "file" => path.display());

    let source = reader.read(path)?;
    let mut result = process_source_with_preferences(&source.text, profile, preferences);
    result.path = Some(path.to_path_buf());
    result.duration += source.read_duration;

    result.log_success();
    Ok(result)
}
