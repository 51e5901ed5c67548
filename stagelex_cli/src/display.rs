//! Plain-text rendering of pipeline results and batch summaries

use stagelex::batch::BatchResults;
use stagelex::diagnostics;
use stagelex::lexical::TokenMetrics;
use stagelex::pipeline::{PipelineResult, Stage, StageRecord};
use std::fmt::Write;

const LEXEME_WIDTH: usize = 24;

/// Lexeme as printed in token tables: escaped and cut to the column width
fn display_lexeme(lexeme: &str) -> String {
    let escaped = lexeme.escape_debug().to_string();
    if escaped.chars().count() <= LEXEME_WIDTH {
        return escaped;
    }
    let cut: String = escaped.chars().take(LEXEME_WIDTH - 3).collect();
    format!("{}...", cut)
}

pub fn render_stage(record: &StageRecord, result: &PipelineResult) -> String {
    let map = result.source_map();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "== Stage {}: {} ({}) ==",
        record.stage.ordinal(),
        record.stage.title(),
        record.stage
    );
    let _ = writeln!(out, "{}", record.output.text);

    if record.output.tokens.is_empty() {
        let _ = writeln!(out, "  (no tokens)");
        return out;
    }

    let _ = writeln!(out, "  {:<14} {:<width$} {:>9}", "KIND", "LEXEME", "LINE:COL", width = LEXEME_WIDTH);
    for token in &record.output.tokens {
        let position = map.position_at(record.raw_span(token).start);
        let _ = writeln!(
            out,
            "  {:<14} {:<width$} {:>9}",
            token.kind.label(),
            display_lexeme(&token.lexeme),
            format!("{}:{}", position.line, position.column),
            width = LEXEME_WIDTH
        );
    }
    out
}

pub fn render_metrics(metrics: &TokenMetrics) -> String {
    let mut out = String::from("== Token counts ==\n");
    for (kind, count) in metrics.rows() {
        let _ = writeln!(out, "  {:<14} {:>6}", kind.label(), count);
    }
    let _ = writeln!(out, "  {:<14} {:>6}", "total", metrics.total_tokens);
    if let Some(longest) = &metrics.longest_lexeme {
        let _ = writeln!(out, "  longest lexeme: {}", display_lexeme(longest));
    }
    let _ = writeln!(out, "  comment bytes removed: {}", metrics.comment_bytes_removed);
    out
}

/// Every requested stage, the diagnostics and the count table
pub fn render_result(result: &PipelineResult, only: Option<Stage>) -> String {
    let mut out = String::new();
    for record in &result.stages {
        if only.is_some_and(|stage| stage != record.stage) {
            continue;
        }
        out.push_str(&render_stage(record, result));
        out.push('\n');
    }
    if !result.diagnostics.is_empty() {
        out.push_str(&diagnostics::render_all(
            &result.diagnostics,
            &result.source_map(),
        ));
        out.push('\n');
    }
    if only.is_none() {
        out.push_str(&render_metrics(&result.metrics));
    }
    out
}

pub fn render_batch(results: &BatchResults) -> String {
    let mut out = String::from("=== Batch Summary ===\n");
    for (path, result) in &results.successful_files {
        let status = if result.has_errors() { "ERRORS" } else { "OK" };
        let _ = writeln!(
            out,
            "  {:<6} {} ({} tokens, {} errors, {} warnings)",
            status,
            path.display(),
            result.metrics.total_tokens,
            result.error_count(),
            result.warning_count()
        );
    }
    for (path, error) in &results.failed_files {
        let _ = writeln!(out, "  {:<6} {}: {}", "FAILED", path.display(), error);
    }
    let _ = writeln!(out, "{}", results.summary());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagelex::grammar::LanguageProfile;
    use stagelex::pipeline::process_source;

    #[test]
    fn test_lexemes_are_escaped_and_cut() {
        assert_eq!(display_lexeme("\n"), "\\n");
        let long = "x".repeat(40);
        let shown = display_lexeme(&long);
        assert_eq!(shown.chars().count(), LEXEME_WIDTH);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn test_render_single_stage() {
        let result = process_source("int x=5;", &LanguageProfile::cpp());
        let text = render_result(&result, Some(Stage::ConstantsTagged));
        assert!(text.starts_with("== Stage 3:"));
        assert!(text.contains("dec-int"));
        assert!(!text.contains("== Stage 4:"));
        assert!(!text.contains("Token counts"));
    }

    #[test]
    fn test_render_includes_diagnostics_and_counts() {
        let result = process_source("a = @;", &LanguageProfile::cpp());
        let text = render_result(&result, None);
        assert!(text.contains("error[E020]"));
        assert!(text.contains("== Token counts =="));
        assert!(text.contains("== Stage 6:"));
    }
}
