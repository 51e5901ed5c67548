use super::stage::Stage;
use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::lexical::{LiteralIndex, TokenMetrics};
use crate::tokens::{StageOutput, Token};
use crate::utils::{OffsetMap, SourceMap, Span};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// One executed transition: the text the stage read and what it produced
#[derive(Debug, Clone)]
pub struct StageRecord {
    /// State reached by this transition
    pub stage: Stage,
    pub input: String,
    pub output: StageOutput,
    /// Maps offsets of `input` back to the raw source
    pub input_origin: OffsetMap,
    pub duration: Duration,
}

impl StageRecord {
    pub fn tokens(&self) -> &[Token] {
        &self.output.tokens
    }

    /// Where a token of this stage sits in the raw source
    pub fn raw_span(&self, token: &Token) -> Span {
        self.input_origin.span_to_source(token.span)
    }

    pub fn metrics(&self) -> TokenMetrics {
        let mut metrics = TokenMetrics::new();
        metrics.record_tokens(&self.output.tokens);
        metrics
    }
}

/// Per-stage counts for the summary table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub tokens: usize,
    /// Tokens other than `Unknown`
    pub found: usize,
    pub output_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub stages: Vec<StageSummary>,
    pub total_tokens: usize,
    pub errors: usize,
    pub warnings: usize,
    pub duration_ms: f64,
}

/// Complete six-stage run over one source text
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub path: Option<PathBuf>,
    pub profile_name: String,
    pub source: String,
    pub stages: Vec<StageRecord>,
    /// Literal spans of the normalized text
    pub literal_index: LiteralIndex,
    pub diagnostics: Vec<Diagnostic>,
    pub metrics: TokenMetrics,
    pub duration: Duration,
}

impl PipelineResult {
    pub fn stage(&self, stage: Stage) -> Option<&StageRecord> {
        self.stages.iter().find(|record| record.stage == stage)
    }

    /// Text after the last executed stage
    pub fn final_text(&self) -> &str {
        self.stages
            .last()
            .map_or(self.source.as_str(), |record| record.output.text.as_str())
    }

    pub fn source_map(&self) -> SourceMap {
        SourceMap::new(self.source.as_str())
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(DiagnosticSeverity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn count_severity(&self, severity: DiagnosticSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn summary(&self) -> PipelineSummary {
        let stages: Vec<StageSummary> = self
            .stages
            .iter()
            .map(|record| StageSummary {
                stage: record.stage,
                tokens: record.output.tokens.len(),
                found: record.output.found().count(),
                output_len: record.output.text.len(),
            })
            .collect();

        PipelineSummary {
            total_tokens: stages.iter().map(|s| s.tokens).sum(),
            stages,
            errors: self.error_count(),
            warnings: self.warning_count(),
            duration_ms: self.duration.as_secs_f64() * 1000.0,
        }
    }

    pub fn log_success(&self) {
        let file = self
            .path
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string());
        crate::log_performance!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "Lexical pipeline complete",
            duration = self.duration,
            "file" => file,
            "profile" => &self.profile_name,
            "tokens" => self.metrics.total_tokens,
            "errors" => self.error_count(),
            "warnings" => self.warning_count()
        );
    }
}
