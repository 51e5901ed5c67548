//! Serializable report of a pipeline run for display and JSON output

use super::result::{PipelineResult, PipelineSummary, StageRecord};
use super::stage::Stage;
use crate::diagnostics::Diagnostic;
use crate::lexical::TokenMetrics;
use crate::tokens::TokenKind;
use crate::utils::{SourceMap, Span};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenReport {
    pub kind: TokenKind,
    pub lexeme: String,
    /// Span in the stage's input text
    pub span: Span,
    /// Span in the raw source
    pub source_span: Span,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: Stage,
    pub title: String,
    pub input: String,
    pub output: String,
    pub tokens: Vec<TokenReport>,
    pub duration_us: u128,
}

impl StageReport {
    fn from_record(record: &StageRecord, map: &SourceMap) -> Self {
        let tokens = record
            .output
            .tokens
            .iter()
            .map(|token| {
                let source_span = record.raw_span(token);
                let position = map.position_at(source_span.start);
                TokenReport {
                    kind: token.kind,
                    lexeme: token.lexeme.clone(),
                    span: token.span,
                    source_span,
                    line: position.line,
                    column: position.column,
                }
            })
            .collect();

        Self {
            stage: record.stage,
            title: record.stage.title().to_string(),
            input: record.input.clone(),
            output: record.output.text.clone(),
            tokens,
            duration_us: record.duration.as_micros(),
        }
    }
}

/// Everything the display side needs, with a run id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub source_path: Option<String>,
    pub profile: String,
    pub stages: Vec<StageReport>,
    pub diagnostics: Vec<Diagnostic>,
    pub summary: PipelineSummary,
    pub metrics: TokenMetrics,
}

impl PipelineReport {
    pub fn from_result(result: &PipelineResult) -> Self {
        let map = result.source_map();
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            source_path: result.path.as_ref().map(|p| p.display().to_string()),
            profile: result.profile_name.clone(),
            stages: result
                .stages
                .iter()
                .map(|record| StageReport::from_record(record, &map))
                .collect(),
            diagnostics: result.diagnostics.clone(),
            summary: result.summary(),
            metrics: result.metrics.clone(),
        }
    }

    /// Report limited to one stage, keeping diagnostics and summary
    pub fn only_stage(mut self, stage: Stage) -> Self {
        self.stages.retain(|report| report.stage == stage);
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::LanguageProfile;
    use crate::pipeline::process_source;

    #[test]
    fn test_report_carries_raw_positions() {
        let result = process_source("// c\nint x=5;", &LanguageProfile::cpp());
        let report = PipelineReport::from_result(&result);

        assert_eq!(report.stages.len(), 6);
        assert_eq!(report.profile, "cpp");
        let constants = &report.stages[2];
        assert_eq!(constants.stage, Stage::ConstantsTagged);
        assert_eq!(constants.tokens.len(), 1);
        assert_eq!(constants.tokens[0].lexeme, "5");
        assert_eq!((constants.tokens[0].line, constants.tokens[0].column), (2, 7));
    }

    #[test]
    fn test_json_round_trip() {
        let result = process_source("a >>= 1;", &LanguageProfile::cpp());
        let json = PipelineReport::from_result(&result)
            .only_stage(Stage::SymbolsTagged)
            .to_json()
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stages"][0]["stage"], "symbols-tagged");
        assert_eq!(value["stages"][0]["tokens"][0]["lexeme"], ">>=");
        assert_eq!(value["stages"][0]["tokens"][0]["kind"], "operator");
        assert_eq!(value["run_id"].as_str().map(str::len), Some(36));
    }
}
