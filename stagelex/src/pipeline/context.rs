use super::error::PipelineError;
use super::result::StageRecord;
use super::stage::Stage;
use crate::grammar::LanguageProfile;
use crate::lexical::{
    classify_constants, classify_symbols, classify_words, normalize_whitespace, scan_literals,
    strip_comments, LiteralIndex,
};
use crate::logging::codes;
use crate::tokens::{StageOutput, TokenKind};
use crate::utils::OffsetMap;
use std::time::Instant;

/// Explicit state of one pipeline run
///
/// Holds the current stage and text, the offset map from the current text to
/// the raw source, and the literal index of the normalized text (built on
/// the first classification stage). Stages run strictly forward.
#[derive(Debug, Clone)]
pub struct PipelineContext<'p> {
    profile: &'p LanguageProfile,
    stage: Stage,
    text: String,
    origin: OffsetMap,
    literals: Option<LiteralIndex>,
    /// Word scan shared by the keyword and identifier stages
    words: Option<StageOutput>,
    log_transitions: bool,
}

impl<'p> PipelineContext<'p> {
    pub fn new(source: &str, profile: &'p LanguageProfile) -> Self {
        Self {
            profile,
            stage: Stage::Raw,
            text: source.to_string(),
            origin: OffsetMap::identity(source.len()),
            literals: None,
            words: None,
            log_transitions: false,
        }
    }

    /// Log a success event for every transition
    pub fn with_transition_logging(mut self, enabled: bool) -> Self {
        self.log_transitions = enabled;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Maps offsets of the current text to the raw source
    pub fn origin(&self) -> &OffsetMap {
        &self.origin
    }

    pub fn literal_index(&self) -> Option<&LiteralIndex> {
        self.literals.as_ref()
    }

    pub fn profile(&self) -> &LanguageProfile {
        self.profile
    }

    pub fn is_complete(&self) -> bool {
        self.stage.is_final()
    }

    /// Run `stage`, which must be the successor of the current stage
    pub fn run(&mut self, stage: Stage) -> Result<StageRecord, PipelineError> {
        match self.stage.next() {
            None => Err(PipelineError::PipelineComplete),
            Some(expected) if expected != stage => Err(PipelineError::StageOutOfOrder {
                requested: stage,
                current: self.stage,
            }),
            Some(_) => Ok(self.execute(stage)),
        }
    }

    /// Run the next stage
    pub fn advance(&mut self) -> Result<StageRecord, PipelineError> {
        let next = self.stage.next().ok_or(PipelineError::PipelineComplete)?;
        self.run(next)
    }

    /// Run every stage up to and including `target`
    pub fn run_to(&mut self, target: Stage) -> Result<Vec<StageRecord>, PipelineError> {
        if target <= self.stage {
            return Err(PipelineError::StageOutOfOrder {
                requested: target,
                current: self.stage,
            });
        }
        let mut records = Vec::new();
        while self.stage < target {
            records.push(self.advance()?);
        }
        Ok(records)
    }

    /// Run every remaining stage
    pub fn run_remaining(&mut self) -> Vec<StageRecord> {
        let mut records = Vec::new();
        while let Some(next) = self.stage.next() {
            records.push(self.execute(next));
        }
        records
    }

    fn execute(&mut self, stage: Stage) -> StageRecord {
        let started = Instant::now();
        let output = match stage {
            Stage::Raw => StageOutput::passthrough(&self.text, Vec::new()),
            Stage::CommentsStripped => strip_comments(&self.text),
            Stage::WhitespaceNormalized => normalize_whitespace(&self.text),
            Stage::ConstantsTagged => {
                let index = self.literal_index_for_text();
                classify_constants(&self.text, index.ranges())
            }
            Stage::KeywordsTagged => self.word_scan_keeping(TokenKind::Keyword),
            Stage::IdentifiersTagged => self.word_scan_keeping(TokenKind::Identifier),
            Stage::SymbolsTagged => {
                let index = self.literal_index_for_text();
                classify_symbols(&self.text, index.literals(), &self.profile.symbols)
            }
        };
        let duration = started.elapsed();

        let record = StageRecord {
            stage,
            input: std::mem::take(&mut self.text),
            input_origin: self.origin.clone(),
            output,
            duration,
        };

        self.origin = record.output.origin.then(&self.origin);
        self.text = record.output.text.clone();
        self.stage = stage;

        if self.log_transitions {
            crate::log_success!(codes::success::STAGE_COMPLETE, "Stage complete",
                "stage" => stage,
                "tokens" => record.output.tokens.len(),
                "output_bytes" => record.output.text.len(),
                "duration_us" => duration.as_micros()
            );
        }
        record
    }

    /// Literal index of the current text, built once
    ///
    /// Classification stages never change the text, so the index built for
    /// the first of them serves all.
    fn literal_index_for_text(&mut self) -> LiteralIndex {
        self.literals
            .get_or_insert_with(|| scan_literals(&self.text))
            .clone()
    }

    fn word_scan_keeping(&mut self, kind: TokenKind) -> StageOutput {
        let literals = self.literal_index_for_text();
        let mut scan = match self.words.take() {
            Some(scan) => scan,
            None => {
                let scan = classify_words(&self.text, literals.literals(), &self.profile.keywords);
                if kind == TokenKind::Keyword {
                    self.words = Some(scan.clone());
                }
                scan
            }
        };
        scan.retain_tokens(|token| token.kind == kind);
        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_stages_must_run_in_order() {
        let profile = LanguageProfile::cpp();
        let mut ctx = PipelineContext::new("int x;", &profile);

        assert_matches!(
            ctx.run(Stage::ConstantsTagged),
            Err(PipelineError::StageOutOfOrder {
                requested: Stage::ConstantsTagged,
                current: Stage::Raw
            })
        );
        assert_eq!(ctx.stage(), Stage::Raw);

        let record = ctx.run(Stage::CommentsStripped).unwrap();
        assert_eq!(record.stage, Stage::CommentsStripped);
        assert_matches!(
            ctx.run(Stage::CommentsStripped),
            Err(PipelineError::StageOutOfOrder { .. })
        );
    }

    #[test]
    fn test_no_transition_after_final_stage() {
        let profile = LanguageProfile::cpp();
        let mut ctx = PipelineContext::new("a+b", &profile);
        let records = ctx.run_remaining();
        assert_eq!(records.len(), 6);
        assert!(ctx.is_complete());
        assert_matches!(ctx.advance(), Err(PipelineError::PipelineComplete));
        assert_matches!(ctx.run(Stage::Raw), Err(PipelineError::PipelineComplete));
    }

    #[test]
    fn test_keyword_and_identifier_stages_split_words() {
        let profile = LanguageProfile::cpp();
        let mut ctx = PipelineContext::new("int count = 0;", &profile);
        let records = ctx.run_to(Stage::IdentifiersTagged).unwrap();

        let keywords = &records[3];
        let identifiers = &records[4];
        assert_eq!(keywords.stage, Stage::KeywordsTagged);
        assert_eq!(keywords.output.lexemes(TokenKind::Keyword), vec!["int"]);
        assert!(keywords.output.of_kind(TokenKind::Identifier).next().is_none());
        assert_eq!(identifiers.output.lexemes(TokenKind::Identifier), vec!["count"]);
        assert!(identifiers.output.of_kind(TokenKind::Keyword).next().is_none());
    }

    #[test]
    fn test_origin_reaches_raw_source() {
        let profile = LanguageProfile::cpp();
        let source = "/* c */\n  int   x;";
        let mut ctx = PipelineContext::new(source, &profile);
        ctx.run_to(Stage::WhitespaceNormalized).unwrap();

        assert_eq!(ctx.text(), "int x;");
        let x = ctx.text().find('x').unwrap();
        assert_eq!(ctx.origin().to_source(x), source.find('x').unwrap());
    }

    #[test]
    fn test_run_to_rejects_past_target() {
        let profile = LanguageProfile::cpp();
        let mut ctx = PipelineContext::new("x", &profile);
        ctx.run_to(Stage::ConstantsTagged).unwrap();
        assert!(ctx.literal_index().is_some());
        assert_matches!(
            ctx.run_to(Stage::WhitespaceNormalized),
            Err(PipelineError::StageOutOfOrder { .. })
        );
    }
}
