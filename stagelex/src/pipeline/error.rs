use super::stage::Stage;
use crate::grammar::ProfileError;
use crate::logging::codes;
use crate::source::SourceError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Source acquisition failed: {0}")]
    Source(#[from] SourceError),

    #[error("Language profile failed to load: {0}")]
    Profile(#[from] ProfileError),

    #[error("Stage {requested} cannot run from {current}; stages run strictly in order")]
    StageOutOfOrder { requested: Stage, current: Stage },

    #[error("Pipeline already reached {}", Stage::SymbolsTagged)]
    PipelineComplete,
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::Source(e) => e.error_code(),
            PipelineError::Profile(e) => e.error_code(),
            PipelineError::StageOutOfOrder { .. } => codes::pipeline::STAGE_OUT_OF_ORDER,
            PipelineError::PipelineComplete => codes::pipeline::PIPELINE_ALREADY_COMPLETE,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }
}
