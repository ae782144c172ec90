//! Sequential pipeline orchestration
//!
//! Chains retrieval, prompt composition, grounded generation, extractive
//! summarization, and speech synthesis into one strictly linear flow.
//! Retrieval, composition, and generation errors are pipeline-fatal;
//! summarization and synthesis degrade the output instead of aborting.

pub mod orchestrator;
pub mod stage;

pub use orchestrator::{Pipeline, PipelineConfig, PipelineOutcome};
pub use stage::PipelineStage;

use thiserror::Error;

/// Pipeline-fatal error, naming the stage that raised it.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: grounded_voice_core::Error,
    },
}

impl PipelineError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Stage { stage, .. } => *stage,
        }
    }
}
