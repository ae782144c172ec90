//! Pipeline orchestrator
//!
//! One `run` call walks the stage machine from `Idle` to `Done`,
//! threading the per-invocation context through every stage. Backend
//! clients are constructed once at startup and shared by reference; the
//! orchestrator holds no mutable state across invocations.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use grounded_voice_config::Settings;
use grounded_voice_core::{GroundedResponse, Message, PipelineContext, Summary, SynthesisResult};
use grounded_voice_llm::{compose, GroundedGenerator, PromptTemplate};
use grounded_voice_rag::DocumentRetriever;
use grounded_voice_speech::{SpeechError, SpeechSynthesizer};
use grounded_voice_summarize::Summarizer;

use crate::stage::PipelineStage;
use crate::PipelineError;

/// Orchestrator configuration derived from settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory containing prompt template assets
    pub asset_dir: String,
    /// Grounded chat template name
    pub template_name: String,
    /// Sentence bound for the extractive summary
    pub max_sentences: usize,
    /// Voice used for synthesis
    pub voice_name: String,
    /// Region used to address the synthesis backend
    pub region: String,
}

impl From<&Settings> for PipelineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            asset_dir: settings.assets.dir.clone(),
            template_name: settings.assets.grounded_chat_template.clone(),
            max_sentences: settings.summary.max_sentences,
            voice_name: settings.speech.voice_name.clone(),
            region: settings.speech.region.clone(),
        }
    }
}

/// Result of one full pipeline invocation.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The grounded response (chat-protocol compliant, reusable as history)
    pub response: GroundedResponse,
    /// Bounded extractive summary, possibly degraded
    pub summary: Summary,
    /// Synthesis outcome; audio itself is a side effect
    pub synthesis: SynthesisResult,
    /// Terminal stage, `Done` on any successful return
    pub stage: PipelineStage,
}

/// Sequential orchestrator over the four external capabilities.
pub struct Pipeline {
    retriever: DocumentRetriever,
    generator: GroundedGenerator,
    summarizer: Summarizer,
    synthesizer: Arc<SpeechSynthesizer>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        retriever: DocumentRetriever,
        generator: GroundedGenerator,
        summarizer: Summarizer,
        synthesizer: Arc<SpeechSynthesizer>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            retriever,
            generator,
            summarizer,
            synthesizer,
            config,
        }
    }

    /// Run the full pipeline for one conversation.
    ///
    /// Retrieval, composition, and generation errors abort the run
    /// (`Failed`). Summarization and synthesis failures degrade the
    /// outcome and the run still reaches `Done`.
    pub async fn run(&self, conversation: Vec<Message>) -> Result<PipelineOutcome, PipelineError> {
        let mut context = PipelineContext::new();

        let mut stage = PipelineStage::Idle;

        stage = advance(stage, PipelineStage::Retrieving);
        let documents = traced(stage, self.retriever.retrieve(&conversation, &mut context))
            .await
            .map_err(|e| fatal(stage, e))?;

        stage = advance(stage, PipelineStage::Composing);
        let messages = traced(stage, async {
            let template =
                PromptTemplate::from_asset(&self.config.asset_dir, &self.config.template_name)?;
            let mut messages = compose(&template, &documents, &context);
            messages.extend(conversation);
            Ok::<_, grounded_voice_llm::LlmError>(messages)
        })
        .await
        .map_err(|e| fatal(stage, e))?;

        stage = advance(stage, PipelineStage::Generating);
        let response = traced(stage, self.generator.generate(&messages, &mut context))
            .await
            .map_err(|e| fatal(stage, e))?;

        stage = advance(stage, PipelineStage::Summarizing);
        let summary = traced(
            stage,
            self.summarizer
                .summarize(&response.message.content, self.config.max_sentences),
        )
        .await
        .map_err(|e| fatal(stage, e))?;

        stage = advance(stage, PipelineStage::Synthesizing);
        let synthesis = traced(stage, async {
            match self
                .synthesizer
                .synthesize(&summary.text, &self.config.voice_name, &self.config.region)
                .await
            {
                Ok(result) => Ok::<_, SpeechError>(result),
                // Credential and argument failures end the stage, not the
                // pipeline; the caller sees a failed SynthesisResult.
                Err(err @ SpeechError::Credential(_))
                | Err(err @ SpeechError::InvalidArgument(_)) => {
                    tracing::error!(error = %err, "Synthesis stage failed");
                    Ok(SynthesisResult::canceled(err.to_string()))
                }
                Err(err) => Ok(SynthesisResult::canceled(err.to_string())),
            }
        })
        .await
        .map_err(|e| fatal(stage, e))?;

        let stage = advance(stage, PipelineStage::Done);

        Ok(PipelineOutcome {
            response,
            summary,
            synthesis,
            stage,
        })
    }
}

/// Transition the stage machine, asserting legality in debug builds.
fn advance(from: PipelineStage, to: PipelineStage) -> PipelineStage {
    debug_assert!(
        from.can_transition_to(to),
        "illegal transition {} -> {}",
        from,
        to
    );
    to
}

fn fatal(stage: PipelineStage, err: impl Into<grounded_voice_core::Error>) -> PipelineError {
    PipelineError::Stage {
        stage,
        source: err.into(),
    }
}

/// Stage middleware: wraps a stage future in a named span, records the
/// duration and outcome, and propagates any error unchanged. Stage
/// content never reaches the span; only outcome metadata does.
async fn traced<T, E, F>(stage: PipelineStage, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let span = tracing::info_span!("pipeline_stage", stage = %stage);
    async move {
        let start = Instant::now();
        let result = fut.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => tracing::info!(elapsed_ms, outcome = "success", "Stage complete"),
            Err(err) => {
                tracing::error!(elapsed_ms, outcome = "failure", error = %err, "Stage failed")
            }
        }
        result
    }
    .instrument(span)
    .await
}
