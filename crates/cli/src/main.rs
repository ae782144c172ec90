//! Grounded voice CLI entry point
//!
//! Composition root: loads settings, initializes tracing, constructs the
//! backend clients once, runs the pipeline for one query, and prints the
//! summary.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use grounded_voice_config::{load_settings, Settings};
use grounded_voice_core::Message;
use grounded_voice_llm::{
    GenerationParams, GroundedGenerator, HttpChatBackend, HttpChatConfig,
};
use grounded_voice_pipeline::{Pipeline, PipelineConfig};
use grounded_voice_rag::{DocumentRetriever, HttpSearchBackend, SearchBackendConfig};
use grounded_voice_speech::{
    HttpSpeechBackend, RodioPlayback, SpeechBackendConfig, SpeechSynthesizer,
};
use grounded_voice_summarize::{HttpSummarizeBackend, SummarizeBackendConfig, Summarizer};

/// Ask a grounded product question and hear the answer spoken aloud.
#[derive(Parser, Debug)]
#[command(name = "grounded-voice", version, about)]
struct Args {
    /// Query to ground against the product index.
    #[arg(
        long,
        default_value = "I need a new interactive toy for 2 cats, what would you recommend?"
    )]
    query: String,

    /// Export trace spans to the configured OTLP collector.
    #[arg(long = "enable-telemetry")]
    enable_telemetry: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("GROUNDED_VOICE_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings, args.enable_telemetry);

    tracing::info!("Starting grounded-voice v{}", env!("CARGO_PKG_VERSION"));

    // Process-scoped backend clients, constructed once and shared by
    // reference with each stage.
    let search = Arc::new(HttpSearchBackend::new(SearchBackendConfig::from(
        &settings.search,
    ))?);
    let chat = Arc::new(HttpChatBackend::new(HttpChatConfig::from(&settings.chat))?);
    let summarize = Arc::new(HttpSummarizeBackend::new(SummarizeBackendConfig::from(
        &settings.language,
    ))?);
    let speech = Arc::new(HttpSpeechBackend::new(SpeechBackendConfig::from(
        &settings.speech,
    ))?);

    let pipeline = Pipeline::new(
        DocumentRetriever::new(search, settings.search.top_k),
        GroundedGenerator::new(
            chat,
            settings.chat.model.clone(),
            GenerationParams::from(&settings.chat),
        ),
        Summarizer::new(summarize),
        Arc::new(SpeechSynthesizer::new(
            speech,
            Arc::new(RodioPlayback::new()),
            settings.speech.api_key.clone(),
        )),
        PipelineConfig::from(&settings),
    );

    let outcome = pipeline.run(vec![Message::user(args.query)]).await?;

    println!("Summary: {}", outcome.summary.text);

    if outcome.synthesis.completed {
        tracing::info!("Speech synthesis completed");
    } else {
        tracing::warn!(
            reason = outcome.synthesis.failure_reason.as_deref().unwrap_or("unknown"),
            "Speech synthesis did not complete"
        );
    }

    Ok(())
}

/// Initialize tracing: fmt layer always, OTLP export when requested and
/// an endpoint is configured.
fn init_tracing(settings: &Settings, enable_telemetry: bool) {
    use opentelemetry_otlp::WithExportConfig;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("grounded_voice={}", settings.observability.log_level).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    if enable_telemetry {
        if let Some(otlp_endpoint) = &settings.observability.otlp_endpoint {
            match opentelemetry_otlp::new_pipeline()
                .tracing()
                .with_exporter(
                    opentelemetry_otlp::new_exporter()
                        .tonic()
                        .with_endpoint(otlp_endpoint),
                )
                .with_trace_config(opentelemetry_sdk::trace::Config::default().with_resource(
                    opentelemetry_sdk::Resource::new(vec![
                        opentelemetry::KeyValue::new("service.name", "grounded-voice"),
                        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                    ]),
                ))
                .install_batch(opentelemetry_sdk::runtime::Tokio)
            {
                Ok(tracer) => {
                    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
                    subscriber.with(fmt_layer).with(otel_layer).init();
                    tracing::info!(endpoint = %otlp_endpoint, "OpenTelemetry tracing enabled");
                    return;
                }
                Err(e) => eprintln!("Failed to initialize OpenTelemetry: {}. Falling back.", e),
            }
        } else {
            eprintln!("--enable-telemetry set but no OTLP endpoint configured.");
        }
    }
    subscriber.with(fmt_layer).init();
}
