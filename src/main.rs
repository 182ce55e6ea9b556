use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use diktat::application::services::{PipelineConfig, TranscriptionPipeline, UploadAuthorizer};
use diktat::infrastructure::audio::OpenAiWhisperEngine;
use diktat::infrastructure::observability::{TracingConfig, init_tracing};
use diktat::infrastructure::storage::HttpBlobStore;
use diktat::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(TracingConfig::default(), settings.server.port);

    if settings.transcription.api_key.is_none() {
        tracing::warn!(
            "OPENAI_API_KEY is not set; transcription requests will fail with a configuration error"
        );
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.limits.request_timeout_secs))
        .build()?;

    let blob_store = Arc::new(HttpBlobStore::new(
        client.clone(),
        settings.storage.api_url.clone(),
        settings.storage.write_token.clone(),
    ));

    let transcriber = Arc::new(OpenAiWhisperEngine::new(
        client,
        settings.transcription.api_key.clone().unwrap_or_default(),
        Some(settings.transcription.base_url.clone()),
        Some(settings.transcription.model.clone()),
        settings.transcription.language.clone(),
    ));

    let pipeline = Arc::new(TranscriptionPipeline::new(
        blob_store,
        transcriber,
        PipelineConfig {
            credential_configured: settings.transcription.api_key.is_some(),
            max_audio_bytes: settings.limits.max_audio_bytes,
        },
    ));

    let state = AppState {
        pipeline,
        upload_authorizer: Arc::new(UploadAuthorizer::new(settings.limits.max_audio_bytes)),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
