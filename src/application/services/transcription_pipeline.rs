use std::sync::Arc;

use crate::application::ports::{
    BlobStore, BlobStoreError, FetchedBlob, Transcriber, TranscriberError,
};
use crate::domain::{AudioFile, BlobUrl};

/// Immutable pipeline configuration, captured once at construction. The
/// pipeline never reads ambient state at call time.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Whether the transcription credential was present at startup. Checked
    /// before any network call so a misconfigured deployment fails fast.
    pub credential_configured: bool,
    pub max_audio_bytes: u64,
}

/// Disposition of the staged object after one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStatus {
    /// No staged object was confirmed to exist, nothing to delete.
    NotApplicable,
    Deleted,
    /// The single deletion attempt failed; the object is orphaned and the
    /// failure is surfaced for operational visibility only.
    Failed,
}

/// Terminal value of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub transcript: Option<String>,
    pub cleanup: CleanupStatus,
    pub error: Option<PipelineError>,
}

impl PipelineOutcome {
    fn success(transcript: String, cleanup: CleanupStatus) -> Self {
        Self {
            transcript: Some(transcript),
            cleanup,
            error: None,
        }
    }

    fn failure(error: PipelineError, cleanup: CleanupStatus) -> Self {
        Self {
            transcript: None,
            cleanup,
            error: Some(error),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("transcription service is not configured")]
    Configuration,
    #[error("{0}")]
    Validation(String),
    #[error("failed to fetch staged audio: {0}")]
    Fetch(#[from] BlobStoreError),
    /// Upstream transcription failure. `status` is the remote status code
    /// when the service answered at all.
    #[error("{message}")]
    Transcription {
        status: Option<u16>,
        message: String,
    },
}

impl From<TranscriberError> for PipelineError {
    fn from(error: TranscriberError) -> Self {
        match error {
            TranscriberError::Api { status, message } => Self::Transcription {
                status: Some(status),
                message,
            },
            TranscriberError::RequestFailed(message) => Self::Transcription {
                status: None,
                message,
            },
        }
    }
}

/// Orchestrates one transcription request end to end:
/// fetch → size check → normalize → transcribe → cleanup.
///
/// Stages run strictly in sequence; any stage failure skips ahead to
/// cleanup and terminates the run with that stage's error. One value serves
/// one request and holds no mutable state, so concurrent requests are fully
/// independent.
pub struct TranscriptionPipeline<S, E>
where
    S: BlobStore,
    E: Transcriber,
{
    blob_store: Arc<S>,
    transcriber: Arc<E>,
    config: PipelineConfig,
}

impl<S, E> TranscriptionPipeline<S, E>
where
    S: BlobStore,
    E: Transcriber,
{
    pub fn new(blob_store: Arc<S>, transcriber: Arc<E>, config: PipelineConfig) -> Self {
        Self {
            blob_store,
            transcriber,
            config,
        }
    }

    /// Staged path: the audio was uploaded directly to storage and only its
    /// URL arrives here. Once the download has succeeded the staged object
    /// is confirmed to exist and gets exactly one deletion attempt, whatever
    /// the remaining stages do.
    pub async fn transcribe_staged(
        &self,
        url: &BlobUrl,
        declared_filename: Option<&str>,
    ) -> PipelineOutcome {
        if !self.config.credential_configured {
            return PipelineOutcome::failure(
                PipelineError::Configuration,
                CleanupStatus::NotApplicable,
            );
        }

        // Advisory probe only; the download below is authoritative.
        match self.blob_store.head(url).await {
            Ok(advertised) => {
                tracing::debug!(bytes = advertised, "staged object probe succeeded");
            }
            Err(error) => {
                tracing::warn!(%error, "staged object probe failed, attempting download anyway");
            }
        }

        let blob = match self.blob_store.fetch(url).await {
            Ok(blob) => blob,
            Err(error) => {
                return PipelineOutcome::failure(error.into(), CleanupStatus::NotApplicable);
            }
        };

        let result = self.transcribe_fetched(blob, url, declared_filename).await;
        let cleanup = self.delete_staged(url).await;

        match result {
            Ok(transcript) => PipelineOutcome::success(transcript, cleanup),
            Err(error) => PipelineOutcome::failure(error, cleanup),
        }
    }

    /// Direct path: the bytes arrived in the request body itself. No staged
    /// object exists, so there is nothing to clean up.
    pub async fn transcribe_direct(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> PipelineOutcome {
        if !self.config.credential_configured {
            return PipelineOutcome::failure(
                PipelineError::Configuration,
                CleanupStatus::NotApplicable,
            );
        }

        let result = self.run_post_fetch(filename, content_type, bytes).await;
        match result {
            Ok(transcript) => PipelineOutcome::success(transcript, CleanupStatus::NotApplicable),
            Err(error) => PipelineOutcome::failure(error, CleanupStatus::NotApplicable),
        }
    }

    async fn transcribe_fetched(
        &self,
        blob: FetchedBlob,
        url: &BlobUrl,
        declared_filename: Option<&str>,
    ) -> Result<String, PipelineError> {
        let filename = declared_filename
            .or_else(|| url.file_name())
            .unwrap_or("audio");
        let content_type = blob
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
            .to_string();
        self.run_post_fetch(filename, &content_type, blob.bytes)
            .await
    }

    /// Stages shared by both paths: size check, normalize, transcribe. The
    /// downloaded byte length is the authoritative size check; declared
    /// sizes are never trusted.
    async fn run_post_fetch(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, PipelineError> {
        if bytes.len() as u64 > self.config.max_audio_bytes {
            return Err(PipelineError::Validation(
                "File size exceeds 25MB limit".to_string(),
            ));
        }

        let audio = AudioFile::normalized(filename, content_type, bytes);
        tracing::debug!(
            filename = %audio.filename,
            content_type = %audio.content_type,
            bytes = audio.byte_len(),
            "audio normalized"
        );

        let transcript = self.transcriber.transcribe(&audio).await?;
        tracing::info!(chars = transcript.len(), "transcription completed");
        Ok(transcript)
    }

    /// Cleanup guarantor: exactly one deletion attempt, failure recorded
    /// but never escalated, no retry.
    async fn delete_staged(&self, url: &BlobUrl) -> CleanupStatus {
        match self.blob_store.delete(url).await {
            Ok(()) => {
                tracing::debug!(%url, "staged object deleted");
                CleanupStatus::Deleted
            }
            Err(error) => {
                tracing::warn!(%url, %error, "failed to delete staged object, leaving it orphaned");
                CleanupStatus::Failed
            }
        }
    }
}
