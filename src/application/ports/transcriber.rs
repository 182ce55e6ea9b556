use async_trait::async_trait;

use crate::domain::AudioFile;

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Issues one request to the speech-to-text service and returns the
    /// transcript text.
    async fn transcribe(&self, audio: &AudioFile) -> Result<String, TranscriberError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriberError {
    /// The service answered with an error status. The message is the
    /// upstream message verbatim when one was provided; it is the most
    /// actionable diagnostic the caller can get.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The request could not be completed (network failure, timeout).
    #[error("transcription request failed: {0}")]
    RequestFailed(String),
}
