use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{Transcriber, TranscriberError};
use crate::domain::AudioFile;

enum Behavior {
    Succeed(String),
    FailApi { status: u16, message: String },
    FailRequest(String),
}

/// Canned transcription engine for tests; counts calls and records the
/// metadata of the last payload it saw.
pub struct MockTranscriber {
    behavior: Behavior,
    calls: AtomicUsize,
    last_payload: Mutex<Option<(String, String)>>,
}

impl MockTranscriber {
    pub fn succeeding(transcript: &str) -> Self {
        Self::with_behavior(Behavior::Succeed(transcript.to_string()))
    }

    pub fn failing_with_status(status: u16, message: &str) -> Self {
        Self::with_behavior(Behavior::FailApi {
            status,
            message: message.to_string(),
        })
    }

    pub fn failing_to_connect(message: &str) -> Self {
        Self::with_behavior(Behavior::FailRequest(message.to_string()))
    }

    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(filename, content_type)` of the most recent payload, if any.
    pub fn last_payload(&self) -> Option<(String, String)> {
        self.last_payload.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &AudioFile) -> Result<String, TranscriberError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() =
            Some((audio.filename.clone(), audio.content_type.clone()));
        match &self.behavior {
            Behavior::Succeed(transcript) => Ok(transcript.clone()),
            Behavior::FailApi { status, message } => Err(TranscriberError::Api {
                status: *status,
                message: message.clone(),
            }),
            Behavior::FailRequest(message) => {
                Err(TranscriberError::RequestFailed(message.clone()))
            }
        }
    }
}
