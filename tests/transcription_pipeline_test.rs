use std::sync::Arc;

use diktat::application::services::{
    CleanupStatus, PipelineConfig, PipelineError, TranscriptionPipeline,
};
use diktat::domain::BlobUrl;
use diktat::infrastructure::audio::MockTranscriber;
use diktat::infrastructure::storage::MockBlobStore;

const STAGED_URL: &str = "https://blob.example.com/a1b2c3d4/voice.opus";
const CEILING: u64 = 4096;

fn pipeline(
    store: Arc<MockBlobStore>,
    engine: Arc<MockTranscriber>,
    credential_configured: bool,
) -> TranscriptionPipeline<MockBlobStore, MockTranscriber> {
    TranscriptionPipeline::new(
        store,
        engine,
        PipelineConfig {
            credential_configured,
            max_audio_bytes: CEILING,
        },
    )
}

fn staged_url() -> BlobUrl {
    BlobUrl::parse(STAGED_URL).unwrap()
}

#[tokio::test]
async fn given_staged_audio_when_transcribed_then_succeeds_and_deletes_exactly_once() {
    let store = Arc::new(
        MockBlobStore::new().with_object(STAGED_URL, vec![1u8; 1024], Some("audio/opus")),
    );
    let engine = Arc::new(MockTranscriber::succeeding("Guten Tag"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), Some("voice.opus"))
        .await;

    assert_eq!(outcome.transcript.as_deref(), Some("Guten Tag"));
    assert_eq!(outcome.cleanup, CleanupStatus::Deleted);
    assert!(outcome.error.is_none());
    assert_eq!(store.delete_attempts(), 1);
    assert!(!store.contains(STAGED_URL));
}

#[tokio::test]
async fn given_staged_audio_when_transcribed_then_metadata_is_normalized_first() {
    let store = Arc::new(
        MockBlobStore::new().with_object(STAGED_URL, vec![1u8; 512], Some("audio/opus")),
    );
    let engine = Arc::new(MockTranscriber::succeeding("ok"));

    pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), Some("voice.opus"))
        .await;

    assert_eq!(
        engine.last_payload(),
        Some(("voice.ogg".to_string(), "audio/ogg".to_string()))
    );
}

#[tokio::test]
async fn given_no_declared_filename_when_transcribing_then_falls_back_to_url_segment() {
    let store = Arc::new(
        MockBlobStore::new().with_object(STAGED_URL, vec![1u8; 512], Some("audio/opus")),
    );
    let engine = Arc::new(MockTranscriber::succeeding("ok"));

    pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), None)
        .await;

    let (filename, _) = engine.last_payload().unwrap();
    assert_eq!(filename, "voice.ogg");
}

#[tokio::test]
async fn given_oversize_download_when_transcribing_then_validation_error_and_cleanup_still_runs() {
    let store = Arc::new(MockBlobStore::new().with_object(
        STAGED_URL,
        vec![0u8; (CEILING + 1) as usize],
        Some("audio/mpeg"),
    ));
    let engine = Arc::new(MockTranscriber::succeeding("never reached"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), Some("big.mp3"))
        .await;

    assert!(matches!(outcome.error, Some(PipelineError::Validation(_))));
    assert_eq!(outcome.cleanup, CleanupStatus::Deleted);
    assert_eq!(store.delete_attempts(), 1);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn given_upstream_failure_when_transcribing_then_cleanup_still_runs_exactly_once() {
    let store = Arc::new(
        MockBlobStore::new().with_object(STAGED_URL, vec![1u8; 256], Some("audio/wav")),
    );
    let engine = Arc::new(MockTranscriber::failing_with_status(502, "upstream exploded"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), Some("a.wav"))
        .await;

    match outcome.error {
        Some(PipelineError::Transcription { status, message }) => {
            assert_eq!(status, Some(502));
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("expected transcription error, got {:?}", other),
    }
    assert_eq!(outcome.cleanup, CleanupStatus::Deleted);
    assert_eq!(store.delete_attempts(), 1);
}

#[tokio::test]
async fn given_delete_failure_when_transcription_succeeded_then_success_is_not_downgraded() {
    let store = Arc::new(
        MockBlobStore::new()
            .with_object(STAGED_URL, vec![1u8; 256], Some("audio/wav"))
            .failing_delete(),
    );
    let engine = Arc::new(MockTranscriber::succeeding("noch da"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), Some("a.wav"))
        .await;

    assert_eq!(outcome.transcript.as_deref(), Some("noch da"));
    assert!(outcome.error.is_none());
    assert_eq!(outcome.cleanup, CleanupStatus::Failed);
    assert_eq!(store.delete_attempts(), 1);
}

#[tokio::test]
async fn given_missing_credential_when_transcribing_then_fails_before_any_storage_call() {
    let store = Arc::new(
        MockBlobStore::new().with_object(STAGED_URL, vec![1u8; 256], Some("audio/wav")),
    );
    let engine = Arc::new(MockTranscriber::succeeding("unreachable"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), false)
        .transcribe_staged(&staged_url(), None)
        .await;

    assert!(matches!(outcome.error, Some(PipelineError::Configuration)));
    assert_eq!(outcome.cleanup, CleanupStatus::NotApplicable);
    assert_eq!(store.delete_attempts(), 0);
    assert!(store.contains(STAGED_URL));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn given_failing_probe_when_download_succeeds_then_probe_is_advisory_only() {
    let store = Arc::new(
        MockBlobStore::new()
            .with_object(STAGED_URL, vec![1u8; 256], Some("audio/ogg"))
            .failing_head(),
    );
    let engine = Arc::new(MockTranscriber::succeeding("trotzdem da"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), Some("voice.ogg"))
        .await;

    assert_eq!(outcome.transcript.as_deref(), Some("trotzdem da"));
    assert_eq!(outcome.cleanup, CleanupStatus::Deleted);
}

#[tokio::test]
async fn given_absent_object_when_fetching_then_no_deletion_is_attempted() {
    let store = Arc::new(MockBlobStore::new());
    let engine = Arc::new(MockTranscriber::succeeding("unreachable"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), None)
        .await;

    assert!(matches!(outcome.error, Some(PipelineError::Fetch(_))));
    assert_eq!(outcome.cleanup, CleanupStatus::NotApplicable);
    assert_eq!(store.delete_attempts(), 0);
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn given_direct_upload_when_transcribed_then_no_cleanup_is_involved() {
    let store = Arc::new(MockBlobStore::new());
    let engine = Arc::new(MockTranscriber::succeeding("direkt"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_direct("speech.mp3", "audio/mpeg", vec![1u8; 1024])
        .await;

    assert_eq!(outcome.transcript.as_deref(), Some("direkt"));
    assert_eq!(outcome.cleanup, CleanupStatus::NotApplicable);
    assert_eq!(store.delete_attempts(), 0);
}

#[tokio::test]
async fn given_oversize_direct_upload_when_transcribing_then_validation_error() {
    let store = Arc::new(MockBlobStore::new());
    let engine = Arc::new(MockTranscriber::succeeding("never"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_direct("big.mp3", "audio/mpeg", vec![0u8; (CEILING + 1) as usize])
        .await;

    assert!(matches!(outcome.error, Some(PipelineError::Validation(_))));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn given_network_failure_when_transcribing_then_error_carries_no_status() {
    let store = Arc::new(
        MockBlobStore::new().with_object(STAGED_URL, vec![1u8; 256], Some("audio/wav")),
    );
    let engine = Arc::new(MockTranscriber::failing_to_connect("connection refused"));

    let outcome = pipeline(Arc::clone(&store), Arc::clone(&engine), true)
        .transcribe_staged(&staged_url(), Some("a.wav"))
        .await;

    match outcome.error {
        Some(PipelineError::Transcription { status, .. }) => assert_eq!(status, None),
        other => panic!("expected transcription error, got {:?}", other),
    }
    assert_eq!(outcome.cleanup, CleanupStatus::Deleted);
}
