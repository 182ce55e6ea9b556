use axum::Router;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use diktat::application::ports::{Transcriber, TranscriberError};
use diktat::domain::AudioFile;
use diktat::infrastructure::audio::OpenAiWhisperEngine;

async fn start_mock_whisper_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/audio/transcriptions",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn engine(base_url: &str) -> OpenAiWhisperEngine {
    OpenAiWhisperEngine::new(
        reqwest::Client::new(),
        "test-key".to_string(),
        Some(base_url.to_string()),
        None,
        "de".to_string(),
    )
}

fn sample_audio() -> AudioFile {
    AudioFile::normalized("voice.ogg", "audio/ogg", b"fake audio bytes".to_vec())
}

#[tokio::test]
async fn given_valid_audio_when_transcribing_then_returns_trimmed_text() {
    let (base_url, shutdown_tx) = start_mock_whisper_server(200, "Hallo Welt\n").await;

    let result = engine(&base_url).transcribe(&sample_audio()).await;

    assert_eq!(result.unwrap(), "Hallo Welt");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_api_error_body_when_transcribing_then_forwards_upstream_message_and_status() {
    let response_body = r#"{"error": {"message": "Invalid file format.", "type": "invalid_request_error"}}"#;
    let (base_url, shutdown_tx) = start_mock_whisper_server(400, response_body).await;

    let result = engine(&base_url).transcribe(&sample_audio()).await;

    match result {
        Err(TranscriberError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid file format.");
        }
        other => panic!("expected api error, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_json_error_body_when_transcribing_then_raw_body_is_the_message() {
    let (base_url, shutdown_tx) = start_mock_whisper_server(503, "service warming up").await;

    let result = engine(&base_url).transcribe(&sample_audio()).await;

    match result {
        Err(TranscriberError::Api { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "service warming up");
        }
        other => panic!("expected api error, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_empty_error_body_when_transcribing_then_falls_back_to_generic_message() {
    let (base_url, shutdown_tx) = start_mock_whisper_server(500, "").await;

    let result = engine(&base_url).transcribe(&sample_audio()).await;

    match result {
        Err(TranscriberError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to transcribe audio");
        }
        other => panic!("expected api error, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_server_when_transcribing_then_request_failed() {
    let result = engine("http://127.0.0.1:1").transcribe(&sample_audio()).await;

    assert!(matches!(result, Err(TranscriberError::RequestFailed(_))));
}
