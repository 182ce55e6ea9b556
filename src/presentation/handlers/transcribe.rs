use axum::Json;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::ports::{BlobStore, Transcriber};
use crate::application::services::{CleanupStatus, PipelineError, PipelineOutcome};
use crate::domain::BlobUrl;
use crate::presentation::state::AppState;

/// Staged-path request body: the client uploaded the audio directly to
/// storage and hands over the resulting URL.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedTranscribeRequest {
    pub blob_url: String,
    pub filename: Option<String>,
}

#[derive(Serialize)]
pub struct TranscribeResponse {
    pub transcript: String,
    #[serde(rename = "blobDeleted", skip_serializing_if = "Option::is_none")]
    pub blob_deleted: Option<bool>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "blobDeleted", skip_serializing_if = "Option::is_none")]
    pub blob_deleted: Option<bool>,
}

impl ErrorResponse {
    pub fn message(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            blob_deleted: None,
        }
    }
}

/// One route serves both ingestion paths: a multipart body carries the
/// audio itself (small files), a JSON body carries a staged blob URL
/// (files above the platform's direct-body limit).
#[tracing::instrument(skip(state, request))]
pub async fn transcribe_handler<S, E>(
    State(state): State<AppState<S, E>>,
    request: Request,
) -> Response
where
    S: BlobStore + 'static,
    E: Transcriber + 'static,
{
    let content_type = request
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        match Multipart::from_request(request, &()).await {
            Ok(multipart) => transcribe_multipart(state, multipart).await,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::message(format!(
                        "Failed to read multipart: {}",
                        e
                    ))),
                )
                    .into_response()
            }
        }
    } else {
        match Json::<StagedTranscribeRequest>::from_request(request, &()).await {
            Ok(Json(body)) => transcribe_staged(state, body).await,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read JSON body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::message(format!("Invalid request body: {}", e))),
                )
                    .into_response()
            }
        }
    }
}

async fn transcribe_multipart<S, E>(state: AppState<S, E>, mut multipart: Multipart) -> Response
where
    S: BlobStore + 'static,
    E: Transcriber + 'static,
{
    let file = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => break field,
            Ok(Some(_)) => continue,
            Ok(None) => {
                tracing::warn!("Transcribe request without a file field");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::message("No file provided")),
                )
                    .into_response();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart field");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::message(format!(
                        "Failed to read multipart: {}",
                        e
                    ))),
                )
                    .into_response();
            }
        }
    };

    let filename = file.file_name().unwrap_or("audio").to_string();
    let content_type = file
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = match file.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::message(format!("Failed to read file: {}", e))),
            )
                .into_response();
        }
    };

    tracing::debug!(filename = %filename, content_type = %content_type, bytes = bytes.len(), "Direct audio upload received");

    let outcome = state
        .pipeline
        .transcribe_direct(&filename, &content_type, bytes.to_vec())
        .await;

    outcome_response(outcome)
}

async fn transcribe_staged<S, E>(state: AppState<S, E>, body: StagedTranscribeRequest) -> Response
where
    S: BlobStore + 'static,
    E: Transcriber + 'static,
{
    let url = match BlobUrl::parse(body.blob_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected staged transcribe request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::message(e)),
            )
                .into_response();
        }
    };

    tracing::debug!(url = %url, filename = ?body.filename, "Staged audio handed off for transcription");

    let outcome = state
        .pipeline
        .transcribe_staged(&url, body.filename.as_deref())
        .await;

    outcome_response(outcome)
}

/// The single outcome-to-response mapping: every pipeline exit, success or
/// failure, is shaped here and nowhere else.
fn outcome_response(outcome: PipelineOutcome) -> Response {
    let blob_deleted = match outcome.cleanup {
        CleanupStatus::NotApplicable => None,
        CleanupStatus::Deleted => Some(true),
        CleanupStatus::Failed => Some(false),
    };

    match (outcome.transcript, outcome.error) {
        (Some(transcript), None) => (
            StatusCode::OK,
            Json(TranscribeResponse {
                transcript,
                blob_deleted,
            }),
        )
            .into_response(),
        (_, Some(error)) => {
            let status = error_status(&error);
            tracing::warn!(%error, status = status.as_u16(), "Transcription pipeline failed");
            (
                status,
                Json(ErrorResponse {
                    error: error.to_string(),
                    blob_deleted,
                }),
            )
                .into_response()
        }
        (None, None) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to transcribe audio".to_string(),
                blob_deleted,
            }),
        )
            .into_response(),
    }
}

fn error_status(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        // Mirror the upstream status when the service answered at all.
        PipelineError::Transcription { status, .. } => status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
