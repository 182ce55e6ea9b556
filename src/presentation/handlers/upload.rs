use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::ports::{BlobStore, Transcriber};
use crate::presentation::handlers::transcribe::ErrorResponse;
use crate::presentation::state::AppState;

/// Upload handshake endpoint: the client-side upload library asks for
/// permission to write one object directly into storage. The payload is
/// opaque and forwarded as-is; the authorizer inspects only what it needs.
#[tracing::instrument(skip(state, body))]
pub async fn upload_handler<S, E>(State(state): State<AppState<S, E>>, body: Bytes) -> Response
where
    S: BlobStore + 'static,
    E: Transcriber + 'static,
{
    let handshake: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable upload handshake");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::message("malformed upload handshake")),
            )
                .into_response();
        }
    };

    match state.upload_authorizer.authorize(&handshake) {
        Ok(authorization) => {
            tracing::info!(
                max_bytes = authorization.maximum_size_in_bytes,
                "Direct upload authorized"
            );
            (StatusCode::OK, Json(authorization)).into_response()
        }
        Err(denied) => {
            tracing::warn!(error = %denied, "Upload authorization denied");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::message(denied))).into_response()
        }
    }
}
