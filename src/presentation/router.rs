use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{BlobStore, Transcriber};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::config::MAX_AUDIO_BYTES;
use crate::presentation::handlers::{health_handler, transcribe_handler, upload_handler};
use crate::presentation::state::AppState;

/// Direct multipart bodies may carry the full audio ceiling plus form
/// overhead; anything larger belongs on the staged path.
const DIRECT_BODY_LIMIT: usize = MAX_AUDIO_BYTES as usize + 1024 * 1024;

pub fn create_router<S, E>(state: AppState<S, E>) -> Router
where
    S: BlobStore + 'static,
    E: Transcriber + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/upload", post(upload_handler::<S, E>))
        .route("/api/v1/transcribe", post(transcribe_handler::<S, E>))
        .layer(DefaultBodyLimit::max(DIRECT_BODY_LIMIT))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
