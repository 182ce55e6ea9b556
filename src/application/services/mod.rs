mod transcription_pipeline;
mod upload_authorizer;

pub use transcription_pipeline::{
    CleanupStatus, PipelineConfig, PipelineError, PipelineOutcome, TranscriptionPipeline,
};
pub use upload_authorizer::{AuthorizationDenied, UploadAuthorization, UploadAuthorizer};
