use std::sync::Arc;

use crate::application::ports::{BlobStore, Transcriber};
use crate::application::services::{TranscriptionPipeline, UploadAuthorizer};

pub struct AppState<S, E>
where
    S: BlobStore,
    E: Transcriber,
{
    pub pipeline: Arc<TranscriptionPipeline<S, E>>,
    pub upload_authorizer: Arc<UploadAuthorizer>,
}

impl<S, E> Clone for AppState<S, E>
where
    S: BlobStore,
    E: Transcriber,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            upload_authorizer: Arc::clone(&self.upload_authorizer),
        }
    }
}
