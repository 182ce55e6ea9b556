use async_trait::async_trait;

use crate::domain::BlobUrl;

/// A staged audio object as downloaded from storage. Content type and byte
/// length are what storage reported, not what the client declared.
#[derive(Debug, Clone)]
pub struct FetchedBlob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Existence/metadata probe, returning the advertised byte length.
    ///
    /// Advisory only: probe and download are independent code paths that
    /// can disagree under eventually-consistent storage, so callers must
    /// not treat a failed probe as fatal without attempting `fetch`.
    async fn head(&self, url: &BlobUrl) -> Result<u64, BlobStoreError>;

    async fn fetch(&self, url: &BlobUrl) -> Result<FetchedBlob, BlobStoreError>;

    /// Deletes the staged object. Deleting an already-deleted object may
    /// report failure; callers tolerate it.
    async fn delete(&self, url: &BlobUrl) -> Result<(), BlobStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("staged object not found: {0}")]
    NotFound(String),
    #[error("storage returned status {status}")]
    FetchFailed { status: u16 },
    #[error("storage request failed: {0}")]
    RequestFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}
