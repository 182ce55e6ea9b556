use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use crate::application::ports::{BlobStore, BlobStoreError, FetchedBlob};
use crate::domain::BlobUrl;

/// Blob storage reached over plain HTTP: staged objects are readable at
/// their unguessable URL, deletion goes through the storage API with a
/// write token.
pub struct HttpBlobStore {
    client: reqwest::Client,
    api_url: String,
    write_token: Option<String>,
}

impl HttpBlobStore {
    pub fn new(client: reqwest::Client, api_url: String, write_token: Option<String>) -> Self {
        Self {
            client,
            api_url,
            write_token,
        }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn head(&self, url: &BlobUrl) -> Result<u64, BlobStoreError> {
        let response = self
            .client
            .head(url.as_str())
            .send()
            .await
            .map_err(|e| BlobStoreError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(BlobStoreError::NotFound(url.to_string())),
            status if !status.is_success() => Err(BlobStoreError::FetchFailed {
                status: status.as_u16(),
            }),
            _ => Ok(response.content_length().unwrap_or(0)),
        }
    }

    async fn fetch(&self, url: &BlobUrl) -> Result<FetchedBlob, BlobStoreError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| BlobStoreError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(BlobStoreError::NotFound(url.to_string())),
            status if !status.is_success() => {
                return Err(BlobStoreError::FetchFailed {
                    status: status.as_u16(),
                });
            }
            _ => {}
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BlobStoreError::RequestFailed(e.to_string()))?;

        tracing::debug!(url = %url, bytes = bytes.len(), "staged object downloaded");

        Ok(FetchedBlob {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    async fn delete(&self, url: &BlobUrl) -> Result<(), BlobStoreError> {
        let token = self
            .write_token
            .as_deref()
            .ok_or_else(|| BlobStoreError::DeleteFailed("write token not configured".to_string()))?;

        let response = self
            .client
            .post(format!("{}/delete", self.api_url))
            .bearer_auth(token)
            .json(&serde_json::json!({ "urls": [url.as_str()] }))
            .send()
            .await
            .map_err(|e| BlobStoreError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BlobStoreError::DeleteFailed(format!(
                "status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
