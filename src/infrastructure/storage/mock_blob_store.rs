use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{BlobStore, BlobStoreError, FetchedBlob};
use crate::domain::BlobUrl;

/// In-memory blob store for tests. Counts deletion attempts so tests can
/// assert the exactly-once cleanup property.
#[derive(Default)]
pub struct MockBlobStore {
    objects: Mutex<HashMap<String, (Vec<u8>, Option<String>)>>,
    delete_attempts: AtomicUsize,
    fail_head: bool,
    fail_delete: bool,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, url: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(url.to_string(), (bytes, content_type.map(str::to_string)));
        self
    }

    /// Makes `head` report absence even for objects that `fetch` can see.
    pub fn failing_head(mut self) -> Self {
        self.fail_head = true;
        self
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn delete_attempts(&self) -> usize {
        self.delete_attempts.load(Ordering::SeqCst)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.objects.lock().unwrap().contains_key(url)
    }
}

#[async_trait::async_trait]
impl BlobStore for MockBlobStore {
    async fn head(&self, url: &BlobUrl) -> Result<u64, BlobStoreError> {
        if self.fail_head {
            return Err(BlobStoreError::NotFound(url.to_string()));
        }
        let objects = self.objects.lock().unwrap();
        match objects.get(url.as_str()) {
            Some((bytes, _)) => Ok(bytes.len() as u64),
            None => Err(BlobStoreError::NotFound(url.to_string())),
        }
    }

    async fn fetch(&self, url: &BlobUrl) -> Result<FetchedBlob, BlobStoreError> {
        let objects = self.objects.lock().unwrap();
        match objects.get(url.as_str()) {
            Some((bytes, content_type)) => Ok(FetchedBlob {
                bytes: bytes.clone(),
                content_type: content_type.clone(),
            }),
            None => Err(BlobStoreError::NotFound(url.to_string())),
        }
    }

    async fn delete(&self, url: &BlobUrl) -> Result<(), BlobStoreError> {
        self.delete_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(BlobStoreError::DeleteFailed("simulated failure".to_string()));
        }
        match self.objects.lock().unwrap().remove(url.as_str()) {
            Some(_) => Ok(()),
            None => Err(BlobStoreError::DeleteFailed(format!(
                "object already gone: {}",
                url
            ))),
        }
    }
}
