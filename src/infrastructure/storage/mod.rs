mod http_blob_store;
mod mock_blob_store;

pub use http_blob_store::HttpBlobStore;
pub use mock_blob_store::MockBlobStore;
