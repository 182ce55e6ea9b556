mod blob_store;
mod transcriber;

pub use blob_store::{BlobStore, BlobStoreError, FetchedBlob};
pub use transcriber::{Transcriber, TranscriberError};
