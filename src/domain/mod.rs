mod audio_file;
mod blob_url;

pub use audio_file::{AudioFile, normalize_metadata};
pub use blob_url::{BlobUrl, InvalidBlobUrl};
