use std::fmt;

/// Storage-assigned URL of a staged audio object.
///
/// URLs are unguessable tokens minted by the storage service; possession of
/// the URL is the ownership check, there is no separate registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobUrl(String);

impl BlobUrl {
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidBlobUrl> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidBlobUrl::Empty);
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(InvalidBlobUrl::NotHttp(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used as a fallback filename when the client did
    /// not declare one.
    pub fn file_name(&self) -> Option<&str> {
        self.0
            .rsplit('/')
            .next()
            .map(|segment| segment.split('?').next().unwrap_or(segment))
            .filter(|segment| !segment.is_empty())
    }
}

impl fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidBlobUrl {
    #[error("no blob URL provided")]
    Empty,
    #[error("blob URL must be http(s): {0}")]
    NotHttp(String),
}
