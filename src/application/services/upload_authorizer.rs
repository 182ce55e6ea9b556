use serde::Serialize;
use uuid::Uuid;

/// Content types the upload endpoint will vouch for. The wildcard keeps the
/// list permissive for less common audio containers.
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "audio/opus",
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/mp4",
    "audio/m4a",
    "audio/ogg",
    "audio/webm",
    "audio/*",
];

/// Scoped, time-limited permission for the client to write one object
/// directly into storage. Consumed once by the client-side upload call and
/// never persisted here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAuthorization {
    pub allowed_content_types: Vec<String>,
    pub maximum_size_in_bytes: u64,
    pub client_token: String,
}

/// Decides whether a client upload handshake may proceed. Pure function of
/// the handshake payload; it grants a capability but never writes bytes.
pub struct UploadAuthorizer {
    max_bytes: u64,
}

impl UploadAuthorizer {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// The handshake payload comes from the client-side upload library and
    /// is opaque to this service; only the fields needed for a decision are
    /// inspected.
    pub fn authorize(
        &self,
        handshake: &serde_json::Value,
    ) -> Result<UploadAuthorization, AuthorizationDenied> {
        if !handshake.is_object() {
            return Err(AuthorizationDenied::Malformed);
        }

        if let Some(content_type) = declared_content_type(handshake) {
            if !content_type_allowed(content_type) {
                return Err(AuthorizationDenied::ContentType(content_type.to_string()));
            }
        }

        if let Some(size) = declared_size(handshake) {
            if size > self.max_bytes {
                return Err(AuthorizationDenied::TooLarge {
                    declared: size,
                    limit: self.max_bytes,
                });
            }
        }

        Ok(UploadAuthorization {
            allowed_content_types: ALLOWED_CONTENT_TYPES
                .iter()
                .map(|ct| ct.to_string())
                .collect(),
            maximum_size_in_bytes: self.max_bytes,
            client_token: Uuid::new_v4().to_string(),
        })
    }
}

fn declared_content_type(handshake: &serde_json::Value) -> Option<&str> {
    handshake
        .pointer("/payload/contentType")
        .or_else(|| handshake.get("contentType"))
        .and_then(|v| v.as_str())
}

fn declared_size(handshake: &serde_json::Value) -> Option<u64> {
    handshake
        .pointer("/payload/size")
        .or_else(|| handshake.get("size"))
        .and_then(|v| v.as_u64())
}

fn content_type_allowed(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES.iter().any(|allowed| {
        match allowed.strip_suffix("/*") {
            Some(category) => content_type.split('/').next() == Some(category),
            None => allowed.eq_ignore_ascii_case(content_type),
        }
    })
}

#[derive(Debug, thiserror::Error)]
pub enum AuthorizationDenied {
    #[error("malformed upload handshake")]
    Malformed,
    #[error("content type not allowed: {0}")]
    ContentType(String),
    #[error("declared size {declared} exceeds the {limit}-byte limit")]
    TooLarge { declared: u64, limit: u64 },
}
