/// Hard ceiling imposed by the Whisper API on a single audio file.
pub const MAX_AUDIO_BYTES: u64 = 25 * 1024 * 1024;

/// Process configuration, read from the environment once at startup and
/// immutable afterwards. Request handling never reads ambient state.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub storage: StorageSettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    /// Absent credential is a per-request configuration error, not a
    /// startup crash.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Fixed target language for this deployment; not user-selectable.
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub api_url: String,
    pub write_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LimitSettings {
    pub max_audio_bytes: u64,
    /// Bound on the whole outbound call, mirroring the platform's
    /// wall-clock ceiling on request handling.
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: var("SERVER_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
            },
            transcription: TranscriptionSettings {
                api_key: var("OPENAI_API_KEY"),
                base_url: var("OPENAI_BASE_URL")
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                model: var("WHISPER_MODEL").unwrap_or_else(|| "whisper-1".to_string()),
                language: var("TRANSCRIPTION_LANGUAGE").unwrap_or_else(|| "de".to_string()),
            },
            storage: StorageSettings {
                api_url: var("BLOB_API_URL")
                    .unwrap_or_else(|| "https://blob.vercel-storage.com".to_string()),
                write_token: var("BLOB_READ_WRITE_TOKEN"),
            },
            limits: LimitSettings {
                max_audio_bytes: MAX_AUDIO_BYTES,
                request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
            },
        }
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
