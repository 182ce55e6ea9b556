mod settings;

pub use settings::{
    LimitSettings, MAX_AUDIO_BYTES, ServerSettings, Settings, StorageSettings,
    TranscriptionSettings,
};
