mod mock_engine;
mod openai_whisper_engine;

pub use mock_engine::MockTranscriber;
pub use openai_whisper_engine::OpenAiWhisperEngine;
