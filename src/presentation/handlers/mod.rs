mod health;
pub mod transcribe;
mod upload;

pub use health::health_handler;
pub use transcribe::transcribe_handler;
pub use upload::upload_handler;
