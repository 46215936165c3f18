pub mod dto;
pub mod error;
pub mod input;
pub mod markup;
pub mod service;

pub use dto::SpeechRequest;
pub use error::SpeechServiceError;
pub use input::{SpeechInput, VoiceName};
pub use service::{SpeechService, SpeechServiceApi, SpeechSynthesisResult};
