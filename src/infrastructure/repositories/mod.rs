pub mod azure_tts_repository;
pub mod key_validation_repository;
pub mod tts_repository;

pub use azure_tts_repository::{AzureTtsRepository, AUDIO_CONTENT_TYPE};
pub use key_validation_repository::{HttpKeyValidationRepository, KeyValidationRepository, KeyVerdict};
pub use tts_repository::{SynthesizedAudio, TtsError, TtsRepository};
