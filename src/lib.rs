//! Text to speech through Yandex SpeechKit, saved to disk and optionally
//! transcoded from OGG to MP3.

pub mod config;
pub mod error;
pub mod model;
pub mod persist;
pub mod speechkit;
pub mod transcode;

pub use error::{Error, Result};
pub use model::{AudioPayload, SpeechRate, SynthesisRequest, VoiceSelection};
pub use persist::FilePersister;
pub use speechkit::{AudioSource, SpeechKit};
