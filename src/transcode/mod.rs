use std::fmt;
use std::path::Path;

use thiserror::Error;

mod backend;
mod encode;
mod opus;

pub use backend::SymphoniaTranscoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Ogg,
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Ogg => "ogg",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Interleaved 16-bit PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }

        self.samples.len() / usize::from(self.channels)
    }
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to decode audio: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("Failed to write wav: {0}")]
    Wav(#[from] hound::Error),

    #[error("Failed to encode mp3: {0}")]
    Mp3(String),

    #[error("No track found")]
    NoTrack,

    #[error("Stream does not declare sample rate or channels")]
    MissingStreamInfo,

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    #[error("Encoding to {0} is not supported")]
    UnsupportedFormat(AudioFormat),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Boundary to the audio library doing the actual codec work.
pub trait Transcoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, TranscodeError>;

    fn encode(
        &self,
        audio: &DecodedAudio,
        path: &Path,
        format: AudioFormat,
    ) -> Result<(), TranscodeError>;
}
