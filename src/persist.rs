use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::model::SynthesisRequest;
use crate::speechkit::AudioSource;
use crate::transcode::{AudioFormat, SymphoniaTranscoder, Transcoder};

/// Writes synthesized audio to disk and converts it on request.
#[derive(Debug)]
pub struct FilePersister<S, T = SymphoniaTranscoder> {
    source: S,
    transcoder: T,
}

impl<S: AudioSource> FilePersister<S> {
    pub fn new(source: S) -> Self {
        Self::with_transcoder(source, SymphoniaTranscoder::new())
    }
}

impl<S: AudioSource, T: Transcoder> FilePersister<S, T> {
    pub fn with_transcoder(source: S, transcoder: T) -> Self {
        FilePersister { source, transcoder }
    }

    /// Fetches audio for `request` and writes it to `request.output_path`,
    /// replacing whatever was there.
    pub async fn save_to_file(&self, request: &SynthesisRequest) -> Result<()> {
        let Some(audio) = self.source.fetch_audio(request).await? else {
            return Err(Error::EmptyAudioContent);
        };

        let mut output = File::create(&request.output_path)?;
        output.write_all(&audio.content)?;

        info!(
            path = %request.output_path.display(),
            bytes = audio.content.len(),
            "Saved audio"
        );

        Ok(())
    }

    /// Re-encodes an OGG file at `input` as MP3 at `output`.
    pub fn transcode(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
        let (input, output) = (input.as_ref(), output.as_ref());

        let audio = self.transcoder.decode(input)?;
        self.transcoder.encode(&audio, output, AudioFormat::Mp3)?;

        info!(
            from = %input.display(),
            to = %output.display(),
            "Transcoded audio"
        );

        Ok(())
    }
}
