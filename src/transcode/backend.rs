use std::fs::File;
use std::path::Path;

use once_cell::sync::Lazy;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CodecRegistry, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use super::opus::OpusDecoder;
use super::{encode, AudioFormat, DecodedAudio, TranscodeError, Transcoder};

// symphonia's own codecs plus libopus for the service's default OGG/Opus output.
static CODEC_REGISTRY: Lazy<CodecRegistry> = Lazy::new(|| {
    let mut registry = CodecRegistry::new();
    symphonia::default::register_enabled_codecs(&mut registry);
    registry.register_all::<OpusDecoder>();
    registry
});

/// Decodes with symphonia, encodes MP3 with LAME and WAV with hound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaTranscoder;

impl SymphoniaTranscoder {
    pub fn new() -> Self {
        Self
    }
}

impl Transcoder for SymphoniaTranscoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, TranscodeError> {
        let mss = MediaSourceStream::new(
            Box::new(File::open(path)?),
            MediaSourceStreamOptions::default(),
        );

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;

        let mut format = probed.format;
        let track = format.default_track().ok_or(TranscodeError::NoTrack)?;
        let mut decoder = CODEC_REGISTRY.make(&track.codec_params, &DecoderOptions::default())?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count());
        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(_)) => break, // End of stream
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    sample_rate = Some(spec.rate);
                    channels = Some(spec.channels.count());

                    let mut buf = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
                    buf.copy_interleaved_ref(decoded);
                    samples.extend_from_slice(buf.samples());
                }
                Err(SymphoniaError::IoError(_)) => break,
                Err(SymphoniaError::DecodeError(why)) => {
                    debug!("Skipping undecodable packet: {why}");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let (Some(sample_rate), Some(channels)) = (sample_rate, channels) else {
            return Err(TranscodeError::MissingStreamInfo);
        };

        let channels = u16::try_from(channels).map_err(|_| TranscodeError::MissingStreamInfo)?;

        Ok(DecodedAudio {
            sample_rate,
            channels,
            samples,
        })
    }

    fn encode(
        &self,
        audio: &DecodedAudio,
        path: &Path,
        format: AudioFormat,
    ) -> Result<(), TranscodeError> {
        match format {
            AudioFormat::Mp3 => encode::write_mp3(audio, path),
            AudioFormat::Wav => encode::write_wav(audio, path),
            AudioFormat::Ogg => Err(TranscodeError::UnsupportedFormat(format)),
        }
    }
}
