use std::path::Path;

use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};

use super::{DecodedAudio, TranscodeError};

// LAME wants at least this much room for the final flush.
const FLUSH_BUFFER_SIZE: usize = 7200;

fn lame_error(why: impl std::fmt::Debug) -> TranscodeError {
    TranscodeError::Mp3(format!("{why:?}"))
}

pub fn write_mp3(audio: &DecodedAudio, path: &Path) -> Result<(), TranscodeError> {
    let channels = match audio.channels {
        1 => 1u8,
        2 => 2u8,
        n => return Err(TranscodeError::UnsupportedChannels(n)),
    };

    let mut builder =
        Builder::new().ok_or_else(|| TranscodeError::Mp3("Failed to create LAME".to_string()))?;
    builder.set_num_channels(channels).map_err(lame_error)?;
    builder.set_sample_rate(audio.sample_rate).map_err(lame_error)?;
    builder.set_brate(Bitrate::Kbps192).map_err(lame_error)?;
    builder.set_quality(Quality::Best).map_err(lame_error)?;
    let mut encoder = builder.build().map_err(lame_error)?;

    let mut mp3 = Vec::new();
    mp3.reserve(mp3lame_encoder::max_required_buffer_size(audio.frames()));

    if channels == 1 {
        encoder.encode_to_vec(MonoPcm(&audio.samples[..]), &mut mp3)
    } else {
        encoder.encode_to_vec(InterleavedPcm(&audio.samples[..]), &mut mp3)
    }
    .map_err(lame_error)?;

    mp3.reserve(FLUSH_BUFFER_SIZE);
    encoder
        .flush_to_vec::<FlushNoGap>(&mut mp3)
        .map_err(lame_error)?;

    std::fs::write(path, mp3)?;

    Ok(())
}

pub fn write_wav(audio: &DecodedAudio, path: &Path) -> Result<(), TranscodeError> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &audio.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}
