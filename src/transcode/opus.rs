use std::sync::{Mutex, PoisonError};

use audiopus::coder::Decoder as LibOpus;
use audiopus::packet::Packet as OpusPacket;
use audiopus::{Channels as OpusChannels, MutSignals, SampleRate};
use symphonia::core::audio::{AsAudioBufferRef, AudioBuffer, AudioBufferRef, Signal, SignalSpec};
use symphonia::core::codecs::{
    CodecDescriptor, CodecParameters, Decoder, DecoderOptions, FinalizeResult, CODEC_TYPE_OPUS,
};
use symphonia::core::errors::{decode_error, unsupported_error, Result};
use symphonia::core::formats::Packet;
use tracing::debug;

const SAMPLE_RATE: u32 = 48_000;

// 120 ms at 48 kHz, the longest duration a single packet may carry.
const MAX_FRAMES_PER_PACKET: usize = 5760;

const CODECS: &[CodecDescriptor] = &[CodecDescriptor {
    codec: CODEC_TYPE_OPUS,
    short_name: "opus",
    long_name: "Opus (libopus)",
    inst_func: |params, options| Ok(Box::new(OpusDecoder::try_new(params, options)?)),
}];

/// Symphonia decoder for Opus streams backed by libopus.
///
/// Only channel mapping family 0 (mono or stereo) is handled, which is what
/// the synthesis service produces.
pub struct OpusDecoder {
    params: CodecParameters,
    opus: Mutex<LibOpus>,
    channels: usize,
    pcm: Vec<f32>,
    buf: AudioBuffer<f32>,
}

fn opus_channels(count: usize) -> Option<OpusChannels> {
    match count {
        1 => Some(OpusChannels::Mono),
        2 => Some(OpusChannels::Stereo),
        _ => None,
    }
}

impl Decoder for OpusDecoder {
    fn try_new(params: &CodecParameters, _options: &DecoderOptions) -> Result<Self> {
        let Some(channel_set) = params.channels else {
            return unsupported_error("opus: channel layout is required");
        };

        let channels = channel_set.count();
        let Some(layout) = opus_channels(channels) else {
            return unsupported_error("opus: only mono and stereo are supported");
        };

        let opus = match LibOpus::new(SampleRate::Hz48000, layout) {
            Ok(opus) => opus,
            Err(why) => {
                debug!("Failed to create libopus decoder: {why}");
                return unsupported_error("opus: failed to create decoder");
            }
        };

        Ok(OpusDecoder {
            params: params.clone(),
            opus: Mutex::new(opus),
            channels,
            pcm: vec![0.0; MAX_FRAMES_PER_PACKET * channels],
            buf: AudioBuffer::new(
                MAX_FRAMES_PER_PACKET as u64,
                SignalSpec::new(SAMPLE_RATE, channel_set),
            ),
        })
    }

    fn supported_codecs() -> &'static [CodecDescriptor] {
        CODECS
    }

    fn reset(&mut self) {
        let Some(layout) = opus_channels(self.channels) else {
            return;
        };

        match LibOpus::new(SampleRate::Hz48000, layout) {
            Ok(opus) => self.opus = Mutex::new(opus),
            Err(why) => debug!("Failed to reset libopus decoder: {why}"),
        }
    }

    fn codec_params(&self) -> &CodecParameters {
        &self.params
    }

    fn decode(&mut self, packet: &Packet) -> Result<AudioBufferRef<'_>> {
        self.buf.clear();

        let Ok(input) = OpusPacket::try_from(packet.buf()) else {
            return decode_error("opus: empty packet");
        };

        let Ok(output) = MutSignals::try_from(&mut self.pcm[..]) else {
            return decode_error("opus: output buffer is empty");
        };

        let opus = self.opus.get_mut().unwrap_or_else(PoisonError::into_inner);
        let frames = match opus.decode_float(Some(input), output, false) {
            Ok(frames) => frames,
            Err(why) => {
                debug!("libopus rejected packet: {why}");
                return decode_error("opus: invalid packet");
            }
        };

        self.buf.render_reserved(Some(frames));
        for ch in 0..self.channels {
            let plane = self.buf.chan_mut(ch);
            for (i, sample) in plane.iter_mut().enumerate() {
                *sample = self.pcm[i * self.channels + ch];
            }
        }

        Ok(self.buf.as_audio_buffer_ref())
    }

    fn finalize(&mut self) -> FinalizeResult {
        FinalizeResult::default()
    }

    fn last_decoded(&self) -> AudioBufferRef<'_> {
        self.buf.as_audio_buffer_ref()
    }
}
