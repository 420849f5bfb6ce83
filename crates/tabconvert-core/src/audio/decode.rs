//! Source audio decoding.

use super::PcmAudioBuffer;
use crate::ConvertError;

/// Turns encoded audio bytes into PCM.
///
/// In the browser this job normally falls to the platform decoder; the core
/// only needs something that yields a [`PcmAudioBuffer`].
pub trait AudioDecoder {
    /// Decode a whole file. `extension` (without the dot) is a format hint.
    fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<PcmAudioBuffer, ConvertError>;
}

#[cfg(feature = "symphonia")]
mod symphonia_decoder {
    use std::io::{Cursor, ErrorKind};

    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;
    use tracing::{debug, warn};

    use super::*;
    use crate::audio::MAX_CHANNELS;

    /// WAV, FLAC and MP3 decoder built on Symphonia (pure Rust).
    ///
    /// Only the first audio track is decoded, and only its first two
    /// channels are kept.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SymphoniaDecoder;

    impl SymphoniaDecoder {
        pub fn new() -> Self {
            Self
        }
    }

    fn decode_failure(e: SymphoniaError) -> ConvertError {
        ConvertError::DecodeFailure(e.to_string())
    }

    /// Record the rate of a decoded packet. Every packet must share the rate
    /// of the first one, since the buffer carries a single rate.
    pub(super) fn track_sample_rate(rate: &mut Option<u32>, packet_rate: u32) -> Result<u32, ConvertError> {
        match *rate {
            Some(current) if current != packet_rate => Err(ConvertError::DecodeFailure(format!(
                "sample rate changed mid-stream ({current} to {packet_rate})"
            ))),
            Some(current) => Ok(current),
            None => Ok(*rate.insert(packet_rate)),
        }
    }

    impl AudioDecoder for SymphoniaDecoder {
        fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<PcmAudioBuffer, ConvertError> {
            let cursor = Cursor::new(bytes.to_vec());
            let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

            let mut hint = Hint::new();
            if let Some(ext) = extension {
                hint.with_extension(ext);
            }

            let probed = symphonia::default::get_probe()
                .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
                .map_err(decode_failure)?;
            let mut format = probed.format;

            let track = format
                .tracks()
                .iter()
                .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
                .ok_or_else(|| ConvertError::DecodeFailure("no audio track".to_string()))?;
            let track_id = track.id;
            let declared_rate = track.codec_params.sample_rate;
            let mut sample_rate = None;
            let declared_channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);

            let mut decoder = symphonia::default::get_codecs()
                .make(&track.codec_params, &DecoderOptions::default())
                .map_err(decode_failure)?;

            let mut channels: Vec<Vec<f32>> = Vec::new();
            loop {
                let packet = match format.next_packet() {
                    Ok(packet) => packet,
                    Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                    Err(e) => return Err(decode_failure(e)),
                };
                if packet.track_id() != track_id {
                    continue;
                }

                let decoded = match decoder.decode(&packet) {
                    Ok(decoded) => decoded,
                    // Corrupt packets are skipped, the rest of the stream is still usable
                    Err(SymphoniaError::DecodeError(msg)) => {
                        warn!(msg, "skipping undecodable audio packet");
                        continue;
                    }
                    Err(e) => return Err(decode_failure(e)),
                };

                let spec = *decoded.spec();
                track_sample_rate(&mut sample_rate, spec.rate)?;
                let count = spec.channels.count();
                if count == 0 {
                    continue;
                }

                let mut samples = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                samples.copy_planar_ref(decoded);
                let planar = samples.samples();
                let frames = planar.len() / count;

                if channels.is_empty() {
                    channels = vec![Vec::new(); count.min(MAX_CHANNELS)];
                } else if channels.len() != count.min(MAX_CHANNELS) {
                    return Err(ConvertError::DecodeFailure(format!(
                        "channel count changed mid-stream ({} to {})",
                        channels.len(),
                        count
                    )));
                }
                for (index, out) in channels.iter_mut().enumerate() {
                    out.extend_from_slice(&planar[index * frames..(index + 1) * frames]);
                }
            }

            if channels.is_empty() {
                channels = vec![Vec::new(); declared_channels.clamp(1, MAX_CHANNELS)];
            }
            let sample_rate = sample_rate
                .or(declared_rate)
                .ok_or_else(|| ConvertError::DecodeFailure("unknown sample rate".to_string()))?;

            debug!(
                sample_rate,
                channels = channels.len(),
                frames = channels[0].len(),
                "decoded source audio"
            );

            PcmAudioBuffer::new(sample_rate, channels)
        }
    }
}

#[cfg(feature = "symphonia")]
pub use symphonia_decoder::SymphoniaDecoder;

#[cfg(all(test, feature = "symphonia"))]
mod tests {
    use super::*;
    use crate::audio::encode_wav;

    #[test]
    fn test_decodes_wav_written_by_encoder() {
        let left: Vec<f32> = (0..1000).map(|i| (i as f32 / 1000.0) - 0.5).collect();
        let right: Vec<f32> = left.iter().map(|s| -s).collect();
        let source = PcmAudioBuffer::stereo(32000, left.clone(), right).unwrap();
        let wav = encode_wav(&source);

        let decoded = SymphoniaDecoder::new().decode(wav.bytes(), Some("wav")).unwrap();

        assert_eq!(decoded.sample_rate(), 32000);
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.frames(), 1000);
        for (got, want) in decoded.channel(0).iter().zip(&left) {
            assert!((got - want).abs() < 1e-3, "{got} vs {want}");
        }
    }

    #[test]
    fn test_decodes_mono_without_hint() {
        let source = PcmAudioBuffer::mono(8000, vec![0.25; 400]).unwrap();
        let wav = encode_wav(&source);

        let decoded = SymphoniaDecoder::new().decode(wav.bytes(), None).unwrap();
        assert_eq!(decoded.channel_count(), 1);
        assert_eq!(decoded.frames(), 400);
    }

    #[test]
    fn test_rate_change_mid_stream_is_rejected() {
        let mut rate = None;
        assert_eq!(symphonia_decoder::track_sample_rate(&mut rate, 44100).unwrap(), 44100);
        assert_eq!(symphonia_decoder::track_sample_rate(&mut rate, 44100).unwrap(), 44100);

        let result = symphonia_decoder::track_sample_rate(&mut rate, 48000);
        assert!(matches!(result, Err(ConvertError::DecodeFailure(_))));
        assert_eq!(rate, Some(44100));
    }

    #[test]
    fn test_rejects_garbage() {
        let result = SymphoniaDecoder::new().decode(&[0x13; 256], Some("flac"));
        assert!(matches!(result, Err(ConvertError::DecodeFailure(_))));
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(SymphoniaDecoder::new().decode(&[], None).is_err());
    }
}
