//! LAME-backed [`Mp3BlockEncoder`].

use mp3lame_encoder::{max_required_buffer_size, Bitrate, Builder, DualPcm, Encoder, FlushGap};
use tracing::debug;

use super::mp3::{Mp3BlockEncoder, Mp3EncoderFactory};
use crate::{ConvertError, Mp3Options};

/// LAME needs at least this much room to flush its last frames.
const FLUSH_BUFFER_LEN: usize = 7200;

/// Constant-bitrate LAME encoder.
pub struct LameEncoder {
    inner: Encoder,
}

impl LameEncoder {
    /// Configure LAME for the given stream.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::EncodeFailure` if the bitrate is not one of the
    /// MPEG steps or LAME rejects the channel count or sample rate.
    pub fn new(channels: u16, sample_rate: u32, options: &Mp3Options) -> Result<Self, ConvertError> {
        let bitrate = bitrate_from_kbps(options.bitrate_kbps)?;
        let channels = u8::try_from(channels)
            .map_err(|_| ConvertError::EncodeFailure(format!("unsupported channel count {channels}")))?;

        let mut builder = Builder::new()
            .ok_or_else(|| ConvertError::EncodeFailure("failed to allocate LAME encoder".to_string()))?;
        builder
            .set_num_channels(channels)
            .map_err(|e| ConvertError::EncodeFailure(format!("channels: {:?}", e)))?;
        builder
            .set_sample_rate(sample_rate)
            .map_err(|e| ConvertError::EncodeFailure(format!("sample rate: {:?}", e)))?;
        builder
            .set_brate(bitrate)
            .map_err(|e| ConvertError::EncodeFailure(format!("bitrate: {:?}", e)))?;
        let inner = builder
            .build()
            .map_err(|e| ConvertError::EncodeFailure(format!("LAME init: {:?}", e)))?;

        debug!(channels, sample_rate, kbps = options.bitrate_kbps, "configured LAME encoder");

        Ok(Self { inner })
    }
}

impl Mp3BlockEncoder for LameEncoder {
    fn encode_block(&mut self, left: &[i16], right: &[i16]) -> Result<Vec<u8>, ConvertError> {
        let mut out = Vec::with_capacity(max_required_buffer_size(left.len()));
        self.inner
            .encode_to_vec(DualPcm { left, right }, &mut out)
            .map_err(|e| ConvertError::EncodeFailure(format!("{:?}", e)))?;
        Ok(out)
    }

    /// Pads the look-ahead with silence and encodes it, so the last input
    /// samples end up in the stream.
    fn flush(&mut self) -> Result<Vec<u8>, ConvertError> {
        let mut out = Vec::with_capacity(FLUSH_BUFFER_LEN);
        self.inner
            .flush_to_vec::<FlushGap>(&mut out)
            .map_err(|e| ConvertError::EncodeFailure(format!("flush: {:?}", e)))?;
        Ok(out)
    }
}

/// Creates a [`LameEncoder`] per conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct LameEncoderFactory;

impl Mp3EncoderFactory for LameEncoderFactory {
    fn create(
        &self,
        channels: u16,
        sample_rate: u32,
        options: &Mp3Options,
    ) -> Result<Box<dyn Mp3BlockEncoder>, ConvertError> {
        Ok(Box::new(LameEncoder::new(channels, sample_rate, options)?))
    }
}

fn bitrate_from_kbps(kbps: u32) -> Result<Bitrate, ConvertError> {
    let bitrate = match kbps {
        8 => Bitrate::Kbps8,
        16 => Bitrate::Kbps16,
        24 => Bitrate::Kbps24,
        32 => Bitrate::Kbps32,
        40 => Bitrate::Kbps40,
        48 => Bitrate::Kbps48,
        64 => Bitrate::Kbps64,
        80 => Bitrate::Kbps80,
        96 => Bitrate::Kbps96,
        112 => Bitrate::Kbps112,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        224 => Bitrate::Kbps224,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => {
            return Err(ConvertError::EncodeFailure(format!(
                "unsupported MP3 bitrate {other} kbps"
            )))
        }
    };
    Ok(bitrate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{encode_mp3, PcmAudioBuffer};

    /// Offset of the first MPEG audio frame sync (11 set bits).
    fn first_frame_sync(bytes: &[u8]) -> Option<usize> {
        bytes
            .windows(2)
            .position(|w| w[0] == 0xFF && (w[1] & 0xE0) == 0xE0)
    }

    /// Number of consecutive MPEG-1 Layer III frames from the first sync.
    fn count_frames(bytes: &[u8]) -> usize {
        const KBPS: [usize; 15] = [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];
        const RATES: [usize; 3] = [44100, 48000, 32000];

        let Some(mut pos) = first_frame_sync(bytes) else {
            return 0;
        };
        let mut count = 0;
        while pos + 4 <= bytes.len() && bytes[pos] == 0xFF && (bytes[pos + 1] & 0xE0) == 0xE0 {
            let header = bytes[pos + 2];
            let bitrate = KBPS[(header >> 4) as usize] * 1000;
            let rate = RATES[((header >> 2) & 0x3) as usize];
            let len = 144 * bitrate / rate + ((header >> 1) & 1) as usize;
            if len == 0 {
                break;
            }
            count += 1;
            pos += len;
        }
        count
    }

    fn sine(frames: usize, sample_rate: u32) -> Vec<f32> {
        (0..frames)
            .map(|i| (i as f32 * 440.0 * std::f32::consts::TAU / sample_rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_bitrate_steps() {
        assert!(bitrate_from_kbps(128).is_ok());
        assert!(bitrate_from_kbps(320).is_ok());
        assert!(matches!(bitrate_from_kbps(100), Err(ConvertError::EncodeFailure(_))));
        assert!(bitrate_from_kbps(0).is_err());
    }

    #[test]
    fn test_encode_stereo_produces_frames() {
        let buffer = PcmAudioBuffer::stereo(44100, sine(44100, 44100), sine(44100, 44100)).unwrap();
        let mp3 = encode_mp3(&buffer, &Mp3Options::default()).unwrap();

        assert!(!mp3.is_empty());
        assert!(first_frame_sync(mp3.bytes()).is_some());
    }

    #[test]
    fn test_flush_encodes_buffered_tail() {
        // LAME holds back part of every block; the flush has to emit it
        let frames = 4 * 1152;
        let buffer = PcmAudioBuffer::stereo(44100, sine(frames, 44100), sine(frames, 44100)).unwrap();
        let mp3 = encode_mp3(&buffer, &Mp3Options::default()).unwrap();

        let encoded = count_frames(mp3.bytes());
        assert!(encoded * 1152 > frames, "{encoded} frames for {frames} samples");
    }

    #[cfg(feature = "symphonia")]
    #[test]
    fn test_decoded_length_covers_input() {
        use crate::audio::{AudioDecoder, SymphoniaDecoder};

        let frames = 4 * 1152;
        let buffer = PcmAudioBuffer::stereo(44100, sine(frames, 44100), sine(frames, 44100)).unwrap();
        let mp3 = encode_mp3(&buffer, &Mp3Options::default()).unwrap();

        let decoded = SymphoniaDecoder::new().decode(mp3.bytes(), Some("mp3")).unwrap();
        assert!(decoded.frames() >= frames, "decoded {} of {frames}", decoded.frames());
    }

    #[test]
    fn test_encode_mono() {
        let buffer = PcmAudioBuffer::mono(22050, sine(22050, 22050)).unwrap();
        let mp3 = encode_mp3(&buffer, &Mp3Options { bitrate_kbps: 64 }).unwrap();
        assert!(first_frame_sync(mp3.bytes()).is_some());
    }

    #[test]
    fn test_encode_empty_does_not_fail() {
        let buffer = PcmAudioBuffer::stereo(44100, Vec::new(), Vec::new()).unwrap();
        assert!(encode_mp3(&buffer, &Mp3Options::default()).is_ok());
    }

    #[test]
    fn test_unsupported_bitrate_is_rejected_up_front() {
        let buffer = PcmAudioBuffer::mono(44100, vec![0.0; 10]).unwrap();
        let result = encode_mp3(&buffer, &Mp3Options { bitrate_kbps: 129 });
        assert!(matches!(result, Err(ConvertError::EncodeFailure(_))));
    }

    #[test]
    fn test_factory_builds_independent_encoders() {
        let factory = LameEncoderFactory;
        let options = Mp3Options::default();
        let mut a = factory.create(2, 44100, &options).unwrap();
        let mut b = factory.create(2, 44100, &options).unwrap();

        let block = vec![0i16; 1152];
        a.encode_block(&block, &block).unwrap();
        // b has seen nothing, so flushing it must still succeed on its own
        assert!(b.flush().is_ok());
        assert!(a.flush().is_ok());
    }
}
