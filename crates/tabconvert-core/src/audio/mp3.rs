//! Block-wise MP3 driver.

use tracing::debug;

use super::pcm::samples_to_i16;
use super::{EncodedAudio, PcmAudioBuffer};
use crate::{ConvertError, Mp3Options};

/// Samples per channel handed to the encoder at a time (one MPEG-1 Layer III
/// frame).
pub const MP3_BLOCK_SAMPLES: usize = 1152;

/// An external MP3 encoder driven one block at a time.
///
/// Implementations may buffer internally and return nothing for some
/// blocks; whatever is left comes out of [`flush`](Mp3BlockEncoder::flush).
pub trait Mp3BlockEncoder {
    /// Encode one block of left/right samples (equal lengths, at most
    /// [`MP3_BLOCK_SAMPLES`]). May return an empty chunk.
    fn encode_block(&mut self, left: &[i16], right: &[i16]) -> Result<Vec<u8>, ConvertError>;

    /// Emit any trailing frame data. Called once, after the last block.
    fn flush(&mut self) -> Result<Vec<u8>, ConvertError>;
}

/// Builds a fresh [`Mp3BlockEncoder`] for each conversion.
pub trait Mp3EncoderFactory {
    fn create(
        &self,
        channels: u16,
        sample_rate: u32,
        options: &Mp3Options,
    ) -> Result<Box<dyn Mp3BlockEncoder>, ConvertError>;
}

/// Drive `encoder` over the whole buffer and return the concatenated stream.
///
/// Samples are converted to 16-bit as for WAV. Mono input is fed as both the
/// left and right channel. Blocks are [`MP3_BLOCK_SAMPLES`] long except
/// possibly the last; chunks are appended in block order, followed by the
/// flush output.
pub fn encode_mp3_with<E>(encoder: &mut E, buffer: &PcmAudioBuffer) -> Result<EncodedAudio, ConvertError>
where
    E: Mp3BlockEncoder + ?Sized,
{
    let left = samples_to_i16(buffer.channel(0));
    let right = (buffer.channel_count() > 1).then(|| samples_to_i16(buffer.channel(1)));
    let right = right.as_deref().unwrap_or(&left);

    let mut out = Vec::new();
    let mut blocks = 0usize;
    for (left_block, right_block) in left.chunks(MP3_BLOCK_SAMPLES).zip(right.chunks(MP3_BLOCK_SAMPLES)) {
        let chunk = encoder.encode_block(left_block, right_block)?;
        out.extend_from_slice(&chunk);
        blocks += 1;
    }
    out.extend_from_slice(&encoder.flush()?);

    debug!(blocks, frames = buffer.frames(), bytes = out.len(), "encoded MP3 stream");

    Ok(EncodedAudio::mp3(out))
}

/// Encode a PCM buffer to MP3 with LAME.
///
/// # Errors
///
/// Returns `ConvertError::EncodeFailure` if LAME rejects the configuration
/// (for example an unsupported bitrate) or fails mid-stream.
#[cfg(feature = "lame")]
pub fn encode_mp3(buffer: &PcmAudioBuffer, options: &Mp3Options) -> Result<EncodedAudio, ConvertError> {
    let mut encoder = super::LameEncoder::new(buffer.channel_count(), buffer.sample_rate(), options)?;
    encode_mp3_with(&mut encoder, buffer)
}
