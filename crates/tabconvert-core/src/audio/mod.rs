//! PCM audio encoding.
//!
//! This module provides functionality for:
//! - Holding decoded floating-point PCM ([`PcmAudioBuffer`])
//! - Serializing it as 16-bit WAV ([`encode_wav`])
//! - Driving a block-wise MP3 encoder over it ([`encode_mp3_with`], [`encode_mp3`])
//! - Decoding WAV/FLAC/MP3 sources into PCM ([`AudioDecoder`])
//!
//! # Architecture
//!
//! The MP3 bitstream itself comes from an external encoder behind the
//! [`Mp3BlockEncoder`] trait. Only the sample preparation and the 1152-sample
//! block loop live here. Every call builds its own encoder, so nothing
//! carries over between conversions.

mod decode;
#[cfg(feature = "lame")]
mod lame;
pub(crate) mod mp3;
mod pcm;
mod wav;

pub use decode::AudioDecoder;
#[cfg(feature = "symphonia")]
pub use decode::SymphoniaDecoder;
#[cfg(feature = "lame")]
pub use lame::{LameEncoder, LameEncoderFactory};
#[cfg(feature = "lame")]
pub use mp3::encode_mp3;
pub use mp3::{encode_mp3_with, Mp3BlockEncoder, Mp3EncoderFactory, MP3_BLOCK_SAMPLES};
pub use pcm::{sample_to_i16, samples_to_i16, PcmAudioBuffer, MAX_CHANNELS};
pub use wav::{encode_wav, parse_wav_header, WavHeader, WAV_HEADER_LEN};

use crate::naming::{MIME_MP3, MIME_WAV};

/// Bytes produced by one encode call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAudio {
    bytes: Vec<u8>,
    mime_type: &'static str,
}

impl EncodedAudio {
    pub(crate) fn wav(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: MIME_WAV,
        }
    }

    pub(crate) fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: MIME_MP3,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
