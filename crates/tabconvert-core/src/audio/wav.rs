//! Canonical 16-bit PCM WAV writer and header reader.
//!
//! Layout (all integers little-endian):
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0  | 4 | `RIFF` |
//! | 4  | 4 | file size - 8 |
//! | 8  | 4 | `WAVE` |
//! | 12 | 4 | `fmt ` |
//! | 16 | 4 | 16 (fmt chunk size) |
//! | 20 | 2 | 1 (PCM) |
//! | 22 | 2 | channels |
//! | 24 | 4 | sample rate |
//! | 28 | 4 | byte rate |
//! | 32 | 2 | block align |
//! | 34 | 2 | 16 (bits per sample) |
//! | 36 | 4 | `data` |
//! | 40 | 4 | data size |

use serde::{Deserialize, Serialize};

use super::pcm::sample_to_i16;
use super::{EncodedAudio, PcmAudioBuffer};
use crate::ConvertError;

/// Size of the canonical header preceding the sample data.
pub const WAV_HEADER_LEN: usize = 44;

const FMT_CHUNK_LEN: u32 = 16;
const FORMAT_PCM: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;

/// Fields of a canonical WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Length of the `data` chunk in bytes
    pub data_len: u32,
}

/// Encode a PCM buffer as a 16-bit WAV file.
///
/// Samples are interleaved frame by frame. The output is always exactly
/// `44 + frames * channels * 2` bytes; an empty buffer gives a header-only
/// file.
pub fn encode_wav(buffer: &PcmAudioBuffer) -> EncodedAudio {
    let channels = buffer.channels();
    let block_align = channels.len() * BYTES_PER_SAMPLE;
    let data_len = buffer.frames() * block_align;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len);
    write_header(&mut out, buffer, block_align, data_len);

    for frame in 0..buffer.frames() {
        for channel in channels {
            out.extend_from_slice(&sample_to_i16(channel[frame]).to_le_bytes());
        }
    }

    EncodedAudio::wav(out)
}

fn write_header(out: &mut Vec<u8>, buffer: &PcmAudioBuffer, block_align: usize, data_len: usize) {
    let data_len = saturating_u32(data_len);
    let byte_rate = buffer.sample_rate().saturating_mul(block_align as u32);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&data_len.saturating_add(36).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&buffer.channel_count().to_le_bytes());
    out.extend_from_slice(&buffer.sample_rate().to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&(block_align as u16).to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
}

// RIFF sizes are 32-bit; anything past 4 GiB cannot be represented anyway.
fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Read back the header written by [`encode_wav`].
///
/// Only the canonical 44-byte layout with `fmt ` directly followed by
/// `data` is accepted.
///
/// # Errors
///
/// Returns `ConvertError::DecodeFailure` if the bytes are too short or a
/// chunk identifier does not match.
pub fn parse_wav_header(bytes: &[u8]) -> Result<WavHeader, ConvertError> {
    let header = bytes
        .get(..WAV_HEADER_LEN)
        .ok_or_else(|| ConvertError::DecodeFailure(format!("WAV header needs {WAV_HEADER_LEN} bytes, got {}", bytes.len())))?;

    expect_tag(header, 0, b"RIFF")?;
    expect_tag(header, 8, b"WAVE")?;
    expect_tag(header, 12, b"fmt ")?;
    expect_tag(header, 36, b"data")?;

    let format = read_u16(header, 20);
    if format != FORMAT_PCM {
        return Err(ConvertError::DecodeFailure(format!("unsupported WAV format tag {format}")));
    }

    Ok(WavHeader {
        channels: read_u16(header, 22),
        sample_rate: read_u32(header, 24),
        byte_rate: read_u32(header, 28),
        block_align: read_u16(header, 32),
        bits_per_sample: read_u16(header, 34),
        data_len: read_u32(header, 40),
    })
}

fn expect_tag(header: &[u8], offset: usize, tag: &[u8; 4]) -> Result<(), ConvertError> {
    if &header[offset..offset + 4] == tag {
        Ok(())
    } else {
        Err(ConvertError::DecodeFailure(format!(
            "expected '{}' at offset {offset}",
            String::from_utf8_lossy(tag)
        )))
    }
}

fn read_u16(header: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([header[offset], header[offset + 1]])
}

fn read_u32(header: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        header[offset],
        header[offset + 1],
        header[offset + 2],
        header[offset + 3],
    ])
}
