//! Audio encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_wav`] - Serialize PCM as a 16-bit WAV file
//! - [`encode_mp3`] - Encode PCM as a constant-bitrate MP3 stream
//! - [`decode_audio`] - Decode WAV/FLAC/MP3 bytes into PCM
//!
//! # Example
//!
//! ```typescript
//! import { JsPcmAudio, encode_mp3 } from '@tabconvert/wasm';
//!
//! const decoded = await audioCtx.decodeAudioData(await file.arrayBuffer());
//! const audio = new JsPcmAudio(decoded.sampleRate, decoded.getChannelData(0));
//! const mp3 = encode_mp3(audio, 128);
//! ```

use tabconvert_core::audio::{self, AudioDecoder, SymphoniaDecoder};
use tabconvert_core::Mp3Options;
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsPcmAudio};

/// Encode PCM audio as a 16-bit WAV file.
///
/// Never fails: empty audio produces a 44-byte header-only file.
#[wasm_bindgen]
pub fn encode_wav(audio: &JsPcmAudio) -> Vec<u8> {
    audio::encode_wav(audio.as_core()).into_bytes()
}

/// Encode PCM audio as MP3.
///
/// # Arguments
///
/// * `audio` - Source samples
/// * `bitrate_kbps` - One of the MPEG bitrate steps (8-320), e.g. 128
///
/// # Errors
///
/// Throws if the bitrate is not supported or the encoder fails.
#[wasm_bindgen]
pub fn encode_mp3(audio: &JsPcmAudio, bitrate_kbps: u32) -> Result<Vec<u8>, JsValue> {
    let options = Mp3Options { bitrate_kbps };
    audio::encode_mp3(audio.as_core(), &options)
        .map(|mp3| mp3.into_bytes())
        .map_err(to_js_error)
}

/// Decode a WAV, FLAC or MP3 file into PCM.
///
/// # Arguments
///
/// * `bytes` - The encoded file
/// * `extension` - Optional format hint such as `"flac"`
///
/// # Errors
///
/// Throws if the format is not recognised or the stream is corrupt.
#[wasm_bindgen]
pub fn decode_audio(bytes: &[u8], extension: Option<String>) -> Result<JsPcmAudio, JsValue> {
    SymphoniaDecoder::new()
        .decode(bytes, extension.as_deref())
        .map(JsPcmAudio::from_core)
        .map_err(to_js_error)
}
