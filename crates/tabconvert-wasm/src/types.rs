//! WASM-compatible wrapper types.
//!
//! These wrap the core types so JavaScript can hold them across calls
//! without copying the underlying buffers back and forth.

use tabconvert_core::{ConvertError, ConvertedFile, PcmAudioBuffer};
use wasm_bindgen::prelude::*;

/// Convert a core error into the string error thrown on the JS side.
pub(crate) fn to_js_error(e: ConvertError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Decoded PCM audio held in WASM memory.
///
/// Build one from an `AudioBuffer`'s channel data, or get one from
/// `decode_audio`.
///
/// # Example (TypeScript)
/// ```typescript
/// const audio = new JsPcmAudio(
///   buffer.sampleRate,
///   buffer.getChannelData(0),
///   buffer.numberOfChannels > 1 ? buffer.getChannelData(1) : undefined,
/// );
/// const wav = encode_wav(audio);
/// audio.free();
/// ```
#[wasm_bindgen]
pub struct JsPcmAudio {
    inner: PcmAudioBuffer,
}

#[wasm_bindgen]
impl JsPcmAudio {
    /// Create from a sample rate and one (mono) or two (stereo) channels.
    ///
    /// # Errors
    /// Throws if the sample rate is zero or the channels differ in length.
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: u32, left: Vec<f32>, right: Option<Vec<f32>>) -> Result<JsPcmAudio, JsValue> {
        Self::try_new(sample_rate, left, right).map_err(to_js_error)
    }

    #[wasm_bindgen(getter = sampleRate)]
    pub fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    #[wasm_bindgen(getter = numberOfChannels)]
    pub fn channel_count(&self) -> u16 {
        self.inner.channel_count()
    }

    /// Samples per channel.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.frames()
    }

    /// Copy one channel out as a `Float32Array`. Returns `undefined` for a
    /// channel that does not exist.
    #[wasm_bindgen(js_name = getChannelData)]
    pub fn channel_data(&self, index: usize) -> Option<Vec<f32>> {
        self.inner.channels().get(index).cloned()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsPcmAudio {
    pub(crate) fn try_new(
        sample_rate: u32,
        left: Vec<f32>,
        right: Option<Vec<f32>>,
    ) -> Result<JsPcmAudio, ConvertError> {
        let inner = match right {
            Some(right) => PcmAudioBuffer::stereo(sample_rate, left, right)?,
            None => PcmAudioBuffer::mono(sample_rate, left)?,
        };
        Ok(JsPcmAudio { inner })
    }

    pub(crate) fn from_core(inner: PcmAudioBuffer) -> Self {
        JsPcmAudio { inner }
    }

    pub(crate) fn as_core(&self) -> &PcmAudioBuffer {
        &self.inner
    }
}

/// A converted file ready to be handed to a download link.
///
/// # Example (TypeScript)
/// ```typescript
/// const out = convert_file(file.name, bytes, { mp3: { bitrateKbps: 192 } });
/// const url = URL.createObjectURL(new Blob([out.bytes], { type: out.mimeType }));
/// ```
#[wasm_bindgen]
pub struct JsConvertedFile {
    inner: ConvertedFile,
}

#[wasm_bindgen]
impl JsConvertedFile {
    #[wasm_bindgen(getter = fileName)]
    pub fn file_name(&self) -> String {
        self.inner.file_name.clone()
    }

    #[wasm_bindgen(getter = mimeType)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.to_string()
    }

    #[wasm_bindgen(getter = byteLength)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }

    /// Copy the converted bytes into a new `Uint8Array`.
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.inner.bytes.as_slice())
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsConvertedFile {
    pub(crate) fn from_core(inner: ConvertedFile) -> Self {
        JsConvertedFile { inner }
    }

    #[cfg(test)]
    pub(crate) fn as_core(&self) -> &ConvertedFile {
        &self.inner
    }
}
