//! tabconvert WASM - WebAssembly bindings for tabconvert
//!
//! This crate exposes the tabconvert-core conversions to the converter pages.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for PCM audio and converted files
//! - `preview` - Raw (CR2/NEF) embedded preview extraction
//! - `audio` - WAV/MP3 encoding and source audio decoding
//! - `convert` - Whole-file conversion (raw previews, images, audio) by file extension
//!
//! # Usage
//!
//! ```typescript
//! import init, { convert_file } from '@tabconvert/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const out = convert_file(file.name, bytes);
//! console.log(`${out.fileName}: ${out.byteLength} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod audio;
mod convert;
mod preview;
mod types;

// Re-export public types
pub use audio::{decode_audio, encode_mp3, encode_wav};
pub use convert::{convert_file, convert_file_to, is_convertible, output_file_name, output_mime_type};
pub use preview::{extract_raw_preview, find_raw_preview_offset, read_preview_info};
pub use types::{JsConvertedFile, JsPcmAudio};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
