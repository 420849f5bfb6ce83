//! tabconvert Core - in-browser file conversion library
//!
//! This crate holds the conversions that work on binary formats directly,
//! rather than delegating wholesale to a browser API:
//!
//! - [`preview`] - embedded JPEG preview extraction from CR2/NEF raw files
//! - [`audio`] - PCM to WAV serialization and the block-wise MP3 driver
//! - [`raster`] - still-image re-encoding (PNG, JPEG, WebP, GIF, ICO)
//! - [`batch`] - the sequential per-file conversion loop
//!
//! Everything here is synchronous and operates on in-memory buffers, so it
//! runs unchanged inside a Web Worker via the `tabconvert-wasm` bindings.

pub mod audio;
pub mod batch;
mod error;
pub mod naming;
mod options;
pub mod preview;
pub mod raster;

#[cfg(feature = "lame")]
pub use audio::encode_mp3;
pub use audio::{
    encode_mp3_with, encode_wav, parse_wav_header, AudioDecoder, EncodedAudio, Mp3BlockEncoder,
    Mp3EncoderFactory, PcmAudioBuffer, WavHeader,
};
pub use batch::{
    BatchSummary, Conversion, ConversionOutcome, ConversionRequest, ConvertedFile, Converter,
};
pub use error::ConvertError;
pub use options::{ConvertOptions, ImageOptions, Mp3Options};
pub use preview::{extract_preview, ContainerKind, JpegPreview, PreviewInfo};
pub use raster::{convert_raster, RasterFormat};
