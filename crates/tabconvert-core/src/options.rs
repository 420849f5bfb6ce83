//! Conversion settings.
//!
//! Options are plain serde structs so the web UI can pass a JS object such as
//! `{ mp3: { bitrateKbps: 192 }, image: { jpegQuality: 85 } }` and have missing fields fall back to the
//! defaults below.

use serde::{Deserialize, Serialize};

/// Default MP3 bitrate in kbps, matching the web converters.
pub const DEFAULT_MP3_BITRATE_KBPS: u32 = 128;

/// Settings for the MP3 encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Mp3Options {
    /// Constant bitrate in kbps (8-320, one of the MPEG bitrate steps)
    pub bitrate_kbps: u32,
}

impl Default for Mp3Options {
    fn default() -> Self {
        Self {
            bitrate_kbps: DEFAULT_MP3_BITRATE_KBPS,
        }
    }
}

/// Default JPEG quality for re-encoded images, matching the web converters.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Settings for raster image output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageOptions {
    /// JPEG quality (1-100); values outside the range are clamped
    pub jpeg_quality: u8,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Settings for a whole conversion run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// MP3 encoder settings, used by the `*ToMp3` conversions
    pub mp3: Mp3Options,
    /// Raster encoder settings, used by the image conversions
    pub image: ImageOptions,
}

impl ConvertOptions {
    /// Create options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the MP3 bitrate.
    pub fn with_mp3_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.mp3.bitrate_kbps = bitrate_kbps;
        self
    }

    /// Override the JPEG quality.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.image.jpeg_quality = quality;
        self
    }
}
