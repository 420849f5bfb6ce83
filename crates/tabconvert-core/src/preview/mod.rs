//! Embedded JPEG preview extraction for camera raw files.
//!
//! Canon CR2 and Nikon NEF files are TIFF-derived containers that carry a
//! baseline JPEG preview next to the sensor data. Rather than walking the IFD
//! chain, the extractor does a single linear scan for the JPEG SOI marker and
//! hands everything from that point on to the JPEG decoder, which stops at the
//! real EOI.
//!
//! # Example
//!
//! ```ignore
//! use tabconvert_core::preview::{extract_preview, ContainerKind};
//!
//! let raw = std::fs::read("IMG_0001.CR2")?;
//! let preview = extract_preview(&raw, ContainerKind::Cr2)?;
//! std::fs::write("IMG_0001.jpg", preview.bytes())?;
//! ```

mod info;
mod scan;

#[cfg(test)]
pub(crate) mod fixtures;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConvertError;

pub use info::{read_preview_info, Orientation, PreviewInfo};
pub use scan::{extract_preview, find_preview_offset};

/// Raw container flavours with an embedded JPEG preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Canon CR2. The first SOI marker is taken as the preview start.
    Cr2,
    /// Nikon NEF. The SOI marker must be followed by another marker byte.
    Nef,
}

impl ContainerKind {
    /// File extension (lowercase, without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            ContainerKind::Cr2 => "cr2",
            ContainerKind::Nef => "nef",
        }
    }

    /// Pick the container kind from a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("cr2") {
            Some(ContainerKind::Cr2)
        } else if ext.eq_ignore_ascii_case("nef") {
            Some(ContainerKind::Nef)
        } else {
            None
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Cr2 => f.write_str("CR2"),
            ContainerKind::Nef => f.write_str("NEF"),
        }
    }
}

impl FromStr for ContainerKind {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.strip_prefix('.').unwrap_or(s);
        Self::from_extension(ext)
            .ok_or_else(|| ConvertError::UnsupportedConversion(format!("unknown raw container '{s}'")))
    }
}

/// A JPEG preview copied out of a raw container.
///
/// The bytes run from the matched SOI marker to the end of the source
/// buffer, so they may carry trailing sensor data after the JPEG's EOI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegPreview {
    offset: usize,
    bytes: Vec<u8>,
}

impl JpegPreview {
    pub(crate) fn new(offset: usize, bytes: Vec<u8>) -> Self {
        Self { offset, bytes }
    }

    /// Offset of the SOI marker in the source container.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The extracted bytes, starting with `FF D8`.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the preview and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Read dimensions and orientation from the preview's JPEG header.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::DecodeFailure` if the header cannot be parsed.
    pub fn info(&self) -> Result<PreviewInfo, ConvertError> {
        info::read_preview_info(&self.bytes)
    }
}
