//! Header-level inspection of an extracted preview.
//!
//! Only the JPEG frame header and the EXIF block are read. Pixel data is
//! never decoded, so this stays cheap even for full-size previews.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};

use crate::ConvertError;

/// EXIF orientation values (1-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    Transpose = 5,
    Rotate90CW = 6,
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// Whether displaying with this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// What the preview's headers say about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewInfo {
    /// Stored width in pixels
    pub width: u32,
    /// Stored height in pixels
    pub height: u32,
    /// EXIF orientation, `Normal` when absent
    pub orientation: Orientation,
}

impl PreviewInfo {
    /// Width and height after applying the orientation.
    pub fn display_dimensions(&self) -> (u32, u32) {
        if self.orientation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// Read dimensions and EXIF orientation from JPEG bytes.
///
/// Bytes after the JPEG's EOI are ignored, so a preview straight out of
/// [`extract_preview`](super::extract_preview) can be passed as-is.
///
/// # Errors
///
/// Returns `ConvertError::DecodeFailure` if the frame header cannot be read.
pub fn read_preview_info(jpeg: &[u8]) -> Result<PreviewInfo, ConvertError> {
    let (width, height) = ImageReader::with_format(Cursor::new(jpeg), ImageFormat::Jpeg)
        .into_dimensions()
        .map_err(|e| ConvertError::DecodeFailure(e.to_string()))?;

    Ok(PreviewInfo {
        width,
        height,
        orientation: read_orientation(jpeg),
    })
}

fn read_orientation(jpeg: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(jpeg);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::fixtures::{make_container, MINIMAL_JPEG};
    use crate::preview::{extract_preview, ContainerKind};

    /// Insert an APP1 Exif segment carrying only an orientation tag.
    fn with_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut app1 = vec![0xFF, 0xE1, 0x00, 0x22];
        app1.extend_from_slice(b"Exif\0\0");
        app1.extend_from_slice(&[0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]);
        app1.extend_from_slice(&[0x01, 0x00]); // one entry
        app1.extend_from_slice(&[0x12, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00]);
        app1.extend_from_slice(&orientation.to_le_bytes());
        app1.extend_from_slice(&[0x00, 0x00]);
        app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // no next IFD

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_info_of_minimal_jpeg() {
        let info = read_preview_info(MINIMAL_JPEG).unwrap();
        assert_eq!(info.width, 1);
        assert_eq!(info.height, 1);
        assert_eq!(info.orientation, Orientation::Normal);
    }

    #[test]
    fn test_info_tolerates_trailing_container_bytes() {
        let container = make_container(512, MINIMAL_JPEG, 4096);
        let preview = extract_preview(&container, ContainerKind::Cr2).unwrap();

        let info = preview.info().unwrap();
        assert_eq!((info.width, info.height), (1, 1));
    }

    #[test]
    fn test_info_reads_exif_orientation() {
        let jpeg = with_orientation(MINIMAL_JPEG, 6);
        let info = read_preview_info(&jpeg).unwrap();
        assert_eq!(info.orientation, Orientation::Rotate90CW);
    }

    #[test]
    fn test_info_rejects_garbage() {
        let result = read_preview_info(&[0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02]);
        assert!(matches!(result, Err(ConvertError::DecodeFailure(_))));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(8), Orientation::Rotate270CW);
        assert_eq!(Orientation::from(0), Orientation::Normal);
        assert_eq!(Orientation::from(42), Orientation::Normal);
    }

    #[test]
    fn test_display_dimensions() {
        let info = PreviewInfo {
            width: 6000,
            height: 4000,
            orientation: Orientation::Rotate270CW,
        };
        assert_eq!(info.display_dimensions(), (4000, 6000));

        let info = PreviewInfo {
            orientation: Orientation::Rotate180,
            ..info
        };
        assert_eq!(info.display_dimensions(), (6000, 4000));
    }
}
