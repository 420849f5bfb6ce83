//! Linear SOI marker scan.

use tracing::debug;

use super::{ContainerKind, JpegPreview};
use crate::ConvertError;

/// JPEG Start-Of-Image marker, read big-endian.
const JPEG_SOI: u16 = 0xFFD8;

/// First byte of every JPEG marker segment.
const JPEG_MARKER_PREFIX: u8 = 0xFF;

/// Find the offset of the first qualifying SOI marker.
///
/// Every byte offset is tried, not just even ones. A candidate needs at least
/// one byte after the marker. For NEF that byte must be `0xFF` (the start of
/// the next marker segment); CR2 takes the first SOI as-is.
pub fn find_preview_offset(bytes: &[u8], kind: ContainerKind) -> Option<usize> {
    bytes.windows(3).position(|window| {
        u16::from_be_bytes([window[0], window[1]]) == JPEG_SOI
            && match kind {
                ContainerKind::Cr2 => true,
                ContainerKind::Nef => window[2] == JPEG_MARKER_PREFIX,
            }
    })
}

/// Extract the embedded JPEG preview from a CR2 or NEF file.
///
/// The preview runs from the first qualifying SOI marker to the end of
/// `bytes`. The container is not validated beyond the marker search.
///
/// # Arguments
///
/// * `bytes` - The whole raw file
/// * `kind` - Which container rules to apply to candidate markers
///
/// # Errors
///
/// Returns `ConvertError::NoPreviewFound` when the scan reaches the end of
/// the buffer without a match.
pub fn extract_preview(bytes: &[u8], kind: ContainerKind) -> Result<JpegPreview, ConvertError> {
    let offset = find_preview_offset(bytes, kind).ok_or(ConvertError::NoPreviewFound { kind })?;

    debug!(%kind, offset, total = bytes.len(), "found embedded JPEG preview");

    Ok(JpegPreview::new(offset, bytes[offset..].to_vec()))
}
