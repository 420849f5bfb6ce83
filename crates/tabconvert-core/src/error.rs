//! Error type shared by every conversion.

use thiserror::Error;

use crate::preview::ContainerKind;

/// Errors that can occur while converting a single file.
///
/// All variants are scoped to one file. A batch records the error and moves
/// on to the next file.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The marker scan reached the end of the buffer without a usable SOI.
    #[error("No embedded JPEG preview found in {kind} file")]
    NoPreviewFound { kind: ContainerKind },

    /// A delegated decoder rejected the input.
    #[error("Decoding failed: {0}")]
    DecodeFailure(String),

    /// A delegated encoder failed or could not be configured.
    #[error("Encoding failed: {0}")]
    EncodeFailure(String),

    /// The PCM buffer violates its channel or length invariants.
    #[error("Invalid audio buffer: {0}")]
    InvalidAudio(String),

    /// No conversion is registered for the given source.
    #[error("Unsupported conversion: {0}")]
    UnsupportedConversion(String),
}
