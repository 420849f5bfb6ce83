//! Sequential per-file conversion.
//!
//! The web UI collects files, then converts them one after another and saves
//! each result. This module holds that loop without any UI state: the caller
//! owns the [`ConversionRequest`]s and gets one [`ConversionOutcome`] back per
//! request, in the same order. A failed file never stops the batch.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audio::{encode_mp3_with, encode_wav, AudioDecoder, Mp3EncoderFactory};
use crate::naming::{self, MIME_GIF, MIME_ICO, MIME_JPEG, MIME_MP3, MIME_PNG, MIME_WAV, MIME_WEBP};
use crate::preview::{extract_preview, ContainerKind};
use crate::raster::{convert_raster, RasterFormat};
use crate::{ConvertError, ConvertOptions};

/// The conversions this crate can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Conversion {
    Cr2ToJpg,
    NefToJpg,
    WavToMp3,
    FlacToMp3,
    Mp3ToWav,
    JpgToPng,
    JpgToWebp,
    JpgToGif,
    PngToWebp,
    PngToIco,
    BmpToPng,
    WebpToJpg,
    GifToWebp,
    TiffToJpg,
    IcoToPng,
}

impl Conversion {
    /// Every conversion. Where several share a source extension, the first
    /// listed is the one [`Conversion::for_file_name`] picks.
    pub const ALL: [Conversion; 15] = [
        Conversion::Cr2ToJpg,
        Conversion::NefToJpg,
        Conversion::WavToMp3,
        Conversion::FlacToMp3,
        Conversion::Mp3ToWav,
        Conversion::JpgToPng,
        Conversion::JpgToWebp,
        Conversion::JpgToGif,
        Conversion::PngToWebp,
        Conversion::PngToIco,
        Conversion::BmpToPng,
        Conversion::WebpToJpg,
        Conversion::GifToWebp,
        Conversion::TiffToJpg,
        Conversion::IcoToPng,
    ];

    /// Pick the default conversion for a source file by its extension.
    pub fn for_file_name(file_name: &str) -> Option<Self> {
        let ext = naming::extension_of(file_name)?;
        Self::ALL
            .into_iter()
            .find(|conversion| conversion.source_extensions().contains(&ext.as_str()))
    }

    /// The conversion from a source file's extension to `target_extension`
    /// (with or without the dot, any case).
    pub fn between(file_name: &str, target_extension: &str) -> Option<Self> {
        let ext = naming::extension_of(file_name)?;
        let target = target_extension.trim_start_matches('.');
        Self::ALL.into_iter().find(|conversion| {
            conversion.source_extensions().contains(&ext.as_str())
                && conversion.target_extension()[1..].eq_ignore_ascii_case(target)
        })
    }

    /// Accepted source extensions, lowercase and without the dot.
    pub fn source_extensions(self) -> &'static [&'static str] {
        match self {
            Conversion::Cr2ToJpg => &["cr2"],
            Conversion::NefToJpg => &["nef"],
            Conversion::WavToMp3 => &["wav"],
            Conversion::FlacToMp3 => &["flac"],
            Conversion::Mp3ToWav => &["mp3"],
            Conversion::JpgToPng | Conversion::JpgToWebp | Conversion::JpgToGif => &["jpg", "jpeg"],
            Conversion::PngToWebp | Conversion::PngToIco => &["png"],
            Conversion::BmpToPng => &["bmp"],
            Conversion::WebpToJpg => &["webp"],
            Conversion::GifToWebp => &["gif"],
            Conversion::TiffToJpg => &["tiff", "tif"],
            Conversion::IcoToPng => &["ico"],
        }
    }

    /// Primary source extension, lowercase and without the dot.
    pub fn source_extension(self) -> &'static str {
        self.source_extensions()[0]
    }

    /// Extensions replaced when naming the output, with their dots.
    fn replaced_extensions(self) -> &'static [&'static str] {
        match self {
            Conversion::Cr2ToJpg => &[".cr2"],
            Conversion::NefToJpg => &[".nef"],
            Conversion::WavToMp3 | Conversion::FlacToMp3 => &[".wav", ".flac"],
            Conversion::Mp3ToWav => &[".mp3"],
            Conversion::JpgToPng | Conversion::JpgToWebp | Conversion::JpgToGif => &[".jpg", ".jpeg"],
            Conversion::PngToWebp | Conversion::PngToIco => &[".png"],
            Conversion::BmpToPng => &[".bmp"],
            Conversion::WebpToJpg => &[".webp"],
            Conversion::GifToWebp => &[".gif"],
            Conversion::TiffToJpg => &[".tiff", ".tif"],
            Conversion::IcoToPng => &[".ico"],
        }
    }

    /// Output extension, with its dot.
    pub fn target_extension(self) -> &'static str {
        match self {
            Conversion::Cr2ToJpg | Conversion::NefToJpg | Conversion::WebpToJpg | Conversion::TiffToJpg => ".jpg",
            Conversion::WavToMp3 | Conversion::FlacToMp3 => ".mp3",
            Conversion::Mp3ToWav => ".wav",
            Conversion::JpgToPng | Conversion::BmpToPng | Conversion::IcoToPng => ".png",
            Conversion::JpgToWebp | Conversion::PngToWebp | Conversion::GifToWebp => ".webp",
            Conversion::JpgToGif => ".gif",
            Conversion::PngToIco => ".ico",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self.target_extension() {
            ".jpg" => MIME_JPEG,
            ".mp3" => MIME_MP3,
            ".wav" => MIME_WAV,
            ".png" => MIME_PNG,
            ".webp" => MIME_WEBP,
            ".gif" => MIME_GIF,
            _ => MIME_ICO,
        }
    }

    /// Name to save the converted `source` file under.
    pub fn output_file_name(self, source: &str) -> String {
        naming::output_file_name(source, self.replaced_extensions(), self.target_extension())
    }

    fn container_kind(self) -> Option<ContainerKind> {
        match self {
            Conversion::Cr2ToJpg => Some(ContainerKind::Cr2),
            Conversion::NefToJpg => Some(ContainerKind::Nef),
            _ => None,
        }
    }

    /// Source and target formats for the image re-encoding conversions.
    fn raster_formats(self) -> Option<(RasterFormat, RasterFormat)> {
        use RasterFormat::*;
        let formats = match self {
            Conversion::JpgToPng => (Jpeg, Png),
            Conversion::JpgToWebp => (Jpeg, WebP),
            Conversion::JpgToGif => (Jpeg, Gif),
            Conversion::PngToWebp => (Png, WebP),
            Conversion::PngToIco => (Png, Ico),
            Conversion::BmpToPng => (Bmp, Png),
            Conversion::WebpToJpg => (WebP, Jpeg),
            Conversion::GifToWebp => (Gif, WebP),
            Conversion::TiffToJpg => (Tiff, Jpeg),
            Conversion::IcoToPng => (Ico, Png),
            _ => return None,
        };
        Some(formats)
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Conversion::Cr2ToJpg => "CR2 to JPG",
            Conversion::NefToJpg => "NEF to JPG",
            Conversion::WavToMp3 => "WAV to MP3",
            Conversion::FlacToMp3 => "FLAC to MP3",
            Conversion::Mp3ToWav => "MP3 to WAV",
            Conversion::JpgToPng => "JPG to PNG",
            Conversion::JpgToWebp => "JPG to WebP",
            Conversion::JpgToGif => "JPG to GIF",
            Conversion::PngToWebp => "PNG to WebP",
            Conversion::PngToIco => "PNG to ICO",
            Conversion::BmpToPng => "BMP to PNG",
            Conversion::WebpToJpg => "WebP to JPG",
            Conversion::GifToWebp => "GIF to WebP",
            Conversion::TiffToJpg => "TIFF to JPG",
            Conversion::IcoToPng => "ICO to PNG",
        };
        f.write_str(name)
    }
}

/// One selected file: its name and full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ConversionRequest {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// A finished conversion, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Result for one request in a batch.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// Name of the source file
    pub source_name: String,
    pub result: Result<ConvertedFile, ConvertError>,
}

impl ConversionOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Success and failure counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ConversionOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        Self {
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Runs conversions with a fixed set of options and audio codecs.
pub struct Converter {
    options: ConvertOptions,
    decoder: Box<dyn AudioDecoder>,
    mp3_encoders: Box<dyn Mp3EncoderFactory>,
}

impl Converter {
    /// Converter using Symphonia for decoding and LAME for MP3.
    #[cfg(all(feature = "lame", feature = "symphonia"))]
    pub fn new(options: ConvertOptions) -> Self {
        Self::with_codecs(
            options,
            Box::new(crate::audio::SymphoniaDecoder::new()),
            Box::new(crate::audio::LameEncoderFactory),
        )
    }

    /// Converter with caller-supplied audio codecs.
    pub fn with_codecs(
        options: ConvertOptions,
        decoder: Box<dyn AudioDecoder>,
        mp3_encoders: Box<dyn Mp3EncoderFactory>,
    ) -> Self {
        Self {
            options,
            decoder,
            mp3_encoders,
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a single file.
    ///
    /// # Errors
    ///
    /// Any [`ConvertError`]; all of them concern this file only.
    pub fn convert(
        &self,
        conversion: Conversion,
        request: &ConversionRequest,
    ) -> Result<ConvertedFile, ConvertError> {
        let bytes = if let Some(kind) = conversion.container_kind() {
            extract_preview(&request.bytes, kind)?.into_bytes()
        } else if let Some((source, target)) = conversion.raster_formats() {
            convert_raster(&request.bytes, source, target, &self.options.image)?
        } else {
            self.convert_audio(conversion, &request.bytes)?
        };

        Ok(ConvertedFile {
            file_name: conversion.output_file_name(&request.file_name),
            mime_type: conversion.mime_type(),
            bytes,
        })
    }

    fn convert_audio(&self, conversion: Conversion, bytes: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let audio = self.decoder.decode(bytes, Some(conversion.source_extension()))?;
        if conversion == Conversion::Mp3ToWav {
            return Ok(encode_wav(&audio).into_bytes());
        }
        let mut encoder = self
            .mp3_encoders
            .create(audio.channel_count(), audio.sample_rate(), &self.options.mp3)?;
        Ok(encode_mp3_with(encoder.as_mut(), &audio)?.into_bytes())
    }

    /// Convert a file, choosing the conversion from its extension.
    pub fn convert_detected(&self, request: &ConversionRequest) -> Result<ConvertedFile, ConvertError> {
        let conversion = Conversion::for_file_name(&request.file_name).ok_or_else(|| {
            ConvertError::UnsupportedConversion(format!("no converter for '{}'", request.file_name))
        })?;
        self.convert(conversion, request)
    }

    /// Convert every request in order, one at a time.
    ///
    /// Failures are logged and recorded in the matching outcome; the next
    /// file is converted regardless.
    pub fn convert_batch(
        &self,
        conversion: Conversion,
        requests: &[ConversionRequest],
    ) -> Vec<ConversionOutcome> {
        let outcomes: Vec<ConversionOutcome> = requests
            .iter()
            .map(|request| {
                let result = self.convert(conversion, request);
                if let Err(e) = &result {
                    warn!(file = %request.file_name, %conversion, error = %e, "conversion failed");
                }
                ConversionOutcome {
                    source_name: request.file_name.clone(),
                    result,
                }
            })
            .collect();

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(%conversion, succeeded = summary.succeeded, failed = summary.failed, "batch finished");

        outcomes
    }
}
