//! Raster image re-encoding.
//!
//! Decodes a still image with the `image` crate and writes it back out in
//! another format. Animated sources (GIF, WebP) contribute their first frame,
//! and ICO sources their largest entry.

use std::fmt;
use std::io::Cursor;

use image::codecs::gif::GifEncoder;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ConvertError, ImageOptions};

/// Square sizes written into a generated icon, smallest first.
pub const ICO_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// Still-image formats handled by [`convert_raster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
    Bmp,
    Tiff,
    Ico,
}

impl RasterFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::WebP => ImageFormat::WebP,
            RasterFormat::Gif => ImageFormat::Gif,
            RasterFormat::Bmp => ImageFormat::Bmp,
            RasterFormat::Tiff => ImageFormat::Tiff,
            RasterFormat::Ico => ImageFormat::Ico,
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RasterFormat::Jpeg => "JPEG",
            RasterFormat::Png => "PNG",
            RasterFormat::WebP => "WebP",
            RasterFormat::Gif => "GIF",
            RasterFormat::Bmp => "BMP",
            RasterFormat::Tiff => "TIFF",
            RasterFormat::Ico => "ICO",
        };
        f.write_str(name)
    }
}

/// Decode `bytes` as `format`.
///
/// # Errors
///
/// Returns `ConvertError::DecodeFailure` if the bytes are not a valid image
/// of that format or the image has no pixels.
pub fn decode_raster(bytes: &[u8], format: RasterFormat) -> Result<DynamicImage, ConvertError> {
    let image = image::load_from_memory_with_format(bytes, format.image_format())
        .map_err(|e| ConvertError::DecodeFailure(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ConvertError::DecodeFailure(format!("{format} image has no pixels")));
    }
    Ok(image)
}

/// Encode `image` as `target`.
///
/// JPEG output is flattened onto white, since JPEG has no alpha. WebP output
/// is lossless. ICO output holds one square frame per entry of [`ICO_SIZES`].
///
/// # Errors
///
/// `UnsupportedConversion` for BMP and TIFF targets, `EncodeFailure` if the
/// encoder rejects the image.
pub fn encode_raster(
    image: &DynamicImage,
    target: RasterFormat,
    options: &ImageOptions,
) -> Result<Vec<u8>, ConvertError> {
    let mut buffer = Cursor::new(Vec::new());
    let (width, height) = (image.width(), image.height());

    let result = match target {
        RasterFormat::Jpeg => {
            let rgb = flatten_on_white(image);
            let quality = options.jpeg_quality.clamp(1, 100);
            JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        RasterFormat::Png => {
            let rgba = image.to_rgba8();
            PngEncoder::new(&mut buffer).write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        }
        RasterFormat::WebP => {
            let rgba = image.to_rgba8();
            WebPEncoder::new_lossless(&mut buffer).write_image(
                rgba.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            )
        }
        RasterFormat::Gif => {
            let rgba = image.to_rgba8();
            GifEncoder::new(&mut buffer).encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        }
        RasterFormat::Ico => encode_icon(image, &mut buffer),
        RasterFormat::Bmp | RasterFormat::Tiff => {
            return Err(ConvertError::UnsupportedConversion(format!(
                "{target} output is not supported"
            )))
        }
    };
    result.map_err(|e| ConvertError::EncodeFailure(format!("{target}: {e}")))?;

    Ok(buffer.into_inner())
}

/// Decode `bytes` as `source` and re-encode them as `target`.
pub fn convert_raster(
    bytes: &[u8],
    source: RasterFormat,
    target: RasterFormat,
    options: &ImageOptions,
) -> Result<Vec<u8>, ConvertError> {
    let image = decode_raster(bytes, source)?;
    debug!(%source, %target, width = image.width(), height = image.height(), "re-encoding image");
    encode_raster(&image, target, options)
}

/// Composite onto an opaque white background.
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

fn encode_icon(image: &DynamicImage, buffer: &mut Cursor<Vec<u8>>) -> image::ImageResult<()> {
    let rgba = image.to_rgba8();
    let squares: Vec<RgbaImage> = ICO_SIZES.iter().map(|&size| icon_square(&rgba, size)).collect();
    let frames = squares
        .iter()
        .map(|square| IcoFrame::as_png(square.as_raw(), square.width(), square.height(), ExtendedColorType::Rgba8))
        .collect::<image::ImageResult<Vec<_>>>()?;
    IcoEncoder::new(buffer).encode_images(&frames)
}

/// Scale `source` so its longer edge is `size`, centred on a transparent
/// `size`×`size` canvas.
fn icon_square(source: &RgbaImage, size: u32) -> RgbaImage {
    let (width, height) = fit_to_edge(source.width(), source.height(), size);
    let scaled = imageops::resize(source, width, height, FilterType::Triangle);

    let mut canvas = RgbaImage::new(size, size);
    imageops::replace(
        &mut canvas,
        &scaled,
        i64::from((size - width) / 2),
        i64::from((size - height) / 2),
    );
    canvas
}

/// Dimensions with the longer edge equal to `edge`, aspect ratio preserved.
fn fit_to_edge(width: u32, height: u32, edge: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| {
        let scaled = (u64::from(short) * u64::from(edge) + u64::from(long) / 2) / u64::from(long);
        (scaled as u32).clamp(1, edge)
    };
    if width >= height {
        (edge, scale(height, width))
    } else {
        (scale(width, height), edge)
    }
}
