//! Whole-file conversion bindings.
//!
//! The converter page hands each selected file to [`convert_file`] in turn
//! and saves whatever comes back. Failures are per file; the page reports
//! them and carries on with the next one.

use tabconvert_core::{Conversion, ConversionRequest, ConvertOptions, Converter};
use wasm_bindgen::prelude::*;

use crate::types::{to_js_error, JsConvertedFile};

/// Parse conversion options from a JS object. `undefined` and `null` give the
/// defaults; missing fields fall back individually.
fn parse_options(options: JsValue) -> Result<ConvertOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(ConvertOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid conversion options: {}", e)))
}

/// Convert one file, picking the conversion from its extension.
///
/// # Arguments
///
/// * `file_name` - Source name, e.g. `"IMG_0001.CR2"`
/// * `bytes` - Full file contents
/// * `options` - Optional `{ mp3: { bitrateKbps }, image: { jpegQuality } }`
///
/// # Errors
///
/// Throws if the extension has no converter or the conversion fails.
///
/// # Example
///
/// ```typescript
/// for (const file of selectedFiles) {
///   try {
///     const out = convert_file(file.name, new Uint8Array(await file.arrayBuffer()));
///     download(out.fileName, new Blob([out.bytes], { type: out.mimeType }));
///   } catch (err) {
///     showNotification(`Failed to convert ${file.name}`, 'error');
///   }
/// }
/// ```
#[wasm_bindgen]
pub fn convert_file(file_name: &str, bytes: Vec<u8>, options: JsValue) -> Result<JsConvertedFile, JsValue> {
    let options = parse_options(options)?;
    let request = ConversionRequest::new(file_name, bytes);

    Converter::new(options)
        .convert_detected(&request)
        .map(JsConvertedFile::from_core)
        .map_err(|e| {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::warn_1(&JsValue::from_str(&format!("{}: {}", file_name, e)));
            to_js_error(e)
        })
}

/// Convert one file to an explicit target format.
///
/// Needed where a source has several outputs, e.g. PNG to WebP or to ICO.
///
/// # Arguments
///
/// * `file_name` - Source name, e.g. `"logo.png"`
/// * `bytes` - Full file contents
/// * `target_extension` - Output extension, e.g. `"ico"` or `".webp"`
/// * `options` - Optional `{ mp3: { bitrateKbps }, image: { jpegQuality } }`
///
/// # Errors
///
/// Throws if no converter goes from the source extension to the target or
/// the conversion fails.
#[wasm_bindgen]
pub fn convert_file_to(
    file_name: &str,
    bytes: Vec<u8>,
    target_extension: &str,
    options: JsValue,
) -> Result<JsConvertedFile, JsValue> {
    let options = parse_options(options)?;
    let conversion = Conversion::between(file_name, target_extension).ok_or_else(|| {
        JsValue::from_str(&format!("No converter from '{}' to '{}'", file_name, target_extension))
    })?;
    let request = ConversionRequest::new(file_name, bytes);

    Converter::new(options)
        .convert(conversion, &request)
        .map(JsConvertedFile::from_core)
        .map_err(to_js_error)
}

/// Whether `file_name` has an extension this module can convert.
#[wasm_bindgen]
pub fn is_convertible(file_name: &str) -> bool {
    Conversion::for_file_name(file_name).is_some()
}

/// The name a converted `file_name` would be saved under, or `undefined`
/// if there is no converter for it.
#[wasm_bindgen]
pub fn output_file_name(file_name: &str) -> Option<String> {
    Conversion::for_file_name(file_name).map(|c| c.output_file_name(file_name))
}

/// MIME type of the converted output, or `undefined`.
#[wasm_bindgen]
pub fn output_mime_type(file_name: &str) -> Option<String> {
    Conversion::for_file_name(file_name).map(|c| c.mime_type().to_string())
}
