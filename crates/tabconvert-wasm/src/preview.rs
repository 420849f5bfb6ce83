//! Raw preview WASM bindings.
//!
//! # Functions
//!
//! - [`extract_raw_preview`] - Copy the embedded JPEG out of a CR2/NEF file
//! - [`find_raw_preview_offset`] - Locate the preview without copying it
//! - [`read_preview_info`] - Dimensions and orientation of an extracted preview
//!
//! # Example
//!
//! ```typescript
//! import { extract_raw_preview } from '@tabconvert/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const jpeg = extract_raw_preview(bytes, 'nef');
//! const blob = new Blob([jpeg], { type: 'image/jpeg' });
//! ```

use tabconvert_core::preview::{self, ContainerKind};
use wasm_bindgen::prelude::*;

use crate::types::to_js_error;

/// Extract the embedded JPEG preview from a raw file.
///
/// # Arguments
///
/// * `bytes` - The whole raw file as a `Uint8Array`
/// * `kind` - `"cr2"` or `"nef"` (case-insensitive, leading dot allowed)
///
/// # Errors
///
/// Throws if `kind` is unknown or no preview marker is found.
#[wasm_bindgen]
pub fn extract_raw_preview(bytes: &[u8], kind: &str) -> Result<Vec<u8>, JsValue> {
    let kind: ContainerKind = kind.parse().map_err(to_js_error)?;
    preview::extract_preview(bytes, kind)
        .map(|p| p.into_bytes())
        .map_err(to_js_error)
}

/// Offset of the preview's SOI marker, or `undefined` if there is none or
/// `kind` is not a raw container name.
#[wasm_bindgen]
pub fn find_raw_preview_offset(bytes: &[u8], kind: &str) -> Option<usize> {
    let kind: ContainerKind = kind.parse().ok()?;
    preview::find_preview_offset(bytes, kind)
}

/// Read `{ width, height, orientation }` from an extracted preview.
///
/// # Errors
///
/// Throws if the JPEG header cannot be parsed.
#[wasm_bindgen]
pub fn read_preview_info(jpeg: &[u8]) -> Result<JsValue, JsValue> {
    let info = preview::read_preview_info(jpeg).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&info).map_err(|e| JsValue::from_str(&e.to_string()))
}
