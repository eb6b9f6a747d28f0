//! Image encoding WASM bindings.
//!
//! Exposes the pixelstudio-core PNG export to JavaScript. Export is always
//! lossless PNG; the host wraps the returned bytes in a Blob and triggers a
//! download under [`export_file_name`].
//!
//! # Example
//!
//! ```typescript
//! import { encode_png_from_image, export_file_name } from '@pixelstudio/wasm';
//!
//! const png = encode_png_from_image(displayed);
//! const url = URL.createObjectURL(new Blob([png], { type: 'image/png' }));
//! link.download = export_file_name();
//! ```

use crate::types::JsSourceImage;
use pixelstudio_core::encode;
use wasm_bindgen::prelude::*;

/// Encode RGB pixel data to PNG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data as a `Uint8Array` (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Errors
///
/// Returns an error if:
/// - The pixel data length doesn't match width * height * 3
/// - Width or height is zero
/// - Encoding fails internally
#[wasm_bindgen]
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(pixels, width, height).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode a JsSourceImage to PNG bytes.
///
/// Convenience wrapper for images already living in WASM memory.
#[wasm_bindgen]
pub fn encode_png_from_image(image: &JsSourceImage) -> Result<Vec<u8>, JsValue> {
    let pixels = image.pixels();
    encode::encode_png(&pixels, image.width(), image.height())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The fixed file name the host should use for the download artifact.
#[wasm_bindgen]
pub fn export_file_name() -> String {
    encode::EXPORT_FILE_NAME.to_string()
}
