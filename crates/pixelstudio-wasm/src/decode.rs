//! Image decoding WASM bindings.
//!
//! Exposes the pixelstudio-core upload decoding path to JavaScript. The host
//! hands over the raw bytes of a picked file; only JPEG and PNG are accepted
//! and EXIF orientation is corrected before pixels are returned.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@pixelstudio/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsSourceImage;
use pixelstudio_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an uploaded image file to RGB pixels.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes as a `Uint8Array`
///
/// # Returns
///
/// A `JsSourceImage` with orientation-corrected RGB data, or an error if the
/// bytes are not a valid JPEG or PNG file.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not recognizable as an image
/// - The format is neither JPEG nor PNG
/// - The file is recognized but corrupted
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsSourceImage::from_source)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
