//! Pixelstudio WASM - WebAssembly bindings for Pixelstudio
//!
//! This crate provides WASM bindings to expose the pixelstudio-core
//! functionality to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - The stateful edit session (upload, filters, crop, export)
//! - `filters` - Filter-parameter vector and stateless rendering
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings (JPEG/PNG upload)
//! - `encode` - Image encoding bindings (PNG export)
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession } from '@pixelstudio/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! // Open a session on an uploaded file
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const session = JsEditSession.from_bytes(bytes);
//! console.log(`Editing ${session.width}x${session.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod encode;
mod filters;
mod session;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use encode::{encode_png, encode_png_from_image, export_file_name};
pub use filters::{apply_filters, JsFilterState};
pub use session::JsEditSession;
pub use types::JsSourceImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
