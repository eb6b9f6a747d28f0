//! Export encoding for Pixelstudio.
//!
//! The displayed buffer leaves the core as lossless PNG bytes under a fixed
//! file name. Like decoding, this runs synchronously inside WASM and the host
//! treats it as a blocking operation for the current image.

mod png;

pub use png::{encode_png, EncodeError, EXPORT_FILE_NAME};
