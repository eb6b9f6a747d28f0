//! Upload decoding for Pixelstudio.
//!
//! This module turns an uploaded byte stream into the session's pixel
//! baseline:
//! - JPEG and PNG decoding (the only accepted upload types)
//! - EXIF orientation correction for camera JPEGs
//!
//! # Architecture
//!
//! The decode path is designed to be driven from Web Workers via WASM
//! bindings. All operations are synchronous and single-threaded within WASM;
//! the host treats the call as potentially slow and blocks conflicting edits
//! until it resolves.

mod raster;
mod types;

pub use raster::decode_image;
pub use types::{DecodeError, Orientation, SourceImage};
