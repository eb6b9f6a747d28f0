//! Pixelstudio Core - Interactive image editing library
//!
//! This crate provides the core editing functionality for Pixelstudio:
//! decoding uploads, fitting an image into the crop scene, mapping an
//! on-screen selection back to source pixels, the filter pipeline, and the
//! edit session that ties them together.

pub mod crop;
pub mod decode;
pub mod encode;
pub mod filters;
pub mod scene;
pub mod session;

pub use crop::{extract_crop, CropError};
pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{encode_png, EncodeError, EXPORT_FILE_NAME};
pub use filters::render;
pub use scene::{CropSelection, Scene, SceneError, SceneTransform, SelectionBounds, Viewport};
pub use session::{EditSession, FilterParam, PendingTicket, SessionError, UnknownFilterParam};

/// One-shot operations that fully replace pixel values.
///
/// Point operations are mutually exclusive and never stack: the render is
/// always point-op-of-baseline, and a continuous slider edit clears the slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PointOp {
    /// No one-shot operation active.
    #[default]
    None,
    /// Replace each channel with the channel average.
    Grayscale,
    /// Photographic negative (255 - channel).
    Invert,
}

/// The full filter-parameter vector for the current baseline.
///
/// Continuous values are percentage offsets from their neutral setting
/// (brightness/contrast/saturation) or pass strengths (blur, sharpness,
/// noise reduction). Every recompute of the displayed image uses the whole
/// vector at once; nothing is layered onto a previous render.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterState {
    /// Blur strength (0 to 10); gaussian sigma is `blur * 0.5` pixels.
    pub blur: f32,
    /// Brightness offset from 100% (-50 to 50).
    pub brightness: f32,
    /// Contrast offset from 100% (-50 to 50).
    pub contrast: f32,
    /// Saturation offset from 100% (-50 to 100).
    pub saturation: f32,
    /// Sharpening strength (0 to 50); gates an unsharp-mask pass when > 0.
    pub sharpness: f32,
    /// Denoising strength (0 to 50); gates a median pass when > 0.
    pub noise_reduction: f32,
    /// Active one-shot operation, if any.
    pub point_op: PointOp,
}

impl FilterState {
    /// Create a new FilterState with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Check if any continuous parameter is away from neutral.
    pub fn has_continuous(&self) -> bool {
        self.blur != 0.0
            || self.brightness != 0.0
            || self.contrast != 0.0
            || self.saturation != 0.0
            || self.sharpness != 0.0
            || self.noise_reduction != 0.0
    }
}
