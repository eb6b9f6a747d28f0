//! Edit session.
//!
//! One session owns one baseline image at a time, together with the filter
//! vector, the displayed render, and the crop scene built for that baseline.
//! Operations that replace the baseline (crop commit, a finished external
//! edit, a fresh upload) swap the whole set atomically and bump a generation
//! counter; results carrying a stale generation are dropped, never merged.
//!
//! External (async) work is bracketed with a ticket: [`EditSession::begin_external`]
//! marks the session busy and hands back the current generation,
//! [`EditSession::complete_external`] applies or drops the outcome. While a
//! ticket is outstanding, conflicting edits fail fast with
//! [`SessionError::Busy`] instead of queueing.

use std::str::FromStr;

use thiserror::Error;

use crate::crop::{extract_crop, CropError};
use crate::decode::SourceImage;
use crate::encode::encode_png;
use crate::filters::render;
use crate::scene::{CropSelection, Scene, SceneError, Viewport};
use crate::{FilterState, PointOp};

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Another operation is still running against the current image
    #[error("Another operation is already in progress")]
    Busy,

    /// An external processing step reported failure
    #[error("Processing failed: {0}")]
    Processing(String),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// The continuous filter parameters addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterParam {
    Blur,
    Brightness,
    Contrast,
    Saturation,
    Sharpness,
    NoiseReduction,
}

/// A parameter name the session does not know.
#[derive(Debug, Error)]
#[error("Unknown filter parameter: {0}")]
pub struct UnknownFilterParam(pub String);

impl FromStr for FilterParam {
    type Err = UnknownFilterParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blur" => Ok(Self::Blur),
            "brightness" => Ok(Self::Brightness),
            "contrast" => Ok(Self::Contrast),
            "saturation" => Ok(Self::Saturation),
            "sharpness" => Ok(Self::Sharpness),
            "noiseReduction" | "noise_reduction" => Ok(Self::NoiseReduction),
            other => Err(UnknownFilterParam(other.to_string())),
        }
    }
}

/// Handle for one in-flight external operation.
///
/// The ticket pins the generation the work was started against; completion
/// with a ticket from an older generation is silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTicket {
    generation: u64,
}

impl PendingTicket {
    /// The baseline generation this ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The editing state for one open image.
#[derive(Debug, Clone)]
pub struct EditSession {
    viewport: Viewport,
    source: SourceImage,
    displayed: SourceImage,
    filters: FilterState,
    scene: Scene,
    generation: u64,
    pending: bool,
}

impl EditSession {
    /// Open a session on a decoded image.
    pub fn new(viewport: Viewport, source: SourceImage) -> Result<Self, SessionError> {
        let scene = Scene::load(viewport, &source)?;
        let displayed = source.clone();
        Ok(Self {
            viewport,
            source,
            displayed,
            filters: FilterState::default(),
            scene,
            generation: 0,
            pending: false,
        })
    }

    /// Replace the session's image with a fresh upload.
    ///
    /// Discards filters and selection, cancels any outstanding ticket by
    /// advancing the generation, and leaves the session untouched if the
    /// new image cannot be fitted.
    pub fn load_image(&mut self, source: SourceImage) -> Result<(), SessionError> {
        let scene = Scene::load(self.viewport, &source)?;
        self.displayed = source.clone();
        self.source = source;
        self.filters = FilterState::default();
        self.scene = scene;
        self.generation += 1;
        self.pending = false;
        Ok(())
    }

    /// The current baseline image.
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// The image currently shown to the user.
    pub fn displayed(&self) -> &SourceImage {
        &self.displayed
    }

    /// The current filter vector.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// The crop scene for the current baseline.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Generation of the current baseline.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an external operation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending
    }

    /// Set one continuous parameter and recompute the display.
    ///
    /// Any active point operation is cleared: slider edits always describe
    /// the full chain from the baseline.
    pub fn set_filter(&mut self, param: FilterParam, value: f32) -> Result<(), SessionError> {
        self.ensure_idle()?;

        self.filters.point_op = PointOp::None;
        match param {
            FilterParam::Blur => self.filters.blur = value,
            FilterParam::Brightness => self.filters.brightness = value,
            FilterParam::Contrast => self.filters.contrast = value,
            FilterParam::Saturation => self.filters.saturation = value,
            FilterParam::Sharpness => self.filters.sharpness = value,
            FilterParam::NoiseReduction => self.filters.noise_reduction = value,
        }
        self.displayed = render(&self.source, &self.filters);
        Ok(())
    }

    /// Activate a one-shot point operation and recompute the display.
    pub fn apply_point_op(&mut self, op: PointOp) -> Result<(), SessionError> {
        self.ensure_idle()?;

        self.filters.point_op = op;
        self.displayed = render(&self.source, &self.filters);
        Ok(())
    }

    /// Drop all filters and show the baseline again.
    pub fn reset_filters(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;

        self.filters = FilterState::default();
        self.displayed = self.source.clone();
        Ok(())
    }

    /// Track the host's latest selection rectangle.
    ///
    /// Pure geometry, so it stays available while external work is pending.
    pub fn update_selection(&mut self, selection: CropSelection) {
        self.scene.update_selection(selection);
    }

    /// Commit the crop: the selected region becomes the new baseline.
    ///
    /// On success the filters reset, the scene re-fits the cropped image,
    /// and the generation advances. On failure nothing changes.
    pub fn commit_crop(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;

        let cropped = extract_crop(&self.source, &self.scene.transform(), &self.scene.selection())?;
        let scene = Scene::load(self.viewport, &cropped)?;

        self.displayed = cropped.clone();
        self.source = cropped;
        self.filters = FilterState::default();
        self.scene = scene;
        self.generation += 1;
        Ok(())
    }

    /// Abandon the crop gesture: selection back to default, baseline kept.
    pub fn cancel_crop(&mut self) {
        self.scene.reset_selection();
    }

    /// Encode the displayed image for download.
    pub fn export_png(&self) -> Result<Vec<u8>, SessionError> {
        encode_png(&self.displayed.pixels, self.displayed.width, self.displayed.height)
            .map_err(|e| SessionError::Processing(e.to_string()))
    }

    /// Mark the session busy for an external operation on the current
    /// baseline and issue the ticket its completion must present.
    pub fn begin_external(&mut self) -> Result<PendingTicket, SessionError> {
        self.ensure_idle()?;

        self.pending = true;
        Ok(PendingTicket {
            generation: self.generation,
        })
    }

    /// Resolve an external operation.
    ///
    /// Returns `Ok(true)` when the result was installed as the new baseline,
    /// `Ok(false)` when the ticket was stale and the result dropped, and
    /// `Err(Processing)` when the operation itself failed; in the failure
    /// case the session is unblocked but otherwise unchanged.
    pub fn complete_external(
        &mut self,
        ticket: PendingTicket,
        result: Result<SourceImage, String>,
    ) -> Result<bool, SessionError> {
        if ticket.generation != self.generation {
            // The baseline moved on while the work was in flight
            return Ok(false);
        }
        self.pending = false;

        let image = result.map_err(SessionError::Processing)?;
        let scene = Scene::load(self.viewport, &image)?;

        self.displayed = image.clone();
        self.source = image;
        self.filters = FilterState::default();
        self.scene = scene;
        self.generation += 1;
        Ok(true)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        if self.pending {
            return Err(SessionError::Busy);
        }
        Ok(())
    }
}
