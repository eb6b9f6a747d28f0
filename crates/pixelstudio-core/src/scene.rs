//! Crop scene model.
//!
//! The scene is the geometric state behind the crop editor: a fixed viewport,
//! the fit-to-viewport transform for the current baseline, and the selection
//! rectangle the user drags around. Everything here is pure geometry in
//! scene (viewport) coordinates; mapping back to source pixels lives in
//! [`crate::crop`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::SourceImage;

/// Errors from building or updating the scene.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Image has a zero dimension and cannot be fitted
    #[error("Invalid image: dimensions {width}x{height} cannot be displayed")]
    InvalidImage { width: u32, height: u32 },
}

/// The fixed drawing surface the image is fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Surface width in scene units.
    pub width: f64,
    /// Surface height in scene units.
    pub height: f64,
    /// Breathing room subtracted from each axis before fitting.
    pub margin: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 500.0,
            margin: 40.0,
        }
    }
}

/// Uniform fit transform from source pixels to scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneTransform {
    /// Single scale applied to both axes (aspect ratio is preserved).
    pub scale_factor: f64,
    /// Scene x of the image's left edge.
    pub offset_x: f64,
    /// Scene y of the image's top edge.
    pub offset_y: f64,
}

/// An axis-aligned rectangle in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The user's selection rectangle as the host canvas reports it.
///
/// Interactive resizing arrives as a base size plus per-axis scale factors
/// rather than a resolved size; [`CropSelection::bounds`] collapses the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSelection {
    /// Scene x of the rectangle's left edge.
    pub left: f64,
    /// Scene y of the rectangle's top edge.
    pub top: f64,
    /// Base width before the interactive scale is applied.
    pub width: f64,
    /// Base height before the interactive scale is applied.
    pub height: f64,
    /// Horizontal resize factor accumulated by dragging.
    pub scale_x: f64,
    /// Vertical resize factor accumulated by dragging.
    pub scale_y: f64,
}

impl CropSelection {
    /// Resolve the selection into an explicit rectangle.
    ///
    /// Negative scale factors (a handle dragged past its opposite edge)
    /// collapse that axis to zero rather than producing a mirrored box.
    pub fn bounds(&self) -> SelectionBounds {
        SelectionBounds {
            x: self.left,
            y: self.top,
            width: self.width * self.scale_x.max(0.0),
            height: self.height * self.scale_y.max(0.0),
        }
    }
}

/// Geometric state of the crop editor for one baseline image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    viewport: Viewport,
    image_width: u32,
    image_height: u32,
    transform: SceneTransform,
    selection: CropSelection,
}

impl Scene {
    /// Fit an image into the viewport and place the default selection.
    ///
    /// The image is scaled uniformly so it fits inside the viewport minus
    /// the margin, never upscaled past that bound, and centered on both
    /// axes. Returns [`SceneError::InvalidImage`] for zero-sized images.
    pub fn load(viewport: Viewport, image: &SourceImage) -> Result<Self, SceneError> {
        if image.width == 0 || image.height == 0 {
            return Err(SceneError::InvalidImage {
                width: image.width,
                height: image.height,
            });
        }

        let image_width = image.width as f64;
        let image_height = image.height as f64;

        let scale_factor = ((viewport.width - viewport.margin) / image_width)
            .min((viewport.height - viewport.margin) / image_height);

        let scaled_width = image_width * scale_factor;
        let scaled_height = image_height * scale_factor;

        let transform = SceneTransform {
            scale_factor,
            offset_x: (viewport.width - scaled_width) / 2.0,
            offset_y: (viewport.height - scaled_height) / 2.0,
        };

        let mut scene = Self {
            viewport,
            image_width: image.width,
            image_height: image.height,
            transform,
            selection: CropSelection {
                left: 0.0,
                top: 0.0,
                width: 0.0,
                height: 0.0,
                scale_x: 1.0,
                scale_y: 1.0,
            },
        };
        scene.selection = scene.default_selection();
        Ok(scene)
    }

    /// The viewport this scene was built for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The fit transform for the current baseline.
    pub fn transform(&self) -> SceneTransform {
        self.transform
    }

    /// The current selection rectangle.
    pub fn selection(&self) -> CropSelection {
        self.selection
    }

    /// Where the fitted image sits in scene coordinates.
    pub fn image_rect(&self) -> SelectionBounds {
        SelectionBounds {
            x: self.transform.offset_x,
            y: self.transform.offset_y,
            width: self.image_width as f64 * self.transform.scale_factor,
            height: self.image_height as f64 * self.transform.scale_factor,
        }
    }

    /// The selection the scene starts with: half the displayed image,
    /// inset 25% from its top-left corner.
    pub fn default_selection(&self) -> CropSelection {
        let rect = self.image_rect();
        CropSelection {
            left: rect.x + rect.width * 0.25,
            top: rect.y + rect.height * 0.25,
            width: rect.width * 0.5,
            height: rect.height * 0.5,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Replace the selection with the host's latest rectangle.
    pub fn update_selection(&mut self, selection: CropSelection) {
        self.selection = selection;
    }

    /// Put the selection back at its default placement.
    pub fn reset_selection(&mut self) {
        self.selection = self.default_selection();
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
