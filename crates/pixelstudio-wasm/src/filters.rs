//! Filter pipeline WASM bindings.
//!
//! This module provides JavaScript bindings for the filter-parameter vector,
//! allowing slider values to be manipulated from TypeScript, plus a stateless
//! entry point that renders a full vector against an image. Stateful hosts
//! should prefer [`crate::session::JsEditSession`], which owns the baseline.

use crate::types::JsSourceImage;
use pixelstudio_core::filters::render;
use pixelstudio_core::PointOp;
use wasm_bindgen::prelude::*;

/// Filter-parameter vector wrapper for JavaScript
#[wasm_bindgen]
pub struct JsFilterState {
    inner: pixelstudio_core::FilterState,
}

#[wasm_bindgen]
impl JsFilterState {
    /// Create a new filter state with default (identity) values
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: pixelstudio_core::FilterState::new(),
        }
    }

    /// Get blur strength
    #[wasm_bindgen(getter)]
    pub fn blur(&self) -> f32 {
        self.inner.blur
    }

    /// Set blur strength (0 to 10)
    #[wasm_bindgen(setter)]
    pub fn set_blur(&mut self, value: f32) {
        self.inner.blur = value;
    }

    /// Get brightness offset
    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> f32 {
        self.inner.brightness
    }

    /// Set brightness offset (-50 to 50)
    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: f32) {
        self.inner.brightness = value;
    }

    /// Get contrast offset
    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> f32 {
        self.inner.contrast
    }

    /// Set contrast offset (-50 to 50)
    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: f32) {
        self.inner.contrast = value;
    }

    /// Get saturation offset
    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> f32 {
        self.inner.saturation
    }

    /// Set saturation offset (-50 to 100)
    #[wasm_bindgen(setter)]
    pub fn set_saturation(&mut self, value: f32) {
        self.inner.saturation = value;
    }

    /// Get sharpening strength
    #[wasm_bindgen(getter)]
    pub fn sharpness(&self) -> f32 {
        self.inner.sharpness
    }

    /// Set sharpening strength (0 to 50)
    #[wasm_bindgen(setter)]
    pub fn set_sharpness(&mut self, value: f32) {
        self.inner.sharpness = value;
    }

    /// Get denoising strength
    #[wasm_bindgen(getter)]
    pub fn noise_reduction(&self) -> f32 {
        self.inner.noise_reduction
    }

    /// Set denoising strength (0 to 50)
    #[wasm_bindgen(setter)]
    pub fn set_noise_reduction(&mut self, value: f32) {
        self.inner.noise_reduction = value;
    }

    /// Get the active point operation: "none", "grayscale" or "invert"
    #[wasm_bindgen(getter)]
    pub fn point_op(&self) -> String {
        match self.inner.point_op {
            PointOp::None => "none",
            PointOp::Grayscale => "grayscale",
            PointOp::Invert => "invert",
        }
        .to_string()
    }

    /// Activate the grayscale point operation
    pub fn set_grayscale(&mut self) {
        self.inner.point_op = PointOp::Grayscale;
    }

    /// Activate the invert point operation
    pub fn set_invert(&mut self) {
        self.inner.point_op = PointOp::Invert;
    }

    /// Clear any active point operation
    pub fn clear_point_op(&mut self) {
        self.inner.point_op = PointOp::None;
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(value: JsValue) -> Result<JsFilterState, JsValue> {
        let inner: pixelstudio_core::FilterState =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Default for JsFilterState {
    fn default() -> Self {
        Self::new()
    }
}

impl JsFilterState {
    /// Get a reference to the inner FilterState for use in apply_filters
    pub(crate) fn inner(&self) -> &pixelstudio_core::FilterState {
        &self.inner
    }
}

/// Render a filter vector against an image.
///
/// Takes an image and the full parameter vector, returning a new rendered
/// image. The input image is never modified; calling this again with the
/// same inputs yields byte-identical output.
///
/// # Example (TypeScript)
/// ```typescript
/// const filters = new JsFilterState();
/// filters.brightness = 20;
/// filters.blur = 2.5;
///
/// const rendered = apply_filters(sourceImage, filters);
/// const pixels = rendered.pixels();
/// ```
#[wasm_bindgen]
pub fn apply_filters(image: &JsSourceImage, filters: &JsFilterState) -> JsSourceImage {
    let source = image.to_source();
    JsSourceImage::from_source(render(&source, filters.inner()))
}
