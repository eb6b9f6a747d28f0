//! Edit session WASM bindings.
//!
//! Wraps the core [`EditSession`] so the host UI can drive the whole editing
//! lifecycle through one object: upload, sliders, point operations, crop
//! gestures, export, and bracketed external edits (work the host runs
//! off-thread, like server-side background removal).
//!
//! The wrapper also holds the ticket for the one in-flight external edit, so
//! JavaScript never has to carry an opaque handle across its async boundary.
//!
//! # Example
//!
//! ```typescript
//! import { JsEditSession } from '@pixelstudio/wasm';
//!
//! const session = JsEditSession.from_bytes(fileBytes);
//! session.set_filter('brightness', 20);
//! session.update_selection(196, 135, 306, 230, 1.0, 1.0);
//! session.commit_crop();
//! const png = session.export_png();
//! ```

use crate::types::JsSourceImage;
use pixelstudio_core::session::{EditSession, FilterParam, PendingTicket};
use pixelstudio_core::{decode, PointOp, Viewport};
use wasm_bindgen::prelude::*;

/// Edit session wrapper for JavaScript
#[wasm_bindgen]
pub struct JsEditSession {
    inner: EditSession,
    ticket: Option<PendingTicket>,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Open a session on an already-decoded image.
    #[wasm_bindgen(constructor)]
    pub fn new(image: &JsSourceImage) -> Result<JsEditSession, JsValue> {
        let inner = EditSession::new(Viewport::default(), image.to_source())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner,
            ticket: None,
        })
    }

    /// Decode uploaded file bytes and open a session in one step.
    pub fn from_bytes(bytes: &[u8]) -> Result<JsEditSession, JsValue> {
        let source = decode::decode_image(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let inner = EditSession::new(Viewport::default(), source)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner,
            ticket: None,
        })
    }

    /// Replace the session's image with a fresh upload.
    ///
    /// Filters and selection reset; any in-flight external edit is
    /// superseded and its result will be dropped on arrival.
    pub fn load_image(&mut self, image: &JsSourceImage) -> Result<(), JsValue> {
        self.inner
            .load_image(image.to_source())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Set one continuous filter parameter and recompute the display.
    ///
    /// Parameter names match the host's slider ids: "blur", "brightness",
    /// "contrast", "saturation", "sharpness", "noiseReduction".
    pub fn set_filter(&mut self, name: &str, value: f32) -> Result<(), JsValue> {
        let param: FilterParam = name
            .parse()
            .map_err(|e: pixelstudio_core::UnknownFilterParam| {
                JsValue::from_str(&e.to_string())
            })?;
        self.inner
            .set_filter(param, value)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Apply the grayscale point operation to the baseline.
    pub fn grayscale(&mut self) -> Result<(), JsValue> {
        self.inner
            .apply_point_op(PointOp::Grayscale)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Apply the invert point operation to the baseline.
    pub fn invert(&mut self) -> Result<(), JsValue> {
        self.inner
            .apply_point_op(PointOp::Invert)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Drop all filters and show the baseline again.
    pub fn reset_filters(&mut self) -> Result<(), JsValue> {
        self.inner
            .reset_filters()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Track the host's latest selection rectangle.
    pub fn update_selection(
        &mut self,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        scale_x: f64,
        scale_y: f64,
    ) {
        self.inner.update_selection(pixelstudio_core::CropSelection {
            left,
            top,
            width,
            height,
            scale_x,
            scale_y,
        });
    }

    /// Commit the crop: the selected region becomes the new baseline.
    pub fn commit_crop(&mut self) -> Result<(), JsValue> {
        self.inner
            .commit_crop()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Abandon the crop gesture and restore the default selection.
    pub fn cancel_crop(&mut self) {
        self.inner.cancel_crop();
    }

    /// The image currently shown to the user.
    pub fn displayed(&self) -> JsSourceImage {
        JsSourceImage::from_source(self.inner.displayed().clone())
    }

    /// Width of the displayed image in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.displayed().width
    }

    /// Height of the displayed image in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.displayed().height
    }

    /// Encode the displayed image as PNG for download.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.inner
            .export_png()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Generation of the current baseline.
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> f64 {
        self.inner.generation() as f64
    }

    /// Whether an external edit is outstanding.
    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }

    /// Uniform scale applied to fit the image into the viewport.
    #[wasm_bindgen(getter)]
    pub fn scale_factor(&self) -> f64 {
        self.inner.scene().transform().scale_factor
    }

    /// Scene x of the fitted image's left edge.
    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> f64 {
        self.inner.scene().transform().offset_x
    }

    /// Scene y of the fitted image's top edge.
    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> f64 {
        self.inner.scene().transform().offset_y
    }

    /// The current selection rectangle as a plain object.
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.scene().selection())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The default selection placement for the current baseline.
    pub fn default_selection(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.scene().default_selection())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Where the fitted image sits in scene coordinates.
    pub fn image_rect(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.scene().image_rect())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Mark the session busy for an external edit of the current baseline.
    ///
    /// Fails if an external edit is already outstanding.
    pub fn begin_external_edit(&mut self) -> Result<(), JsValue> {
        let ticket = self
            .inner
            .begin_external()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.ticket = Some(ticket);
        Ok(())
    }

    /// Deliver the result of the external edit.
    ///
    /// Returns `true` if the image was installed as the new baseline and
    /// `false` if the result was stale (the baseline changed while the edit
    /// was in flight) and dropped.
    pub fn complete_external_edit(&mut self, image: &JsSourceImage) -> Result<bool, JsValue> {
        let Some(ticket) = self.ticket.take() else {
            return Err(JsValue::from_str("No external edit in progress"));
        };
        let applied = self
            .inner
            .complete_external(ticket, Ok(image.to_source()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        #[cfg(target_arch = "wasm32")]
        if !applied {
            web_sys::console::warn_1(&"Dropping stale external edit result".into());
        }
        Ok(applied)
    }

    /// Report that the external edit failed.
    ///
    /// Unblocks the session without changing the image, then surfaces the
    /// failure message as the error.
    pub fn fail_external_edit(&mut self, message: &str) -> Result<(), JsValue> {
        let Some(ticket) = self.ticket.take() else {
            return Err(JsValue::from_str("No external edit in progress"));
        };
        match self.inner.complete_external(ticket, Err(message.to_string())) {
            Ok(_) => Ok(()),
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> JsSourceImage {
        JsSourceImage::new(width, height, vec![100u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_session_creation() {
        let session = JsEditSession::new(&image(800, 600)).unwrap();
        assert_eq!(session.width(), 800);
        assert_eq!(session.height(), 600);
        assert_eq!(session.generation(), 0.0);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_scene_geometry_getters() {
        let session = JsEditSession::new(&image(800, 600)).unwrap();
        // 800x600 into 700x500 with margin 40: height binds
        let expected = 460.0 / 600.0;
        assert!((session.scale_factor() - expected).abs() < 1e-9);
        assert!((session.offset_y() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_commit_crop_updates_dimensions() {
        let mut session = JsEditSession::new(&image(800, 600)).unwrap();
        session.commit_crop().unwrap();
        // Default selection is half the image per axis
        assert!((session.width() as i64 - 400).unsigned_abs() <= 2);
        assert!((session.height() as i64 - 300).unsigned_abs() <= 2);
        assert_eq!(session.generation(), 1.0);
    }

    #[test]
    fn test_displayed_reflects_point_op() {
        let mut session =
            JsEditSession::new(&JsSourceImage::new(1, 1, vec![30, 60, 90])).unwrap();
        session.grayscale().unwrap();
        assert_eq!(session.displayed().pixels(), vec![60, 60, 60]);
    }

    #[test]
    fn test_external_edit_lifecycle() {
        let mut session = JsEditSession::new(&image(800, 600)).unwrap();
        session.begin_external_edit().unwrap();
        assert!(session.is_busy());

        let applied = session.complete_external_edit(&image(300, 200)).unwrap();
        assert!(applied);
        assert!(!session.is_busy());
        assert_eq!(session.width(), 300);
        assert_eq!(session.generation(), 1.0);
    }

    #[test]
    fn test_stale_external_edit_dropped() {
        let mut session = JsEditSession::new(&image(800, 600)).unwrap();
        session.begin_external_edit().unwrap();

        // A fresh upload supersedes the in-flight edit
        session.load_image(&image(640, 480)).unwrap();

        let applied = session.complete_external_edit(&image(10, 10)).unwrap();
        assert!(!applied);
        assert_eq!(session.width(), 640);
    }
}

/// WASM-specific tests exercising error paths, which construct JsValues.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn image(width: u32, height: u32) -> JsSourceImage {
        JsSourceImage::new(width, height, vec![100u8; (width * height * 3) as usize])
    }

    #[wasm_bindgen_test]
    fn test_unknown_filter_name_is_error() {
        let mut session = JsEditSession::new(&image(100, 100)).unwrap();
        assert!(session.set_filter("exposure", 1.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_complete_without_begin_is_error() {
        let mut session = JsEditSession::new(&image(100, 100)).unwrap();
        let result = session.complete_external_edit(&image(10, 10));
        assert!(result.is_err());
    }

    #[wasm_bindgen_test]
    fn test_edits_rejected_while_busy() {
        let mut session = JsEditSession::new(&image(100, 100)).unwrap();
        session.begin_external_edit().unwrap();

        assert!(session.set_filter("blur", 2.0).is_err());
        assert!(session.commit_crop().is_err());
        assert!(session.begin_external_edit().is_err());
    }

    #[wasm_bindgen_test]
    fn test_selection_serializes_to_plain_object() {
        let mut session = JsEditSession::new(&image(100, 100)).unwrap();
        session.update_selection(10.0, 20.0, 30.0, 40.0, 1.0, 1.0);

        let selection = session.selection().unwrap();
        let left = js_sys::Reflect::get(&selection, &"left".into()).unwrap();
        assert_eq!(left.as_f64(), Some(10.0));
        let width = js_sys::Reflect::get(&selection, &"width".into()).unwrap();
        assert_eq!(width.as_f64(), Some(30.0));
    }

    #[wasm_bindgen_test]
    fn test_failed_external_edit_unblocks() {
        let mut session = JsEditSession::new(&image(100, 100)).unwrap();
        session.begin_external_edit().unwrap();

        let result = session.fail_external_edit("model crashed");
        assert!(result.is_err());
        assert!(!session.is_busy());
        assert_eq!(session.width(), 100);
    }
}
