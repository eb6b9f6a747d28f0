//! Crop extraction.
//!
//! Maps the scene-space selection rectangle back through the fit transform
//! into source pixel coordinates and copies that region out of the baseline.
//! The continuous rectangle is snapped outward (floor the origin, ceil the
//! far edge) so the user never loses a sliver of the pixels they framed.

use thiserror::Error;

use crate::decode::SourceImage;
use crate::scene::{CropSelection, SceneTransform};

/// Errors from mapping a selection back to source pixels.
#[derive(Debug, Error)]
pub enum CropError {
    /// Selection does not overlap the image
    #[error("Crop selection does not cover any image pixels")]
    EmptySelection,
}

/// Extract the selected region of `source` as a standalone image.
///
/// The selection is resolved to scene coordinates, translated and divided
/// through the fit transform, clamped to the image, and snapped to whole
/// pixels. A selection entirely off the image (or collapsed to zero area)
/// is an error, never a zero-sized image.
pub fn extract_crop(
    source: &SourceImage,
    transform: &SceneTransform,
    selection: &CropSelection,
) -> Result<SourceImage, CropError> {
    let bounds = selection.bounds();
    let scale = transform.scale_factor;

    // Scene -> source, clamping the origin into the image first so the
    // width clamp below is measured from the visible corner
    let x = ((bounds.x - transform.offset_x) / scale).max(0.0);
    let y = ((bounds.y - transform.offset_y) / scale).max(0.0);
    let w = (bounds.width / scale).min(source.width as f64 - x);
    let h = (bounds.height / scale).min(source.height as f64 - y);

    if w <= 0.0 || h <= 0.0 {
        return Err(CropError::EmptySelection);
    }

    // Snap outward to whole pixels
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = ((x + w).ceil() as u32).min(source.width);
    let y1 = ((y + h).ceil() as u32).min(source.height);

    if x1 <= x0 || y1 <= y0 {
        return Err(CropError::EmptySelection);
    }

    let out_width = x1 - x0;
    let out_height = y1 - y0;

    let src_stride = source.width as usize * 3;
    let out_stride = out_width as usize * 3;
    let mut pixels = vec![0u8; out_stride * out_height as usize];

    for row in 0..out_height as usize {
        let src_start = (y0 as usize + row) * src_stride + x0 as usize * 3;
        let out_start = row * out_stride;
        pixels[out_start..out_start + out_stride]
            .copy_from_slice(&source.pixels[src_start..src_start + out_stride]);
    }

    Ok(SourceImage::new(out_width, out_height, pixels))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn image(width: u32, height: u32) -> SourceImage {
        let pixels = (0..(width * height * 3) as usize)
            .map(|i| (i % 251) as u8)
            .collect();
        SourceImage::new(width, height, pixels)
    }

    fn identity_transform() -> SceneTransform {
        SceneTransform {
            scale_factor: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    proptest! {
        /// Property: A successful crop never exceeds the source bounds.
        #[test]
        fn prop_crop_within_source(
            (src_w, src_h) in (4u32..=64, 4u32..=64),
            left in -20.0f64..=80.0,
            top in -20.0f64..=80.0,
            width in 0.1f64..=80.0,
            height in 0.1f64..=80.0,
        ) {
            let img = image(src_w, src_h);
            let sel = CropSelection {
                left, top, width, height,
                scale_x: 1.0,
                scale_y: 1.0,
            };

            if let Ok(cropped) = extract_crop(&img, &identity_transform(), &sel) {
                prop_assert!(cropped.width >= 1);
                prop_assert!(cropped.height >= 1);
                prop_assert!(cropped.width <= src_w);
                prop_assert!(cropped.height <= src_h);
                prop_assert_eq!(
                    cropped.pixels.len(),
                    (cropped.width * cropped.height * 3) as usize
                );
            }
        }

        /// Property: Extraction is deterministic.
        #[test]
        fn prop_crop_deterministic(
            left in 0.0f64..=30.0,
            top in 0.0f64..=30.0,
            width in 0.5f64..=30.0,
            height in 0.5f64..=30.0,
        ) {
            let img = image(48, 48);
            let sel = CropSelection {
                left, top, width, height,
                scale_x: 1.0,
                scale_y: 1.0,
            };

            let first = extract_crop(&img, &identity_transform(), &sel);
            let second = extract_crop(&img, &identity_transform(), &sel);
            match (first, second) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(_), Err(_)) => {}
                _ => prop_assert!(false, "Determinism violated"),
            }
        }

        /// Property: An in-bounds selection covers its requested region
        /// within one pixel of outward snap on each edge.
        #[test]
        fn prop_in_bounds_selection_size(
            x0 in 0u32..=20,
            y0 in 0u32..=20,
            w in 1u32..=20,
            h in 1u32..=20,
        ) {
            let img = image(48, 48);
            let sel = CropSelection {
                left: x0 as f64,
                top: y0 as f64,
                width: w as f64,
                height: h as f64,
                scale_x: 1.0,
                scale_y: 1.0,
            };

            let cropped = extract_crop(&img, &identity_transform(), &sel).unwrap();
            // Integer-aligned selections extract exactly
            prop_assert_eq!(cropped.width, w);
            prop_assert_eq!(cropped.height, h);
        }
    }
}
