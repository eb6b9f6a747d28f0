//! Upload decoding with EXIF orientation handling.
//!
//! The upload boundary accepts JPEG and PNG only. Other recognizable formats
//! are rejected before any pixel work happens.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, Orientation, SourceImage};

/// Decode an uploaded byte stream into a `SourceImage`.
///
/// JPEG input has its EXIF orientation applied so the pixel buffer matches
/// what the user saw in their camera roll.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognizable
/// image, `DecodeError::UnsupportedFormat` for recognized-but-rejected formats,
/// and `DecodeError::CorruptedFile` if decoding fails partway. The result is
/// always a fully-initialized buffer with positive dimensions or an error.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        let name = format.extensions_str().first().copied().unwrap_or("unknown");
        return Err(DecodeError::UnsupportedFormat(name.to_string()));
    }

    // Orientation tags only matter for camera JPEGs; PNGs carry none.
    let orientation = if format == ImageFormat::Jpeg {
        extract_orientation(bytes)
    } else {
        Orientation::Normal
    };

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    let decoded = SourceImage::from_rgb_image(oriented.into_rgb8());

    if decoded.is_empty() {
        return Err(DecodeError::EmptyImage);
    }
    Ok(decoded)
}

/// Extract EXIF orientation from JPEG bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
