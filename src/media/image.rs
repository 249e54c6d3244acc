//! Image preprocessing for vision requests
//!
//! Normalizes any decodable image to three-channel RGB, bounds the longer
//! edge at 2048 pixels, and re-encodes as base64 JPEG for inline transfer.

use crate::gemini::types::InlineData;
use crate::{Error, Result};
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

/// Longest edge allowed before downscaling.
pub const MAX_EDGE: u32 = 2048;

const JPEG_QUALITY: u8 = 85;

/// Read and process an image file into an inline payload.
pub fn process_image(path: &Path) -> Result<InlineData> {
    let bytes = std::fs::read(path)?;
    process_image_bytes(&bytes)
}

/// Process raw image bytes into an inline payload.
pub fn process_image_bytes(bytes: &[u8]) -> Result<InlineData> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::MediaProcessing(format!("failed to decode image: {e}")))?;

    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    let bounded = if rgb.width().max(rgb.height()) > MAX_EDGE {
        rgb.resize(MAX_EDGE, MAX_EDGE, FilterType::Lanczos3)
    } else {
        rgb
    };

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    bounded
        .write_with_encoder(encoder)
        .map_err(|e| Error::MediaProcessing(format!("failed to encode JPEG: {e}")))?;

    Ok(InlineData {
        mime_type: "image/jpeg".to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(&jpeg),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use image::ImageFormat;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn decode_payload(payload: &InlineData) -> image::DynamicImage {
        let jpeg = base64::engine::general_purpose::STANDARD
            .decode(&payload.data)
            .unwrap();
        image::load_from_memory(&jpeg).unwrap()
    }

    #[test]
    fn test_small_image_keeps_dimensions() {
        let payload = process_image_bytes(&png_bytes(64, 48)).unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");

        let output = decode_payload(&payload);
        assert_eq!(output.width(), 64);
        assert_eq!(output.height(), 48);
    }

    #[test]
    fn test_oversized_image_is_bounded_and_keeps_aspect_ratio() {
        let payload = process_image_bytes(&png_bytes(2500, 1000)).unwrap();
        let output = decode_payload(&payload);

        assert!(output.width() <= MAX_EDGE);
        assert!(output.height() <= MAX_EDGE);
        assert_eq!(output.width(), MAX_EDGE);

        let original_ratio = 2500.0 / 1000.0;
        let output_ratio = output.width() as f64 / output.height() as f64;
        assert!(
            (original_ratio - output_ratio).abs() < 0.01,
            "aspect ratio drifted: {output_ratio}"
        );
    }

    #[test]
    fn test_portrait_image_bounds_height() {
        let payload = process_image_bytes(&png_bytes(1000, 2500)).unwrap();
        let output = decode_payload(&payload);
        assert_eq!(output.height(), MAX_EDGE);
        assert!(output.width() <= MAX_EDGE);
    }

    #[test]
    fn test_output_is_jpeg() {
        let payload = process_image_bytes(&png_bytes(10, 10)).unwrap();
        let jpeg = base64::engine::general_purpose::STANDARD
            .decode(&payload.data)
            .unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_undecodable_input_is_a_media_error() {
        let err = process_image_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, Error::MediaProcessing(_)));
    }
}
