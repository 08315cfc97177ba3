//! Decoding background images and watermark assets.
//!
//! Every source is normalized to RGBA8; formats without alpha get an opaque
//! channel.

use super::error::ImageError;
use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::io::Cursor;
use std::path::Path;

/// Decode in-memory image bytes, guessing the format from the content.
pub fn decode_rgba(data: &[u8]) -> Result<RgbaImage, ImageError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(format!("Failed to detect format: {}", e)))?;

    let img = reader
        .decode()
        .map_err(|e| ImageError::decode_failed(format!("Failed to decode: {}", e)))?;

    let rgba = img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(ImageError::decode_failed("Image has no pixels"));
    }

    Ok(rgba)
}

/// Read and decode an image file.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, ImageError> {
    let data = std::fs::read(path).map_err(|e| ImageError::read_failed(path, e.to_string()))?;
    let img = decode_rgba(&data)?;

    tracing::info!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "Loaded image"
    );

    Ok(img)
}
