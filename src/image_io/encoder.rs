//! Image encoder abstraction
//!
//! One encoder per export format behind a common trait. Encoders take raw
//! RGBA bytes; formats without alpha drop the channel themselves.

use super::error::ImageError;
use super::format::ExportFormat;

/// JPEG quality used for exports
pub const JPEG_EXPORT_QUALITY: u8 = 95;

/// Trait for image encoders
///
/// The trait is object-safe to allow dynamic dispatch from the factory.
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> ExportFormat;

    /// Encode raw RGBA image data (4 bytes per pixel) to the target format
    fn encode(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ImageError>;
}

/// JPEG encoder using the image crate
pub struct JpegEncoder {
    pub quality: u8,
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self {
            quality: JPEG_EXPORT_QUALITY,
        }
    }
}

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Jpeg
    }

    fn encode(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ImageError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        check_buffer("jpeg", data, width, height)?;

        // Convert RGBA to RGB (JPEG doesn't support alpha)
        let rgb_data = rgba_to_rgb(data);

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, self.quality.clamp(1, 100));

        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| ImageError::encode_failed("jpeg", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// PNG encoder using the image crate
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Png
    }

    fn encode(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ImageError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        check_buffer("png", data, width, height)?;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new(&mut output);

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| ImageError::encode_failed("png", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// WebP encoder using the image crate
///
/// Note: The `image` crate only supports lossless WebP encoding.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::WebP
    }

    fn encode(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ImageError> {
        use image::codecs::webp::WebPEncoder as ImageWebPEncoder;
        use image::ImageEncoder as _;
        use std::io::Cursor;

        check_buffer("webp", data, width, height)?;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageWebPEncoder::new_lossless(&mut output);

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| ImageError::encode_failed("webp", e.to_string()))?;

        Ok(output.into_inner())
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    /// Create an encoder for the specified output format
    pub fn create(format: ExportFormat) -> Box<dyn ImageEncoder> {
        match format {
            ExportFormat::Jpeg => Box::new(JpegEncoder::default()),
            ExportFormat::Png => Box::new(PngEncoder),
            ExportFormat::WebP => Box::new(WebPEncoder),
        }
    }
}

/// The image crate panics on a mismatched buffer, so check up front
fn check_buffer(format: &str, data: &[u8], width: u32, height: u32) -> Result<(), ImageError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(ImageError::encode_failed(
            format,
            format!("expected {} bytes of RGBA data, got {}", expected, data.len()),
        ));
    }
    Ok(())
}

/// Convert RGBA to RGB by discarding alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let pixel_count = rgba.len() / 4;
    let mut rgb = Vec::with_capacity(pixel_count * 3);

    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }

    rgb
}
