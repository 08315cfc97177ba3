//! Image file input and output.
//!
//! Loads backgrounds and watermark assets as RGBA, and writes composited
//! results in the format named by the output path's extension.
//!
//! # Export formats
//!
//! | Extension       | Format        | Alpha     |
//! |-----------------|---------------|-----------|
//! | `.png`          | PNG           | kept      |
//! | `.jpg`, `.jpeg` | JPEG, q=95    | discarded |
//! | `.webp`         | WebP lossless | kept      |

pub mod encoder;
pub mod error;
pub mod format;
pub mod loader;

pub use encoder::{EncoderFactory, ImageEncoder, JPEG_EXPORT_QUALITY};
pub use error::ImageError;
pub use format::ExportFormat;
pub use loader::{decode_rgba, load_rgba};

use image::RgbaImage;
use std::path::Path;

/// Encode `image` and write it to `path`.
///
/// The parent directory must already exist; it is never created.
pub fn save_image(image: &RgbaImage, path: &Path) -> Result<ExportFormat, ImageError> {
    let format = ExportFormat::from_path(path)?;

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.is_dir() {
            return Err(ImageError::output_dir_missing(dir));
        }
    }

    let encoder = EncoderFactory::create(format);
    let bytes = encoder.encode(image.as_raw(), image.width(), image.height())?;

    std::fs::write(path, &bytes).map_err(|e| ImageError::write_failed(path, e.to_string()))?;

    tracing::info!(
        path = %path.display(),
        format = format.as_str(),
        width = image.width(),
        height = image.height(),
        bytes = bytes.len(),
        "Exported image"
    );

    Ok(format)
}
