//! Watermark error types.
//!
//! Defines errors that can occur while loading watermark resources.
//! Rendering itself never fails on degenerate input: empty text, zero-size
//! measurements and a missing image asset all produce a defined sprite.

use std::fmt;

/// Errors that can occur during watermark processing.
#[derive(Debug, Clone)]
pub enum WatermarkError {
    /// A font file could not be read or parsed
    FontLoad(String),

    /// Failed to decode a watermark image asset
    Decode(String),

    /// Resampling or rasterization failed
    Render(String),

    /// Invalid settings value
    Config(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontLoad(msg) => write!(f, "Failed to load font: {}", msg),
            Self::Decode(msg) => write!(f, "Failed to decode watermark image: {}", msg),
            Self::Render(msg) => write!(f, "Failed to render watermark: {}", msg),
            Self::Config(msg) => write!(f, "Watermark configuration error: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
