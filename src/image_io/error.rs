//! Image loading and export error types
//!
//! Every variant is recoverable: the caller reports it and keeps its
//! previous state.

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur while reading or writing image files
#[derive(Debug, Clone)]
pub enum ImageError {
    // === Loading Errors ===
    /// File could not be opened or read
    ReadFailed { path: PathBuf, message: String },
    /// Failed to decode image data
    DecodeFailed { message: String },

    // === Export Errors ===
    /// Output extension does not map to a supported format
    UnsupportedFormat { format: String },
    /// Output directory does not exist
    OutputDirMissing { dir: PathBuf },
    /// Encoding to output format failed
    EncodeFailed { format: String, message: String },
    /// Encoded bytes could not be written
    WriteFailed { path: PathBuf, message: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Loading errors
            ImageError::ReadFailed { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            ImageError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }

            // Export errors
            ImageError::UnsupportedFormat { format } => {
                write!(f, "Unsupported image format: {}", format)
            }
            ImageError::OutputDirMissing { dir } => {
                write!(f, "Output directory does not exist: {}", dir.display())
            }
            ImageError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
            ImageError::WriteFailed { path, message } => {
                write!(f, "Failed to write {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    /// Helper constructors for common error patterns
    pub fn read_failed(path: &Path, message: impl Into<String>) -> Self {
        ImageError::ReadFailed {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        ImageError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn output_dir_missing(dir: &Path) -> Self {
        ImageError::OutputDirMissing {
            dir: dir.to_path_buf(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn write_failed(path: &Path, message: impl Into<String>) -> Self {
        ImageError::WriteFailed {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
