//! Session error types.

use crate::image_io::ImageError;
use crate::watermark::WatermarkError;

/// Failure of a user action. The session state is unchanged when one is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Open a background image first")]
    NoBackground,

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Watermark(#[from] WatermarkError),
}
