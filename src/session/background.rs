//! Background image store.
//!
//! Keeps the full-resolution original next to a downscaled preview copy.
//! The preview is always derived from the original, never the reverse, and
//! is recomputed when the display surface changes size.

use crate::watermark::position::{round_half_up, ImageDimensions, PixelPoint};
use crate::watermark::resample::resize_rgba;
use crate::watermark::WatermarkError;
use image::RgbaImage;

/// Where the preview copy sits inside the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DisplayRect {
    pub fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.x as f64, self.y as f64)
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    /// `(x, y, width, height)`
    pub fn as_tuple(&self) -> (i32, i32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x as f64
            && point.y >= self.y as f64
            && point.x < self.x as f64 + self.width as f64
            && point.y < self.y as f64 + self.height as f64
    }
}

/// Size that fits `width`×`height` inside the bounds, keeping aspect
/// ratio. Never upscales.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }

    let max_width = max_width.max(1);
    let max_height = max_height.max(1);

    // Width is the limiting axis when w/h >= max_w/max_h
    if width as u64 * max_height as u64 >= height as u64 * max_width as u64 {
        let h = round_half_up(height as f64 * max_width as f64 / width as f64);
        (max_width, h.clamp(1, max_height as i64) as u32)
    } else {
        let w = round_half_up(width as f64 * max_height as f64 / height as f64);
        (w.clamp(1, max_width as i64) as u32, max_height)
    }
}

/// A loaded background: full-resolution original plus preview copy.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    original: RgbaImage,
    preview: RgbaImage,
}

impl BackgroundImage {
    /// Take ownership of `original` and derive a preview for `surface`.
    pub fn new(original: RgbaImage, surface: ImageDimensions) -> Result<Self, WatermarkError> {
        let preview = derive_preview(&original, surface)?;
        Ok(Self { original, preview })
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    pub fn preview(&self) -> &RgbaImage {
        &self.preview
    }

    pub fn original_dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.original.width(), self.original.height())
    }

    pub fn preview_dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.preview.width(), self.preview.height())
    }

    /// Rebuild the preview for a new surface size.
    pub fn refresh_preview(&mut self, surface: ImageDimensions) -> Result<(), WatermarkError> {
        self.preview = derive_preview(&self.original, surface)?;
        Ok(())
    }

    /// Centered placement of the preview within `surface`.
    pub fn display_rect(&self, surface: ImageDimensions) -> DisplayRect {
        let (w, h) = self.preview.dimensions();
        DisplayRect {
            x: (surface.width as i64 - w as i64).div_euclid(2) as i32,
            y: (surface.height as i64 - h as i64).div_euclid(2) as i32,
            width: w,
            height: h,
        }
    }
}

fn derive_preview(
    original: &RgbaImage,
    surface: ImageDimensions,
) -> Result<RgbaImage, WatermarkError> {
    let (w, h) = fit_within(
        original.width(),
        original.height(),
        surface.width,
        surface.height,
    );
    resize_rgba(original, w, h)
}
