//! Shared fixtures for the integration tests.

use image::{Rgba, RgbaImage};
use watermark_studio::watermark::{
    AnchorRatio, TextColor, WatermarkKind, WatermarkSettings,
};

pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Opaque background with a different color in every pixel.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

pub fn text_settings(text: &str, size_percent: u32, opacity_percent: u32) -> WatermarkSettings {
    WatermarkSettings {
        kind: WatermarkKind::Text,
        text: text.to_string(),
        text_color: TextColor::white(),
        font_size: 48,
        size_percent,
        opacity_percent,
        anchor_ratio: AnchorRatio::center(),
        ..WatermarkSettings::default()
    }
}

pub fn image_settings(size_percent: u32, opacity_percent: u32) -> WatermarkSettings {
    WatermarkSettings {
        kind: WatermarkKind::Image,
        size_percent,
        opacity_percent,
        anchor_ratio: AnchorRatio::center(),
        ..WatermarkSettings::default()
    }
}

/// Inclusive `(min_x, min_y, max_x, max_y)` of pixels with alpha above
/// `threshold`.
pub fn alpha_bounds(img: &RgbaImage, threshold: u8) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in img.enumerate_pixels() {
        if p[3] > threshold {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}

/// Sum of the red channel, a rough measure of how much white ink landed.
pub fn red_sum(img: &RgbaImage) -> u64 {
    img.pixels().map(|p| p[0] as u64).sum()
}
