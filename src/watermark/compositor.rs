//! Alpha compositing for watermark sprites and overlays.
//!
//! Two operations build on one Porter-Duff "over" blend:
//!
//! - [`blend_layer`] draws a positioned sprite onto a canvas, clipping
//!   whatever falls outside it.
//! - [`alpha_composite`] lays a full-size overlay over a background.
//!
//! # Example
//!
//! ```ignore
//! use watermark_studio::watermark::compositor::{blend_layer, WatermarkLayer};
//! use watermark_studio::watermark::PlacementPosition;
//!
//! let layer = WatermarkLayer::new(sprite, PlacementPosition::new(10, 10));
//! blend_layer(&mut overlay, &layer);
//! ```

use super::position::{round_half_up, PlacementPosition};
use image::{Rgba, RgbaImage};

/// A sprite positioned on a canvas.
#[derive(Clone)]
pub struct WatermarkLayer {
    /// The watermark image (RGBA).
    pub image: RgbaImage,
    /// Top-left corner on the target. May be negative.
    pub position: PlacementPosition,
}

impl WatermarkLayer {
    pub fn new(image: RgbaImage, position: PlacementPosition) -> Self {
        Self { image, position }
    }
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .finish()
    }
}

/// Blend a single watermark layer onto the target image.
pub fn blend_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    blend_image(target, &layer.image, layer.position);
}

/// Draw `image` onto `target` with its top-left at `position`.
pub fn blend_image(
    target: &mut RgbaImage,
    image: &RgbaImage,
    position: PlacementPosition,
) {
    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    let pos_x = position.x as i64;
    let pos_y = position.y as i64;

    // Calculate the visible region (clamp to target bounds)
    let x_start = pos_x.max(0);
    let y_start = pos_y.max(0);
    let x_end = (pos_x + image.width() as i64).min(target_width);
    let y_end = (pos_y + image.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wx = (tx - pos_x) as u32;
            let wy = (ty - pos_y) as u32;

            let wm_pixel = image.get_pixel(wx, wy);
            if wm_pixel[3] == 0 {
                continue;
            }

            let target_pixel = target.get_pixel(tx as u32, ty as u32);
            let blended = blend_pixels(*target_pixel, *wm_pixel);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Composite `overlay` over `base`. Both must share dimensions; the overlay
/// is clipped to the base otherwise.
pub fn alpha_composite(base: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    let mut result = base.clone();
    blend_image(&mut result, overlay, PlacementPosition::new(0, 0));
    result
}

/// Blend two pixels using alpha compositing.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        to_channel(result)
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        to_channel(out_alpha),
    ])
}

fn to_channel(v: f32) -> u8 {
    round_half_up(v as f64 * 255.0).clamp(0, 255) as u8
}
