//! Position calculation for watermark placement.
//!
//! Converts between a normalized anchor ratio and pixel coordinates:
//!
//! - **Anchor → center**: `placement_center` scales the ratio by the
//!   container size.
//! - **Pixel → anchor**: `ratio_from_pixel` is the inverse used by drag
//!   gestures, clamped to the container.
//! - **Center → top-left**: `top_left_from_center` offsets by half the
//!   sprite size.
//!
//! Every float-to-pixel conversion goes through [`round_half_up`].
//!
//! # Example
//!
//! ```ignore
//! use watermark_studio::watermark::position::*;
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let center = placement_center(AnchorRatio::new(0.5, 0.5), &image);
//! let top_left = top_left_from_center(center, &WatermarkDimensions { width: 100, height: 50 });
//! assert_eq!(top_left, PlacementPosition::new(350, 275));
//! ```

use serde::{Deserialize, Serialize};

/// Dimensions of the target image or container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Dimensions of the watermark sprite to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

/// Integer pixel position of a sprite's top-left corner.
///
/// May be negative when the sprite hangs off the top or left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A point in continuous pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fractional position of the watermark center inside the background.
///
/// (0, 0) is the top-left corner, (1, 1) the bottom-right. The fields are
/// private and every way of building one clamps to the unit square, so a
/// ratio is always in range whatever produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct AnchorRatio {
    x: f64,
    y: f64,
}

impl AnchorRatio {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn center() -> Self {
        Self { x: 0.5, y: 0.5 }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

impl Default for AnchorRatio {
    fn default() -> Self {
        Self::center()
    }
}

impl From<(f64, f64)> for AnchorRatio {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<AnchorRatio> for (f64, f64) {
    fn from(r: AnchorRatio) -> Self {
        (r.x, r.y)
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Round half up: 2.5 -> 3, -2.5 -> -2.
pub fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Pixel location of the watermark center for an anchor in a container.
pub fn placement_center(anchor: AnchorRatio, container: &ImageDimensions) -> PixelPoint {
    PixelPoint::new(
        anchor.x * container.width as f64,
        anchor.y * container.height as f64,
    )
}

/// Anchor ratio for a pixel point inside a container placed at `origin`.
///
/// The point is first made container-relative, then each axis is clamped
/// to `[0, dimension]` before dividing. A zero-sized axis maps to 0.
pub fn ratio_from_pixel(
    point: PixelPoint,
    origin: PixelPoint,
    container: &ImageDimensions,
) -> AnchorRatio {
    let axis = |p: f64, o: f64, dim: u32| -> f64 {
        if dim == 0 {
            return 0.0;
        }
        let dim = dim as f64;
        (p - o).clamp(0.0, dim) / dim
    };

    AnchorRatio::new(
        axis(point.x, origin.x, container.width),
        axis(point.y, origin.y, container.height),
    )
}

/// Top-left corner that centers a sprite on `center`.
pub fn top_left_from_center(
    center: PixelPoint,
    watermark: &WatermarkDimensions,
) -> PlacementPosition {
    let x = round_half_up(center.x - watermark.width as f64 / 2.0);
    let y = round_half_up(center.y - watermark.height as f64 / 2.0);
    PlacementPosition::new(saturate_i32(x), saturate_i32(y))
}

fn saturate_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Check if a position is at least partially visible within the image.
pub fn is_visible(
    pos: &PlacementPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
) -> bool {
    let wm_right = pos.x as i64 + watermark.width as i64;
    let wm_bottom = pos.y as i64 + watermark.height as i64;

    (pos.x as i64) < image.width as i64
        && (pos.y as i64) < image.height as i64
        && wm_right > 0
        && wm_bottom > 0
}
