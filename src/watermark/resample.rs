//! Resampling primitives shared by both watermark renderers.
//!
//! Scaling uses `fast_image_resize` with a Lanczos3 convolution. Rotation
//! centers the sprite on a canvas large enough for the rotated bounds and
//! turns it with `imageproc`'s bicubic sampler. Both operate on
//! premultiplied alpha so transparent pixels never bleed their color into
//! visible edges.
//!
//! Positive angles rotate counter-clockwise on screen. Multiples of 90
//! degrees are exact transposes.

use super::position::round_half_up;
use super::WatermarkError;
use fast_image_resize::{FilterType, Image, MulDiv, PixelType, ResizeAlg, Resizer};
use image::{imageops, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use std::num::NonZeroU32;

/// Watermark width for a background width and size percentage.
///
/// `max(1, round(bg_width * size_percent / 100))`, with `size_percent`
/// held to 1..=100.
pub fn target_width(background_width: u32, size_percent: u32) -> u32 {
    let percent = size_percent.clamp(1, 100);
    let w = round_half_up(background_width as f64 * percent as f64 / 100.0);
    w.clamp(1, u32::MAX as i64) as u32
}

/// Scale a dimension by `factor`, never below 1px.
pub fn scale_dimension(value: u32, factor: f64) -> u32 {
    round_half_up(value as f64 * factor).clamp(1, u32::MAX as i64) as u32
}

/// Resize an RGBA image with Lanczos3, premultiplying alpha around the pass.
pub fn resize_rgba(
    img: &RgbaImage,
    target_w: u32,
    target_h: u32,
) -> Result<RgbaImage, WatermarkError> {
    if img.dimensions() == (target_w, target_h) {
        return Ok(img.clone());
    }

    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| WatermarkError::Render("Source width is 0".to_string()))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| WatermarkError::Render("Source height is 0".to_string()))?;
    let dst_width = NonZeroU32::new(target_w)
        .ok_or_else(|| WatermarkError::Render("Target width is 0".to_string()))?;
    let dst_height = NonZeroU32::new(target_h)
        .ok_or_else(|| WatermarkError::Render("Target height is 0".to_string()))?;

    let mut src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| WatermarkError::Render(format!("Failed to create source image: {:?}", e)))?;

    let alpha_mul_div = MulDiv::default();
    alpha_mul_div
        .multiply_alpha_inplace(&mut src_image.view_mut())
        .map_err(|e| WatermarkError::Render(format!("Failed to premultiply alpha: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));
    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| WatermarkError::Render(format!("Resize operation failed: {:?}", e)))?;

    alpha_mul_div
        .divide_alpha_inplace(&mut dst_image.view_mut())
        .map_err(|e| WatermarkError::Render(format!("Failed to unpremultiply alpha: {:?}", e)))?;

    RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| WatermarkError::Render("Failed to create output image buffer".to_string()))
}

/// Multiply every alpha value by `factor` (clamped to [0, 1]).
///
/// Only ever attenuates: a transparent pixel stays transparent.
pub fn attenuate_alpha(img: &mut RgbaImage, factor: f32) {
    let factor = factor.clamp(0.0, 1.0) as f64;
    for pixel in img.pixels_mut() {
        pixel[3] = round_half_up(pixel[3] as f64 * factor).clamp(0, 255) as u8;
    }
}

/// Rotate counter-clockwise by `degrees`, expanding to fit the result.
///
/// Newly exposed area is fully transparent. 0 (mod 360) returns an
/// identical copy.
pub fn rotate_expand(img: &RgbaImage, degrees: i32) -> Result<RgbaImage, WatermarkError> {
    let rotated = match degrees.rem_euclid(360) {
        0 => img.clone(),
        90 => imageops::rotate270(img),
        180 => imageops::rotate180(img),
        270 => imageops::rotate90(img),
        d => rotate_on_expanded_canvas(img, d as f64)?,
    };
    Ok(rotated)
}

/// Output size of an expanding rotation.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let radians = degrees.to_radians();
    let cos = radians.cos().abs();
    let sin = radians.sin().abs();
    let w = width as f64;
    let h = height as f64;

    // Trim float noise so exact sizes don't round up a whole pixel.
    let fit = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    (fit(w * cos + h * sin), fit(w * sin + h * cos))
}

// Transparent margin around the working canvas so the bicubic sampler
// still has neighbours at the sprite's outer pixels.
const ROTATION_MARGIN: u32 = 2;

fn rotate_on_expanded_canvas(img: &RgbaImage, degrees: f64) -> Result<RgbaImage, WatermarkError> {
    let (width, height) = img.dimensions();
    let (out_w, out_h) = rotated_bounds(width, height, degrees);

    // The working canvas holds both the upright sprite and the rotated result
    let canvas_w = out_w.max(width) + 2 * ROTATION_MARGIN;
    let canvas_h = out_h.max(height) + 2 * ROTATION_MARGIN;

    let sprite = apply_alpha_pass(img.clone(), AlphaPass::Premultiply)?;
    let mut canvas = RgbaImage::new(canvas_w, canvas_h);
    imageops::replace(
        &mut canvas,
        &sprite,
        ((canvas_w - width) / 2) as i64,
        ((canvas_h - height) / 2) as i64,
    );

    // imageproc turns clockwise for positive angles in y-down space
    let rotated = rotate_about_center(
        &canvas,
        -(degrees as f32).to_radians(),
        Interpolation::Bicubic,
        Rgba([0, 0, 0, 0]),
    );
    let rotated = apply_alpha_pass(rotated, AlphaPass::Unpremultiply)?;

    Ok(imageops::crop_imm(
        &rotated,
        (canvas_w - out_w) / 2,
        (canvas_h - out_h) / 2,
        out_w,
        out_h,
    )
    .to_image())
}

#[derive(Debug, Clone, Copy)]
enum AlphaPass {
    Premultiply,
    Unpremultiply,
}

fn apply_alpha_pass(img: RgbaImage, pass: AlphaPass) -> Result<RgbaImage, WatermarkError> {
    let (w, h) = img.dimensions();
    let width =
        NonZeroU32::new(w).ok_or_else(|| WatermarkError::Render("Image width is 0".to_string()))?;
    let height =
        NonZeroU32::new(h).ok_or_else(|| WatermarkError::Render("Image height is 0".to_string()))?;

    let mut buffer = Image::from_vec_u8(width, height, img.into_raw(), PixelType::U8x4)
        .map_err(|e| WatermarkError::Render(format!("Failed to wrap image buffer: {:?}", e)))?;

    let alpha_mul_div = MulDiv::default();
    match pass {
        AlphaPass::Premultiply => alpha_mul_div
            .multiply_alpha_inplace(&mut buffer.view_mut())
            .map_err(|e| WatermarkError::Render(format!("Failed to premultiply alpha: {:?}", e)))?,
        AlphaPass::Unpremultiply => alpha_mul_div
            .divide_alpha_inplace(&mut buffer.view_mut())
            .map_err(|e| {
                WatermarkError::Render(format!("Failed to unpremultiply alpha: {:?}", e))
            })?,
    }

    RgbaImage::from_raw(w, h, buffer.into_vec())
        .ok_or_else(|| WatermarkError::Render("Failed to create output image buffer".to_string()))
}
