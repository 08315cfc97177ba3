//! Text watermark rendering.
//!
//! Rasterizes the configured text into a standalone RGBA sprite:
//!
//! 1. Resolve a font (user path, system default, embedded fallback)
//! 2. Measure the ink bounds of the laid-out text
//! 3. Draw onto a transparent canvas with [`TEXT_PADDING`] on every side
//! 4. Scale so the text ink spans the target width
//! 5. Rotate with canvas expansion
//! 6. Scale alpha by the opacity
//!
//! Opacity is the last step and is applied per pixel, so raising it never
//! lowers any pixel's alpha.
//!
//! Text that produces no ink (empty string, whitespace only) yields a 1×1
//! fully transparent sprite.
//!
//! # Example
//!
//! ```ignore
//! use watermark_studio::watermark::{ImageDimensions, TextRenderer, WatermarkSettings};
//!
//! let renderer = TextRenderer::new();
//! let sprite = renderer.render(ImageDimensions::new(1000, 800), &WatermarkSettings::default())?;
//! ```

use super::font::FontCache;
use super::position::{round_half_up, ImageDimensions};
use super::resample::{attenuate_alpha, resize_rgba, rotate_expand, scale_dimension, target_width};
use super::settings::{TextColor, WatermarkSettings};
use super::WatermarkError;
use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

/// Transparent margin around the text so rotation never clips glyphs.
pub const TEXT_PADDING: u32 = 20;

/// Pixel bounds of the ink produced by a line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    /// Left edge of the ink relative to the pen origin
    pub min_x: f32,
    /// Top edge of the ink relative to the line top
    pub min_y: f32,
    pub width: u32,
    pub height: u32,
}

/// Renders text watermarks, caching the resolved font between calls.
#[derive(Debug, Default)]
pub struct TextRenderer {
    fonts: FontCache,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the text sprite for a background of the given size.
    pub fn render(
        &self,
        background: ImageDimensions,
        settings: &WatermarkSettings,
    ) -> Result<RgbaImage, WatermarkError> {
        let resolved = self.fonts.get(settings.font_path.as_deref());
        let font_size = settings.font_size.max(1) as f32;

        let canvas = match rasterize_text(
            &resolved.font,
            &settings.text,
            font_size,
            settings.text_color,
        ) {
            Some(canvas) => canvas,
            None => {
                tracing::debug!(text = %settings.text, "Text has no ink, using empty sprite");
                return Ok(RgbaImage::new(1, 1));
            }
        };

        let text_width = canvas.width() - 2 * TEXT_PADDING;
        let target = target_width(background.width, settings.size_percent);
        let scale = target as f64 / text_width as f64;

        let scaled_w = scale_dimension(canvas.width(), scale);
        let scaled_h = scale_dimension(canvas.height(), scale);
        let scaled = resize_rgba(&canvas, scaled_w, scaled_h)?;

        let mut sprite = rotate_expand(&scaled, settings.effective_rotation())?;

        if settings.opacity_percent < 100 {
            attenuate_alpha(&mut sprite, settings.opacity_factor());
        }

        tracing::debug!(
            background_width = background.width,
            target_width = target,
            sprite_width = sprite.width(),
            sprite_height = sprite.height(),
            rotation = settings.effective_rotation(),
            "Rendered text watermark"
        );

        Ok(sprite)
    }

    /// Drop the cached font, e.g. after the font file changed on disk.
    pub fn clear_font_cache(&self) {
        self.fonts.clear();
    }
}

/// Em-based scale so `font_size` matches the usual point-size convention.
fn em_scale(font: &FontArc, font_size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => {
            PxScale::from(font_size * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(font_size),
    }
}

/// Lay out `text` on one line and call `f` with every positioned glyph.
fn layout_glyphs(font: &FontArc, text: &str, scale: PxScale, mut f: impl FnMut(ab_glyph::Glyph)) {
    let scaled_font = font.as_scaled(scale);
    let baseline_y = scaled_font.ascent();

    let mut cursor_x = 0.0f32;
    let mut prev_glyph: Option<GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        f(glyph_id.with_scale_and_position(scale, point(cursor_x, baseline_y)));

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }
}

/// Measure the ink bounds of `text`. `None` when nothing would be drawn.
pub fn measure_text(font: &FontArc, text: &str, font_size: f32) -> Option<TextBounds> {
    let scale = em_scale(font, font_size);

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    layout_glyphs(font, text, scale, |glyph| {
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            min_x = min_x.min(bounds.min.x);
            min_y = min_y.min(bounds.min.y);
            max_x = max_x.max(bounds.max.x);
            max_y = max_y.max(bounds.max.y);
        }
    });

    if !min_x.is_finite() {
        return None;
    }

    let width = (max_x.ceil() - min_x.floor()) as u32;
    let height = (max_y.ceil() - min_y.floor()) as u32;
    if width == 0 || height == 0 {
        return None;
    }

    Some(TextBounds {
        min_x: min_x.floor(),
        min_y: min_y.floor(),
        width,
        height,
    })
}

/// Draw `text` onto a padded transparent canvas.
///
/// The ink occupies exactly `[TEXT_PADDING, TEXT_PADDING + width)` on the
/// x axis. Fully covered pixels carry `color.a`; overlapping glyph coverage
/// accumulates as `1 - (1-a)(1-b)`.
pub fn rasterize_text(
    font: &FontArc,
    text: &str,
    font_size: f32,
    color: TextColor,
) -> Option<RgbaImage> {
    let bounds = measure_text(font, text, font_size)?;
    let scale = em_scale(font, font_size);

    let canvas_width = bounds.width.saturating_add(2 * TEXT_PADDING);
    let canvas_height = bounds.height.saturating_add(2 * TEXT_PADDING);
    let offset_x = TEXT_PADDING as f32 - bounds.min_x;
    let offset_y = TEXT_PADDING as f32 - bounds.min_y;

    let row = canvas_width as usize;
    let mut coverage_map = vec![0.0f32; coverage_len(canvas_width, canvas_height)];

    layout_glyphs(font, text, scale, |glyph| {
        let Some(outlined) = font.outline_glyph(glyph) else {
            return;
        };
        let glyph_bounds = outlined.px_bounds();
        let origin_x = (glyph_bounds.min.x + offset_x) as i32;
        let origin_y = (glyph_bounds.min.y + offset_y) as i32;

        outlined.draw(|px, py, coverage| {
            let x = origin_x + px as i32;
            let y = origin_y + py as i32;

            if x >= 0 && y >= 0 && x < canvas_width as i32 && y < canvas_height as i32 {
                let idx = y as usize * row + x as usize;
                let existing = coverage_map[idx];
                let coverage = coverage.clamp(0.0, 1.0);
                coverage_map[idx] = 1.0 - (1.0 - existing) * (1.0 - coverage);
            }
        });
    });

    let mut canvas = RgbaImage::new(canvas_width, canvas_height);
    for (i, coverage) in coverage_map.iter().enumerate() {
        if *coverage <= 0.0 {
            continue;
        }
        let x = (i % row) as u32;
        let y = (i / row) as u32;
        let pixel_alpha = round_half_up(*coverage as f64 * color.a as f64).clamp(0, 255) as u8;
        canvas.put_pixel(x, y, Rgba([color.r, color.g, color.b, pixel_alpha]));
    }

    Some(canvas)
}

/// Number of cells in a `width × height` coverage buffer.
fn coverage_len(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
