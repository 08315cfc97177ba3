//! Watermark processor: renderer dispatch and overlay construction.
//!
//! The processor is the single entry point used by both the preview and the
//! export path. Only the background size differs between them, so the two
//! always go through the same rendering code.
//!
//! # Example
//!
//! ```ignore
//! use watermark_studio::watermark::{ImageDimensions, WatermarkProcessor, WatermarkSettings};
//!
//! let processor = WatermarkProcessor::new();
//! let settings = WatermarkSettings::default();
//! let overlay = processor.create_overlay(ImageDimensions::new(1000, 800), &settings)?;
//! let finished = processor.export_composite(&original, &settings)?;
//! ```

use super::compositor::{alpha_composite, blend_layer, WatermarkLayer};
use super::image_renderer::ImageRenderer;
use super::position::{
    is_visible, placement_center, top_left_from_center, ImageDimensions, WatermarkDimensions,
};
use super::settings::{WatermarkKind, WatermarkSettings};
use super::text_renderer::TextRenderer;
use super::WatermarkError;
use image::RgbaImage;

/// Dispatches rendering by watermark kind and places the result.
#[derive(Debug, Default)]
pub struct WatermarkProcessor {
    text_renderer: TextRenderer,
    image_renderer: ImageRenderer,
}

impl WatermarkProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the watermark sprite for a background of `background` size.
    pub fn create_watermark(
        &self,
        background: ImageDimensions,
        settings: &WatermarkSettings,
    ) -> Result<RgbaImage, WatermarkError> {
        match settings.kind {
            WatermarkKind::Text => self.text_renderer.render(background, settings),
            WatermarkKind::Image => self.image_renderer.render(background, settings),
        }
    }

    /// Render the sprite and compute where its top-left lands.
    pub fn create_layer(
        &self,
        background: ImageDimensions,
        settings: &WatermarkSettings,
    ) -> Result<WatermarkLayer, WatermarkError> {
        let sprite = self.create_watermark(background, settings)?;
        let center = placement_center(settings.anchor_ratio, &background);
        let position = top_left_from_center(
            center,
            &WatermarkDimensions {
                width: sprite.width(),
                height: sprite.height(),
            },
        );

        Ok(WatermarkLayer::new(sprite, position))
    }

    /// Transparent canvas of `background` size with the sprite placed at the
    /// anchor. Parts of the sprite outside the canvas are clipped.
    pub fn create_overlay(
        &self,
        background: ImageDimensions,
        settings: &WatermarkSettings,
    ) -> Result<RgbaImage, WatermarkError> {
        let layer = self.create_layer(background, settings)?;
        let mut overlay = RgbaImage::new(background.width, background.height);

        let sprite_size = WatermarkDimensions {
            width: layer.image.width(),
            height: layer.image.height(),
        };
        if is_visible(&layer.position, &background, &sprite_size) {
            blend_layer(&mut overlay, &layer);
        }

        tracing::debug!(
            kind = settings.kind.as_str(),
            width = background.width,
            height = background.height,
            x = layer.position.x,
            y = layer.position.y,
            "Built watermark overlay"
        );

        Ok(overlay)
    }

    /// Composite the full-resolution overlay over `original`.
    pub fn export_composite(
        &self,
        original: &RgbaImage,
        settings: &WatermarkSettings,
    ) -> Result<RgbaImage, WatermarkError> {
        let size = ImageDimensions::new(original.width(), original.height());
        let overlay = self.create_overlay(size, settings)?;
        Ok(alpha_composite(original, &overlay))
    }

    /// Replace the image asset used by image watermarks.
    ///
    /// An empty asset is rejected and the previous one stays in use.
    pub fn set_watermark_image_asset(&mut self, asset: RgbaImage) -> Result<(), WatermarkError> {
        let (width, height) = asset.dimensions();
        self.image_renderer.set_asset(asset)?;
        tracing::debug!(width, height, "Watermark image asset replaced");
        Ok(())
    }

    pub fn clear_watermark_image_asset(&mut self) {
        self.image_renderer.clear_asset();
    }

    pub fn watermark_image_asset(&self) -> Option<&RgbaImage> {
        self.image_renderer.asset()
    }

    /// Forget cached fonts so the next render reloads from disk.
    pub fn reload_fonts(&self) {
        self.text_renderer.clear_font_cache();
    }
}
