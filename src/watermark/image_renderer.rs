//! Image watermark rendering.
//!
//! Scales a user-supplied RGBA asset to the target width, rotates it and
//! finally scales its alpha by the configured opacity. With no asset loaded
//! the sprite is a single transparent pixel.

use super::position::ImageDimensions;
use super::resample::{attenuate_alpha, resize_rgba, rotate_expand, scale_dimension, target_width};
use super::settings::WatermarkSettings;
use super::WatermarkError;
use image::RgbaImage;

/// Holds the current watermark image asset.
#[derive(Debug, Default, Clone)]
pub struct ImageRenderer {
    asset: Option<RgbaImage>,
}

impl ImageRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the asset wholesale.
    ///
    /// A zero-sized image is rejected and the current asset stays loaded.
    pub fn set_asset(&mut self, asset: RgbaImage) -> Result<(), WatermarkError> {
        if asset.width() == 0 || asset.height() == 0 {
            tracing::warn!(
                width = asset.width(),
                height = asset.height(),
                "Rejecting empty watermark image asset"
            );
            return Err(WatermarkError::Decode(format!(
                "image has no pixels ({}x{})",
                asset.width(),
                asset.height()
            )));
        }
        self.asset = Some(asset);
        Ok(())
    }

    pub fn clear_asset(&mut self) {
        self.asset = None;
    }

    pub fn asset(&self) -> Option<&RgbaImage> {
        self.asset.as_ref()
    }

    pub fn has_asset(&self) -> bool {
        self.asset.is_some()
    }

    /// Render the asset sprite for a background of the given size.
    pub fn render(
        &self,
        background: ImageDimensions,
        settings: &WatermarkSettings,
    ) -> Result<RgbaImage, WatermarkError> {
        let Some(asset) = self.asset.as_ref() else {
            tracing::debug!("No watermark image loaded, using empty sprite");
            return Ok(RgbaImage::new(1, 1));
        };

        let target_w = target_width(background.width, settings.size_percent);
        let scale = target_w as f64 / asset.width() as f64;
        let target_h = scale_dimension(asset.height(), scale);

        let sprite = resize_rgba(asset, target_w, target_h)?;
        let mut sprite = rotate_expand(&sprite, settings.effective_rotation())?;

        if settings.opacity_percent < 100 {
            attenuate_alpha(&mut sprite, settings.opacity_factor());
        }

        tracing::debug!(
            background_width = background.width,
            target_width = target_w,
            sprite_width = sprite.width(),
            sprite_height = sprite.height(),
            "Rendered image watermark"
        );

        Ok(sprite)
    }
}
