//! Editing session: the state a front end drives through event handlers.
//!
//! A session owns the current [`WatermarkSettings`], the loaded background
//! (original plus preview copy), the watermark image asset and the state of
//! an in-progress drag. Each handler either applies its change completely
//! or returns a [`SessionError`] and leaves the session untouched.
//!
//! Preview and export share one code path in [`WatermarkProcessor`]; the
//! preview simply renders against the smaller preview copy.
//!
//! # Example
//!
//! ```ignore
//! use watermark_studio::session::WatermarkSession;
//! use watermark_studio::watermark::PositionPreset;
//!
//! let mut session = WatermarkSession::default();
//! session.load_background("photo.jpg".as_ref())?;
//! session.apply_preset(PositionPreset::BottomRight);
//! let frame = session.render_preview()?;
//! session.export("photo-marked.png".as_ref())?;
//! ```

pub mod background;
pub mod drag;
pub mod error;

pub use background::{fit_within, BackgroundImage, DisplayRect};
pub use drag::DragState;
pub use error::SessionError;

use crate::config::{SettingsFile, DEFAULT_PREVIEW_HEIGHT, DEFAULT_PREVIEW_WIDTH};
use crate::image_io::{self, ExportFormat};
use crate::watermark::compositor::blend_image;
use crate::watermark::font::load_font_file;
use crate::watermark::position::{
    placement_center, ratio_from_pixel, AnchorRatio, ImageDimensions, PixelPoint,
    PlacementPosition,
};
use crate::watermark::{PositionPreset, WatermarkProcessor, WatermarkSettings};
use image::RgbaImage;
use std::path::Path;

/// One rendered preview: the display surface with the composited preview
/// copy centered in it.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    /// Surface-sized image; transparent outside the preview copy
    pub image: RgbaImage,
    /// Where the preview copy sits on the surface
    pub display_rect: DisplayRect,
    /// Unclipped bounds of the watermark sprite on the surface
    pub watermark_rect: DisplayRect,
}

pub struct WatermarkSession {
    settings: WatermarkSettings,
    preset: PositionPreset,
    processor: WatermarkProcessor,
    background: Option<BackgroundImage>,
    surface: ImageDimensions,
    drag: Option<DragState>,
}

impl Default for WatermarkSession {
    fn default() -> Self {
        Self::new(ImageDimensions::new(
            DEFAULT_PREVIEW_WIDTH,
            DEFAULT_PREVIEW_HEIGHT,
        ))
    }
}

impl std::fmt::Debug for WatermarkSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkSession")
            .field("settings", &self.settings)
            .field("preset", &self.preset)
            .field(
                "background",
                &self.background.as_ref().map(|b| b.original_dimensions()),
            )
            .field("surface", &self.surface)
            .field("dragging", &self.drag.is_some())
            .finish()
    }
}

impl WatermarkSession {
    /// Empty session with default settings for a surface of `surface` size.
    pub fn new(surface: ImageDimensions) -> Self {
        Self::with_settings(WatermarkSettings::default(), surface)
    }

    pub fn with_settings(settings: WatermarkSettings, surface: ImageDimensions) -> Self {
        Self {
            settings: settings.normalized(),
            preset: PositionPreset::Center,
            processor: WatermarkProcessor::new(),
            background: None,
            surface,
            drag: None,
        }
    }

    /// Build a session from a settings file, loading its watermark image
    /// if one is named.
    pub fn from_settings_file(file: &SettingsFile) -> Result<Self, SessionError> {
        let surface = ImageDimensions::new(file.preview.width, file.preview.height);
        let mut session = Self::with_settings(file.watermark.clone(), surface);
        session.preset = file
            .preset
            .unwrap_or_else(|| preset_for(session.settings.anchor_ratio));

        if let Some(path) = &file.watermark_image {
            session.load_watermark_image(path)?;
        }

        Ok(session)
    }

    pub fn settings(&self) -> &WatermarkSettings {
        &self.settings
    }

    pub fn preset(&self) -> PositionPreset {
        self.preset
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn surface(&self) -> ImageDimensions {
        self.surface
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn processor(&self) -> &WatermarkProcessor {
        &self.processor
    }

    /// Open a background image from disk.
    ///
    /// On success the anchor returns to the center. On failure the previous
    /// background stays loaded.
    pub fn load_background(&mut self, path: &Path) -> Result<(), SessionError> {
        let original = image_io::load_rgba(path)?;
        self.set_background(original)
    }

    /// Install an already decoded background.
    pub fn set_background(&mut self, original: RgbaImage) -> Result<(), SessionError> {
        let background = BackgroundImage::new(original, self.surface)?;

        tracing::info!(
            width = background.original_dimensions().width,
            height = background.original_dimensions().height,
            preview_width = background.preview_dimensions().width,
            preview_height = background.preview_dimensions().height,
            "Background loaded"
        );

        self.background = Some(background);
        self.settings.anchor_ratio = AnchorRatio::center();
        self.preset = PositionPreset::Center;
        self.drag = None;
        Ok(())
    }

    /// Load the asset used by image watermarks. The previous asset is kept
    /// if decoding fails.
    pub fn load_watermark_image(&mut self, path: &Path) -> Result<(), SessionError> {
        let asset = image_io::load_rgba(path)?;
        self.set_watermark_image(asset)
    }

    /// Install an already decoded watermark image. An empty image is
    /// rejected and the previous asset stays in use.
    pub fn set_watermark_image(&mut self, asset: RgbaImage) -> Result<(), SessionError> {
        self.processor.set_watermark_image_asset(asset)?;
        Ok(())
    }

    /// Switch the text font. The file is parsed up front so an unusable
    /// font leaves the current one in place.
    pub fn set_font(&mut self, path: &Path) -> Result<(), SessionError> {
        load_font_file(path)?;
        self.settings.font_path = Some(path.to_path_buf());
        self.processor.reload_fonts();
        tracing::info!(path = %path.display(), "Font selected");
        Ok(())
    }

    /// Change the text color, keeping its alpha.
    pub fn set_text_color_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.settings.text_color = self.settings.text_color.with_rgb(r, g, b);
    }

    /// Replace all settings. Out-of-range values are clamped.
    pub fn update_settings(&mut self, settings: WatermarkSettings) {
        let settings = settings.normalized();
        if settings.anchor_ratio != self.settings.anchor_ratio {
            self.preset = preset_for(settings.anchor_ratio);
        }
        self.settings = settings;
    }

    /// Move the anchor to a named preset. `Custom` only relabels.
    pub fn apply_preset(&mut self, preset: PositionPreset) {
        if let Some(ratio) = preset.ratio() {
            self.settings.anchor_ratio = ratio;
        }
        self.preset = preset;
    }

    /// Set the anchor directly, as a drag does. Values are clamped.
    pub fn set_anchor(&mut self, x: f64, y: f64) -> AnchorRatio {
        self.settings.set_anchor(x, y);
        self.preset = PositionPreset::Custom;
        self.settings.anchor_ratio
    }

    /// Resize the display surface and rebuild the preview copy.
    pub fn set_surface_size(&mut self, surface: ImageDimensions) -> Result<(), SessionError> {
        if let Some(background) = self.background.as_mut() {
            background.refresh_preview(surface)?;
        }
        self.surface = surface;
        Ok(())
    }

    /// Placement of the preview copy on the surface; all zero when no
    /// background is loaded.
    pub fn display_rect(&self) -> DisplayRect {
        self.background
            .as_ref()
            .map(|b| b.display_rect(self.surface))
            .unwrap_or_default()
    }

    /// Bounds of the preview watermark sprite on the surface.
    pub fn watermark_rect(&self) -> Result<DisplayRect, SessionError> {
        let background = self.background.as_ref().ok_or(SessionError::NoBackground)?;
        let rect = self.display_rect();
        let layer = self
            .processor
            .create_layer(background.preview_dimensions(), &self.settings)?;

        Ok(DisplayRect {
            x: rect.x + layer.position.x,
            y: rect.y + layer.position.y,
            width: layer.image.width(),
            height: layer.image.height(),
        })
    }

    /// Start dragging if `pointer` is over the watermark.
    pub fn begin_drag(&mut self, pointer: PixelPoint) -> Result<bool, SessionError> {
        let sprite = self.watermark_rect()?;
        if !sprite.contains(pointer) {
            return Ok(false);
        }

        let rect = self.display_rect();
        let local = placement_center(self.settings.anchor_ratio, &rect.dimensions());
        let center = PixelPoint::new(local.x + rect.x as f64, local.y + rect.y as f64);

        self.drag = Some(DragState::begin(pointer, center));
        Ok(true)
    }

    /// Follow the pointer. The anchor is derived from the moved center,
    /// clamped to the preview copy, and the preset becomes `Custom`.
    pub fn drag_to(&mut self, pointer: PixelPoint) -> Option<AnchorRatio> {
        let rect = self.display_rect();
        let drag = self.drag.as_mut()?;
        let center = drag.update(pointer);

        let ratio = ratio_from_pixel(center, rect.origin(), &rect.dimensions());
        tracing::trace!(x = ratio.x(), y = ratio.y(), "Dragged watermark");
        Some(self.set_anchor(ratio.x(), ratio.y()))
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Composite at preview size. Identical to an export of the preview
    /// copy.
    pub fn preview_composite(&self) -> Result<RgbaImage, SessionError> {
        let background = self.background.as_ref().ok_or(SessionError::NoBackground)?;
        Ok(self
            .processor
            .export_composite(background.preview(), &self.settings)?)
    }

    /// Render the full display surface.
    pub fn render_preview(&self) -> Result<PreviewFrame, SessionError> {
        let composite = self.preview_composite()?;
        let display_rect = self.display_rect();
        let watermark_rect = self.watermark_rect()?;

        let mut image = RgbaImage::new(self.surface.width, self.surface.height);
        blend_image(
            &mut image,
            &composite,
            PlacementPosition::new(display_rect.x, display_rect.y),
        );

        Ok(PreviewFrame {
            image,
            display_rect,
            watermark_rect,
        })
    }

    /// Composite at full resolution without writing anything.
    pub fn render_export(&self) -> Result<RgbaImage, SessionError> {
        let background = self.background.as_ref().ok_or(SessionError::NoBackground)?;
        Ok(self
            .processor
            .export_composite(background.original(), &self.settings)?)
    }

    /// Composite at full resolution and write to `path`; the format follows
    /// the extension.
    pub fn export(&self, path: &Path) -> Result<ExportFormat, SessionError> {
        // Reject a bad target before spending time on the composite
        ExportFormat::from_path(path)?;
        let composite = self.render_export()?;
        Ok(image_io::save_image(&composite, path)?)
    }
}

/// Named preset whose anchor equals `ratio`, else `Custom`.
fn preset_for(ratio: AnchorRatio) -> PositionPreset {
    PositionPreset::NAMED
        .iter()
        .copied()
        .find(|p| p.ratio() == Some(ratio))
        .unwrap_or(PositionPreset::Custom)
}
