//! Watermark rendering and compositing engine.
//!
//! Given a background size and a [`WatermarkSettings`] value, the engine
//! produces a scaled, rotated, anchored and alpha-blended overlay. Preview
//! and export run the same code; only the background size differs.
//!
//! # Features
//!
//! - **Text watermarks** rasterized with a resolved font (user file, system
//!   default or the embedded fallback)
//! - **Image watermarks** from a user-supplied RGBA asset
//! - **Anchor placement** by fractional ratio, with nine named presets
//! - **Opacity** applied to text color alpha or the asset alpha channel
//!
//! # Pipeline
//!
//! ```text
//! settings ─► WatermarkProcessor::create_watermark ─► sprite
//!          └► position::placement_center ─► top-left ─► overlay ─► composite
//! ```
//!
//! # Settings Example
//!
//! ```yaml
//! kind: text
//! text: "© Studio"
//! text_color: "#FFFFFFC8"
//! font_size: 48
//! size_percent: 25
//! rotation_degrees: 30
//! anchor_ratio: [0.92, 0.92]
//! opacity_percent: 60
//! ```

pub mod compositor;
pub mod error;
pub mod font;
pub mod image_renderer;
pub mod position;
pub mod processor;
pub mod resample;
pub mod settings;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::{alpha_composite, blend_layer, blend_pixels, WatermarkLayer};
pub use error::WatermarkError;
pub use font::{resolve_font, FontSource, ResolvedFont};
pub use image_renderer::ImageRenderer;
pub use position::{
    placement_center, ratio_from_pixel, round_half_up, top_left_from_center, AnchorRatio,
    ImageDimensions, PixelPoint, PlacementPosition, WatermarkDimensions,
};
pub use processor::WatermarkProcessor;
pub use settings::{
    parse_hex_color, PositionPreset, TextColor, WatermarkKind, WatermarkSettings,
};
pub use text_renderer::{TextRenderer, TEXT_PADDING};
