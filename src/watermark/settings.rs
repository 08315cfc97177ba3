//! Watermark settings value types.
//!
//! This module defines the configuration record the interaction layer
//! mutates and the renderers read:
//! - Watermark kind (text or image)
//! - Text content, color and font selection
//! - Size, rotation, opacity and anchor
//! - Named position presets
//!
//! Settings deserialize from YAML with the same defaults a fresh session
//! starts with:
//!
//! ```yaml
//! kind: text
//! text: "Sample Watermark"
//! text_color: "#FFFFFFC8"
//! font_size: 36
//! size_percent: 20
//! rotation_degrees: 0
//! anchor_ratio: [0.5, 0.5]
//! opacity_percent: 50
//! ```

use super::position::AnchorRatio;
use super::WatermarkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// Default values
fn default_text() -> String {
    "Sample Watermark".to_string()
}

fn default_font_size() -> u32 {
    36
}

fn default_size_percent() -> u32 {
    20
}

fn default_opacity_percent() -> u32 {
    50
}

/// Which renderer produces the watermark sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    #[default]
    Text,
    Image,
}

impl WatermarkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl FromStr for WatermarkKind {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(WatermarkError::Config(format!(
                "unknown watermark kind '{}', expected 'text' or 'image'",
                other
            ))),
        }
    }
}

/// RGBA text color, each channel in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "ColorRepr")]
pub struct TextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TextColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// White color, fully opaque.
    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Black color, fully opaque.
    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Replace the RGB channels, keeping the configured alpha.
    pub fn with_rgb(self, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: self.a }
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::new(255, 255, 255, 200)
    }
}

/// Accepted on-disk spellings of a color.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Channels([u8; 4]),
    Rgb([u8; 3]),
}

impl TryFrom<ColorRepr> for TextColor {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) => parse_hex_color(&hex).map_err(|e| e.to_string()),
            ColorRepr::Channels([r, g, b, a]) => Ok(TextColor::new(r, g, b, a)),
            ColorRepr::Rgb([r, g, b]) => Ok(TextColor::new(r, g, b, 255)),
        }
    }
}

impl From<TextColor> for ColorRepr {
    fn from(c: TextColor) -> Self {
        ColorRepr::Channels([c.r, c.g, c.b, c.a])
    }
}

/// Parse a hex color string into RGBA components.
///
/// Supports #RGB, #RRGGBB and #RRGGBBAA. Colors without an alpha component
/// are fully opaque.
///
/// # Examples
///
/// ```ignore
/// let white = parse_hex_color("#FFF").unwrap();
/// assert_eq!(white, TextColor::new(255, 255, 255, 255));
///
/// let red = parse_hex_color("#FF000080").unwrap();
/// assert_eq!(red, TextColor::new(255, 0, 0, 128));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<TextColor, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::Config("Color must start with '#'".to_string()))?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WatermarkError::Config("Invalid hex digit".to_string()));
    }

    let channel = |range: std::ops::Range<usize>| -> Result<u8, WatermarkError> {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| WatermarkError::Config("Invalid hex digit".to_string()))
    };

    match hex.len() {
        3 => {
            // #RGB format - each digit doubled: 0xF -> 0xFF, 0xA -> 0xAA
            Ok(TextColor::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            ))
        }
        6 => Ok(TextColor::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            255,
        )),
        8 => Ok(TextColor::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(WatermarkError::Config(format!(
            "Color must be #RGB, #RRGGBB or #RRGGBBAA format, got {} characters",
            hex.len()
        ))),
    }
}

/// Named anchor positions offered next to free dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionPreset {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    /// Anchor was set by dragging rather than from a preset
    Custom,
}

impl PositionPreset {
    /// The nine presets that map to a fixed anchor.
    pub const NAMED: [PositionPreset; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::CenterLeft,
        Self::Center,
        Self::CenterRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Anchor ratio for a named preset, `None` for `Custom`.
    pub fn ratio(&self) -> Option<AnchorRatio> {
        const NEAR: f64 = 0.08;
        const MID: f64 = 0.5;
        const FAR: f64 = 0.92;

        let (x, y) = match self {
            Self::TopLeft => (NEAR, NEAR),
            Self::TopCenter => (MID, NEAR),
            Self::TopRight => (FAR, NEAR),
            Self::CenterLeft => (NEAR, MID),
            Self::Center => (MID, MID),
            Self::CenterRight => (FAR, MID),
            Self::BottomLeft => (NEAR, FAR),
            Self::BottomCenter => (MID, FAR),
            Self::BottomRight => (FAR, FAR),
            Self::Custom => return None,
        };
        Some(AnchorRatio::new(x, y))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::CenterLeft => "center-left",
            Self::Center => "center",
            Self::CenterRight => "center-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for PositionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionPreset {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::NAMED
            .iter()
            .chain(std::iter::once(&Self::Custom))
            .find(|p| p.as_str() == wanted)
            .copied()
            .ok_or_else(|| WatermarkError::Config(format!("unknown position preset '{}'", s)))
    }
}

/// Complete watermark configuration read by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSettings {
    /// Renderer selection (default: text)
    #[serde(default)]
    pub kind: WatermarkKind,

    /// Text content for text watermarks (default: "Sample Watermark")
    #[serde(default = "default_text")]
    pub text: String,

    /// Text color including alpha (default: white at alpha 200)
    #[serde(default)]
    pub text_color: TextColor,

    /// Font file; falls back to a system font, then the embedded font
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,

    /// Rasterization size in pixels (default: 36)
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Watermark width as a percentage of the background width (default: 20)
    #[serde(default = "default_size_percent")]
    pub size_percent: u32,

    /// Counter-clockwise rotation; any value, taken modulo 360
    #[serde(default)]
    pub rotation_degrees: i32,

    /// Fractional position of the watermark center (default: center)
    #[serde(default)]
    pub anchor_ratio: AnchorRatio,

    /// Overall opacity from 0 to 100 (default: 50)
    #[serde(default = "default_opacity_percent")]
    pub opacity_percent: u32,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            kind: WatermarkKind::default(),
            text: default_text(),
            text_color: TextColor::default(),
            font_path: None,
            font_size: default_font_size(),
            size_percent: default_size_percent(),
            rotation_degrees: 0,
            anchor_ratio: AnchorRatio::default(),
            opacity_percent: default_opacity_percent(),
        }
    }
}

impl WatermarkSettings {
    /// Rotation reduced to [0, 360).
    pub fn effective_rotation(&self) -> i32 {
        self.rotation_degrees.rem_euclid(360)
    }

    /// Opacity as a factor in [0.0, 1.0].
    pub fn opacity_factor(&self) -> f32 {
        self.opacity_percent.min(100) as f32 / 100.0
    }

    /// Store a new anchor, clamped to the unit square.
    pub fn set_anchor(&mut self, x: f64, y: f64) {
        self.anchor_ratio = AnchorRatio::new(x, y);
    }

    /// Copy with every field forced into its valid range.
    pub fn normalized(&self) -> Self {
        Self {
            font_size: self.font_size.max(1),
            size_percent: self.size_percent.clamp(1, 100),
            opacity_percent: self.opacity_percent.min(100),
            ..self.clone()
        }
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.font_size == 0 {
            return Err("font_size must be a positive number of pixels".to_string());
        }

        if !(1..=100).contains(&self.size_percent) {
            return Err(format!(
                "size_percent must be between 1 and 100, got {}",
                self.size_percent
            ));
        }

        if self.opacity_percent > 100 {
            return Err(format!(
                "opacity_percent must be between 0 and 100, got {}",
                self.opacity_percent
            ));
        }

        Ok(())
    }
}
