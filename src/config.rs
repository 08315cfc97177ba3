//! Settings file loading.
//!
//! A YAML file describes the watermark plus a few front-end options.
//! `${VAR}` references are replaced with environment variables before
//! parsing; an undefined variable is an error. Settings are only ever read,
//! never written back.
//!
//! ```yaml
//! watermark:
//!   kind: image
//!   size_percent: 15
//!   anchor_ratio: [0.92, 0.92]
//!   opacity_percent: 70
//! watermark_image: ${HOME}/logo.png
//! preset: bottom-right
//! preview:
//!   width: 1280
//!   height: 720
//! logging:
//!   level: debug
//!   format: json
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LoggingConfig;
use crate::watermark::{PositionPreset, WatermarkSettings};

/// Default preview surface size.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 900;
pub const DEFAULT_PREVIEW_HEIGHT: u32 = 600;

fn default_preview_width() -> u32 {
    DEFAULT_PREVIEW_WIDTH
}

fn default_preview_height() -> u32 {
    DEFAULT_PREVIEW_HEIGHT
}

/// Size of the on-screen preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_preview_width")]
    pub width: u32,
    #[serde(default = "default_preview_height")]
    pub height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_PREVIEW_WIDTH,
            height: DEFAULT_PREVIEW_HEIGHT,
        }
    }
}

/// Contents of a settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub watermark: WatermarkSettings,

    /// Image asset for `kind: image` watermarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_image: Option<PathBuf>,

    /// Named position; overrides `watermark.anchor_ratio` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<PositionPreset>,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SettingsFile {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        let substituted = substitute_env_vars(yaml)?;

        let mut file: SettingsFile =
            serde_yaml::from_str(&substituted).map_err(|e| e.to_string())?;

        if let Some(ratio) = file.preset.and_then(|p| p.ratio()) {
            file.watermark.anchor_ratio = ratio;
        }

        file.validate()?;
        Ok(file)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.watermark.validate()?;

        if self.preview.width == 0 || self.preview.height == 0 {
            return Err(format!(
                "preview surface must be non-empty, got {}x{}",
                self.preview.width, self.preview.height
            ));
        }

        Ok(())
    }
}

/// Replace `${VAR_NAME}` with environment variable values.
pub fn substitute_env_vars(yaml: &str) -> Result<String, String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

    // First, check that all referenced environment variables exist
    for caps in re.captures_iter(yaml) {
        let var_name = &caps[1];
        std::env::var(var_name).map_err(|_| {
            format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )
        })?;
    }

    let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_default()
    });

    Ok(substituted.into_owned())
}
