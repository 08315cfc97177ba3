use anyhow::{anyhow, Context};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};
use watermark_studio::config::SettingsFile;
use watermark_studio::image_io;
use watermark_studio::logging::{self, LogFormat};
use watermark_studio::session::WatermarkSession;
use watermark_studio::watermark::{
    parse_hex_color, ImageDimensions, PositionPreset, TextColor, WatermarkKind, WatermarkSettings,
};

/// Watermark Studio - place text or image watermarks on photos
#[derive(Parser, Debug)]
#[command(name = "watermark-studio")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (pretty or json); overrides the settings file
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite the watermark at full resolution and write the result
    Render {
        /// Background image
        background: PathBuf,

        /// Output file; format follows the extension (png, jpg, jpeg, webp)
        output: PathBuf,

        #[command(flatten)]
        overrides: WatermarkOverrides,
    },

    /// Render the preview surface as the editor would show it
    Preview {
        /// Background image
        background: PathBuf,

        /// Output file for the preview frame
        output: PathBuf,

        /// Preview surface width
        #[arg(long)]
        width: Option<u32>,

        /// Preview surface height
        #[arg(long)]
        height: Option<u32>,

        #[command(flatten)]
        overrides: WatermarkOverrides,
    },

    /// List the named positions and their anchor ratios
    Presets,
}

/// Command-line overrides applied on top of the settings file.
#[derive(ClapArgs, Debug, Default)]
struct WatermarkOverrides {
    /// Watermark kind (text or image)
    #[arg(long)]
    kind: Option<WatermarkKind>,

    /// Watermark text
    #[arg(long)]
    text: Option<String>,

    /// Text color as #RGB, #RRGGBB or #RRGGBBAA; without alpha the current
    /// alpha is kept
    #[arg(long)]
    color: Option<String>,

    /// Font file for text watermarks
    #[arg(long)]
    font: Option<PathBuf>,

    /// Text rasterization size in pixels
    #[arg(long)]
    font_size: Option<u32>,

    /// Watermark image; implies --kind image
    #[arg(long)]
    image: Option<PathBuf>,

    /// Watermark width as a percentage of the background width
    #[arg(long)]
    size: Option<u32>,

    /// Opacity from 0 to 100
    #[arg(long)]
    opacity: Option<u32>,

    /// Counter-clockwise rotation in degrees
    #[arg(long, allow_hyphen_values = true)]
    rotation: Option<i32>,

    /// Named position
    #[arg(long)]
    preset: Option<PositionPreset>,

    /// Anchor ratio as X,Y in [0, 1]
    #[arg(long, value_parser = parse_anchor, conflicts_with = "preset")]
    anchor: Option<(f64, f64)>,
}

impl WatermarkOverrides {
    fn apply_to(&self, settings: &mut WatermarkSettings) -> anyhow::Result<()> {
        if let Some(kind) = self.kind {
            settings.kind = kind;
        }
        if self.image.is_some() {
            settings.kind = WatermarkKind::Image;
        }
        if let Some(text) = &self.text {
            settings.text = text.clone();
        }
        if let Some(color) = &self.color {
            settings.text_color = merge_color(settings.text_color, color)?;
        }
        if let Some(font_size) = self.font_size {
            settings.font_size = font_size;
        }
        if let Some(size) = self.size {
            settings.size_percent = size;
        }
        if let Some(opacity) = self.opacity {
            settings.opacity_percent = opacity;
        }
        if let Some(rotation) = self.rotation {
            settings.rotation_degrees = rotation;
        }
        if let Some((x, y)) = self.anchor {
            settings.set_anchor(x, y);
        }

        settings.validate().map_err(|e| anyhow!(e))
    }
}

/// A color without alpha digits only replaces RGB.
fn merge_color(current: TextColor, hex: &str) -> anyhow::Result<TextColor> {
    let parsed = parse_hex_color(hex).with_context(|| format!("Invalid color '{}'", hex))?;
    let digits = hex.trim_start_matches('#').len();
    if digits == 3 || digits == 6 {
        Ok(current.with_rgb(parsed.r, parsed.g, parsed.b))
    } else {
        Ok(parsed)
    }
}

fn parse_anchor(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad X: {}", e))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad Y: {}", e))?;
    Ok((x, y))
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<SettingsFile> {
    match path {
        Some(path) => SettingsFile::from_file(path)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(SettingsFile::default()),
    }
}

/// Build a session with the background loaded and all settings applied.
fn prepare_session(
    file: &SettingsFile,
    background: &Path,
    overrides: &WatermarkOverrides,
    surface: Option<ImageDimensions>,
) -> anyhow::Result<WatermarkSession> {
    let mut settings = file.watermark.clone();
    overrides.apply_to(&mut settings)?;

    let mut session = WatermarkSession::from_settings_file(file)?;
    if let Some(surface) = surface {
        session.set_surface_size(surface)?;
    }
    if let Some(image) = &overrides.image {
        session
            .load_watermark_image(image)
            .with_context(|| format!("Failed to load watermark image {}", image.display()))?;
    }

    session
        .load_background(background)
        .with_context(|| format!("Failed to open background {}", background.display()))?;

    // Loading a background recenters the anchor, so settings go in afterwards
    session.update_settings(settings);
    if let Some(font) = &overrides.font {
        session
            .set_font(font)
            .with_context(|| format!("Failed to load font {}", font.display()))?;
    }
    // An explicit --anchor wins over a preset from the settings file
    let preset = match overrides.anchor {
        Some(_) => None,
        None => overrides.preset.or(file.preset),
    };
    if let Some(preset) = preset {
        session.apply_preset(preset);
    }

    Ok(session)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let file = load_settings(args.config.as_deref())?;

    let mut log_config = file.logging.clone();
    if let Some(format) = args.log_format {
        log_config.format = format;
    }
    logging::init_subscriber(&log_config).context("Failed to initialize logging subsystem")?;

    if let Some(path) = &args.config {
        tracing::info!(
            config_file = %path.display(),
            kind = file.watermark.kind.as_str(),
            preset = ?file.preset,
            "Settings loaded successfully"
        );
    }

    match &args.command {
        Command::Render {
            background,
            output,
            overrides,
        } => {
            let session = prepare_session(&file, background, overrides, None)?;
            let format = session
                .export(output)
                .with_context(|| format!("Failed to export {}", output.display()))?;

            tracing::info!(
                output = %output.display(),
                format = format.as_str(),
                preset = %session.preset(),
                "Watermarked image written"
            );
        }
        Command::Preview {
            background,
            output,
            width,
            height,
            overrides,
        } => {
            let surface = match (width, height) {
                (None, None) => None,
                (w, h) => Some(ImageDimensions::new(
                    w.unwrap_or(file.preview.width),
                    h.unwrap_or(file.preview.height),
                )),
            };
            let session = prepare_session(&file, background, overrides, surface)?;
            let frame = session.render_preview()?;
            image_io::save_image(&frame.image, output)
                .with_context(|| format!("Failed to write preview {}", output.display()))?;

            tracing::info!(
                output = %output.display(),
                display = ?frame.display_rect.as_tuple(),
                watermark = ?frame.watermark_rect.as_tuple(),
                "Preview written"
            );
        }
        Command::Presets => {
            for preset in PositionPreset::NAMED {
                if let Some(ratio) = preset.ratio() {
                    println!("{:<14} {:.2}, {:.2}", preset.as_str(), ratio.x(), ratio.y());
                }
            }
        }
    }

    Ok(())
}
