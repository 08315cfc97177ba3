//! Font resolution with graceful fallback.
//!
//! A text watermark always gets a usable font. Resolution tries, in order:
//!
//! 1. the user-selected font file, if set and readable
//! 2. a well-known system font path
//! 3. the embedded DejaVu Sans Mono compiled into the binary
//!
//! Loading a font the user explicitly picked goes through
//! [`load_font_file`], which does report errors so the caller can keep its
//! previous selection.

use super::WatermarkError;
use ab_glyph::{FontArc, FontRef};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Embedded font data (DejaVu Sans Mono, Bitstream Vera license).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

static EMBEDDED_FONT: OnceLock<FontArc> = OnceLock::new();

/// System fonts tried when no user font is usable.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Where a resolved font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    User(PathBuf),
    System(PathBuf),
    Embedded,
}

/// A font ready for layout, plus its origin.
#[derive(Clone)]
pub struct ResolvedFont {
    pub font: FontArc,
    pub source: FontSource,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("source", &self.source)
            .finish()
    }
}

/// Get the embedded font, initializing it lazily.
pub fn embedded_font() -> FontArc {
    EMBEDDED_FONT
        .get_or_init(|| {
            let font = FontRef::try_from_slice(EMBEDDED_FONT_DATA)
                .expect("Failed to load embedded font - this is a bug");
            FontArc::new(font)
        })
        .clone()
}

/// Read and parse a TrueType/OpenType font file.
pub fn load_font_file(path: &Path) -> Result<FontArc, WatermarkError> {
    let bytes = std::fs::read(path)
        .map_err(|e| WatermarkError::FontLoad(format!("{}: {}", path.display(), e)))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| WatermarkError::FontLoad(format!("{}: {}", path.display(), e)))
}

/// Resolve a font for rendering. Never fails.
pub fn resolve_font(requested: Option<&Path>) -> ResolvedFont {
    let candidates: Vec<PathBuf> = SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from).collect();
    resolve_font_with(requested, &candidates)
}

/// Resolution with an explicit system candidate list.
pub fn resolve_font_with(requested: Option<&Path>, system_candidates: &[PathBuf]) -> ResolvedFont {
    if let Some(path) = requested {
        match load_font_file(path) {
            Ok(font) => {
                return ResolvedFont {
                    font,
                    source: FontSource::User(path.to_path_buf()),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Requested font unavailable, falling back");
            }
        }
    }

    for candidate in system_candidates {
        if !candidate.is_file() {
            continue;
        }
        if let Ok(font) = load_font_file(candidate) {
            tracing::debug!(font = %candidate.display(), "Using system font");
            return ResolvedFont {
                font,
                source: FontSource::System(candidate.clone()),
            };
        }
    }

    tracing::debug!("Using embedded fallback font");
    ResolvedFont {
        font: embedded_font(),
        source: FontSource::Embedded,
    }
}

/// Remembers the last resolution so repeated renders skip disk access.
#[derive(Debug, Default)]
pub struct FontCache {
    last: Mutex<Option<(Option<PathBuf>, ResolvedFont)>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `requested`, reusing the previous result for the same path.
    pub fn get(&self, requested: Option<&Path>) -> ResolvedFont {
        let mut last = self.last.lock();
        if let Some((key, resolved)) = last.as_ref() {
            if key.as_deref() == requested {
                return resolved.clone();
            }
        }

        let resolved = resolve_font(requested);
        *last = Some((requested.map(Path::to_path_buf), resolved.clone()));
        resolved
    }

    /// Forget the cached font.
    pub fn clear(&self) {
        *self.last.lock() = None;
    }
}
