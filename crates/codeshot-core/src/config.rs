use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_FETCH_MAX_CHARS, DEFAULT_FETCH_MAX_LINES, DEFAULT_FETCH_TIMEOUT_MS,
    DEFAULT_PNG_OPT_LEVEL, DEFAULT_RASTER_MAX_PIXELS, DEFAULT_USER_AGENT,
};

/// Process-wide settings. Per-request style options live in
/// [`crate::GenerationRequest`]; nothing here is chosen by the caller of a
/// single generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directories holding bundled font families (`FiraCode/FiraCode-Regular.ttf`, ...).
    /// Empty means `~/.codeshot/fonts`.
    #[serde(rename = "font_dirs")]
    pub font_dirs: Vec<String>,
    /// Load the system font database for fallback families.
    #[serde(rename = "system_fonts")]
    pub system_fonts: bool,
    /// Upper bound on the high-resolution render buffer, in pixels.
    #[serde(rename = "max_pixels")]
    pub max_pixels: u64,
    pub fetch: FetchSettings,
    pub png: PngOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_dirs: Vec::new(),
            system_fonts: true,
            max_pixels: DEFAULT_RASTER_MAX_PIXELS,
            fetch: FetchSettings::default(),
            png: PngOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    #[serde(rename = "timeout_ms")]
    pub timeout_ms: u64,
    #[serde(rename = "user_agent")]
    pub user_agent: String,
    #[serde(rename = "max_chars")]
    pub max_chars: usize,
    #[serde(rename = "max_lines")]
    pub max_lines: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_chars: DEFAULT_FETCH_MAX_CHARS,
            max_lines: DEFAULT_FETCH_MAX_LINES,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PngStrip {
    None,
    #[default]
    Safe,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PngOptions {
    pub optimize: bool,
    pub level: u8,
    pub strip: PngStrip,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            level: DEFAULT_PNG_OPT_LEVEL,
            strip: PngStrip::Safe,
        }
    }
}
