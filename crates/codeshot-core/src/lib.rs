const FONT_HEIGHT_TO_WIDTH_RATIO: f32 = 1.68;
const LINE_HEIGHT_RATIO: f32 = 1.2;
const LINE_PAD: f32 = 2.0;
const DEFAULT_TAB_WIDTH: usize = 4;
const IMAGE_PAD: f32 = 25.0;
const LINE_NUMBER_PAD: f32 = 15.0;
const LINE_NUMBER_CHARS: usize = 4;
const HIGHLIGHT_LINE_OPACITY: f32 = 0.25;

const PADDING: u32 = 80;
const TITLE_BAR_HEIGHT: u32 = 50;
const EXTRA_SPACE_EFFECTS: u32 = 40;
const EXTRA_SPACE_PLAIN: u32 = 20;

const MAX_RENDER_CHARS: usize = 15_000;
const MAX_RENDER_LINES: usize = 150;
const TRUNCATE_BOUNDARY_RATIO: f32 = 0.8;
const FULL_QUALITY_MAX_CHARS: usize = 10_000;
const FULL_QUALITY_MAX_LINES: usize = 100;
const MEDIUM_QUALITY_MAX_CHARS: usize = 20_000;
const MEDIUM_QUALITY_MAX_LINES: usize = 200;
const MIN_FONT_SIZE: u32 = 8;
const MAX_FONT_SIZE: u32 = 32;
const RANDOM_FONT_SIZE_MIN: u32 = 12;
const RANDOM_FONT_SIZE_MAX: u32 = 18;

const CORNER_RADIUS: f32 = 12.0;
const CORNER_MASK_SCALE: f32 = 4.0;
const SHADOW_CORNER_RADIUS: f32 = 15.0;
const REFLECTION_GAP: u32 = 15;
const REFLECTION_MAX_OPACITY: f32 = 0.4;
const REFLECTION_BLUR: f32 = 1.0;
const GLOW_COLOR: &str = "#00ff41";
const GLOW_INSET: f32 = 5.0;
const WATERMARK_FONT_SIZE: f32 = 12.0;
const WATERMARK_MARGIN: f32 = 20.0;
const WATERMARK_PADDING: f32 = 8.0;

const DEFAULT_RASTER_MAX_PIXELS: u64 = 24_000_000;
const DEFAULT_PNG_OPT_LEVEL: u8 = 2;
const MAX_PNG_OPT_LEVEL: u8 = 6;
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_FETCH_MAX_CHARS: usize = 25_000;
const DEFAULT_FETCH_MAX_LINES: usize = 300;
const DEFAULT_USER_AGENT: &str = "Codeshot/1.0";

mod background;
mod chrome;
mod config;
mod detect;
mod effects;
mod fetch;
mod fonts;
mod generator;
mod layout;
mod options;
mod png;
mod raster;
mod render;
mod summary;
mod svg;
mod syntax;
mod text;
mod tool;
mod types;
mod validation;

pub use config::{FetchSettings, PngOptions, PngStrip, Settings};
pub use detect::detect_language;
pub use fetch::fetch_code;
pub use generator::Generator;
pub use layout::FrameGeometry;
pub use options::{FontFamily, FrameStyle, AVAILABLE_BACKGROUNDS, AVAILABLE_THEMES};
pub use render::{Quality, RenderInfo};
pub use summary::format_summary;
pub use tool::{
    codeshot, generate_from_arguments, ContentPart, ErrorCode, ToolArguments, ToolError,
};
pub use types::{Error, GenerationOutput, GenerationRequest, Result};
pub use validation::{validate, ResolvedParameters, ValidationResult};

#[derive(Debug, Clone, Default, PartialEq)]
struct TextStyle {
    fg: Option<String>,
    bg: Option<String>,
    bold: bool,
    italic: bool,
    underline: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Span {
    pub(crate) text: String,
    style: TextStyle,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Line {
    pub(crate) spans: Vec<Span>,
}

#[cfg(test)]
mod tests;
