use log::debug;
use serde::Serialize;
use tiny_skia::Pixmap;

use crate::fonts::FontSet;
use crate::layout::{scale_dimension, text_width_cells, CodeLayout};
use crate::options::{highlighter_style, theme_palette};
use crate::raster::{rasterize_svg, resample};
use crate::svg::{build_code_svg, CodeSvg};
use crate::syntax::highlight_code;
use crate::text::{detab, line_count, render_truncation_notice, truncate_code};
use crate::{
    ResolvedParameters, Result, DEFAULT_TAB_WIDTH, FULL_QUALITY_MAX_CHARS, FULL_QUALITY_MAX_LINES,
    MAX_RENDER_CHARS, MAX_RENDER_LINES, MEDIUM_QUALITY_MAX_CHARS, MEDIUM_QUALITY_MAX_LINES,
    MIN_FONT_SIZE,
};

/// Supersampling tier picked from input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Full,
    Medium,
    Low,
}

impl Quality {
    pub fn for_code(code: &str) -> Self {
        let chars = code.chars().count();
        let lines = line_count(code);
        if chars <= FULL_QUALITY_MAX_CHARS && lines <= FULL_QUALITY_MAX_LINES {
            Quality::Full
        } else if chars <= MEDIUM_QUALITY_MAX_CHARS && lines <= MEDIUM_QUALITY_MAX_LINES {
            Quality::Medium
        } else {
            Quality::Low
        }
    }

    pub fn scale(self) -> u32 {
        match self {
            Quality::Full => 4,
            Quality::Medium => 2,
            Quality::Low => 1,
        }
    }

    pub fn font_reduction(self) -> u32 {
        match self {
            Quality::Full => 0,
            Quality::Medium => 2,
            Quality::Low => 4,
        }
    }

    pub fn font_size(self, requested: u32) -> u32 {
        requested.saturating_sub(self.font_reduction()).max(MIN_FONT_SIZE)
    }
}

/// How the code image was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderInfo {
    pub quality: Quality,
    /// Supersampling factor actually used, after the pixel budget.
    pub quality_scale: u32,
    pub font_size: u32,
    pub truncated: bool,
}

pub(crate) struct CodeImage {
    pub(crate) pixmap: Pixmap,
    pub(crate) info: RenderInfo,
}

/// Highlights `code` and rasterizes it at a supersampled resolution, then
/// downsamples to the 1x layout size. The result is opaque.
pub(crate) fn render_code_image(
    code: &str,
    language: &str,
    params: &ResolvedParameters,
    fonts: &FontSet,
    max_pixels: u64,
) -> Result<CodeImage> {
    let quality = Quality::for_code(code);
    let font_size = quality.font_size(params.font_size);

    let (text, truncated) = match truncate_code(code, MAX_RENDER_CHARS, MAX_RENDER_LINES) {
        Some(cut) => {
            debug!(
                "truncated code for rendering: {} lines, {} chars",
                cut.original_lines, cut.original_chars
            );
            let notice = render_truncation_notice(&cut);
            (cut.text + &notice, true)
        }
        None => (code.to_string(), false),
    };
    let text = detab(&text, DEFAULT_TAB_WIDTH);

    let highlighted = highlight_code(&text, language, highlighter_style(&params.theme))?;
    let max_cells = highlighted
        .lines
        .iter()
        .map(|line| line.spans.iter().map(|span| text_width_cells(&span.text)).sum::<usize>())
        .max()
        .unwrap_or(0);
    let layout = CodeLayout::new(
        font_size,
        highlighted.lines.len(),
        max_cells,
        params.line_numbers,
    );

    let svg = build_code_svg(&CodeSvg {
        highlighted: &highlighted,
        layout: &layout,
        palette: theme_palette(&params.theme),
        line_numbers: params.line_numbers,
        highlight_lines: &params.highlight_lines,
        font_family: &fonts.family_list,
    });

    let scale = raster_scale(quality.scale(), layout.width, layout.height, max_pixels);
    debug!(
        "rendering code image {}x{} at {}x ({:?})",
        layout.width, layout.height, scale, quality
    );
    let width = scale_dimension(layout.width, scale)?;
    let height = scale_dimension(layout.height, scale)?;
    let hi_res = rasterize_svg(&svg, &fonts.db, width, height, scale as f32)?;
    let pixmap = if scale > 1 {
        resample(&hi_res, layout.width, layout.height)?
    } else {
        hi_res
    };

    Ok(CodeImage {
        pixmap,
        info: RenderInfo {
            quality,
            quality_scale: scale,
            font_size,
            truncated,
        },
    })
}

/// Largest integer scale up to `requested` whose buffer fits in `max_pixels`.
pub(crate) fn raster_scale(requested: u32, base_width: u32, base_height: u32, max_pixels: u64) -> u32 {
    let mut scale = requested.max(1);
    if max_pixels == 0 {
        return scale;
    }
    let base_pixels = base_width as u64 * base_height as u64;
    while scale > 1 && base_pixels * (scale as u64).pow(2) > max_pixels {
        scale -= 1;
    }
    scale
}
