use serde::Serialize;

use crate::{
    Error, Result, DEFAULT_TAB_WIDTH, EXTRA_SPACE_EFFECTS, EXTRA_SPACE_PLAIN,
    FONT_HEIGHT_TO_WIDTH_RATIO, IMAGE_PAD, LINE_HEIGHT_RATIO, LINE_NUMBER_CHARS, LINE_NUMBER_PAD,
    LINE_PAD, PADDING, TITLE_BAR_HEIGHT,
};

/// Canvas size and code placement for one screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    pub code_x: u32,
    pub code_y: u32,
    pub title_bar_height: u32,
    pub extra_space: u32,
}

impl FrameGeometry {
    /// Sizes the frame around a `code_width` x `code_height` image. Effects
    /// that spill past the code (shadow, reflection) widen the margin, and a
    /// reflection adds half the code height below it.
    pub fn new(
        code_width: u32,
        code_height: u32,
        title_bar: bool,
        shadow: bool,
        reflection: bool,
    ) -> Self {
        let title_bar_height = if title_bar { TITLE_BAR_HEIGHT } else { 0 };
        let extra_space = if shadow || reflection {
            EXTRA_SPACE_EFFECTS
        } else {
            EXTRA_SPACE_PLAIN
        };
        let width = code_width + PADDING * 2 + extra_space;
        let mut height = code_height + PADDING * 2 + title_bar_height + extra_space;
        if reflection {
            height += code_height / 2;
        }
        Self {
            width,
            height,
            code_x: PADDING + extra_space / 2,
            code_y: title_bar_height + PADDING,
            title_bar_height,
            extra_space,
        }
    }
}

/// Pixel layout of the highlighted code image at 1x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CodeLayout {
    pub(crate) font_size: f32,
    pub(crate) char_width: f32,
    pub(crate) line_height: f32,
    pub(crate) gutter_width: f32,
    pub(crate) text_x: f32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl CodeLayout {
    pub(crate) fn new(font_size: u32, line_count: usize, max_cells: usize, line_numbers: bool) -> Self {
        let font_size = font_size as f32;
        let char_width = font_size / FONT_HEIGHT_TO_WIDTH_RATIO;
        let line_height = font_size * LINE_HEIGHT_RATIO + LINE_PAD;
        let gutter_width = if line_numbers {
            LINE_NUMBER_CHARS as f32 * char_width + LINE_NUMBER_PAD * 2.0
        } else {
            0.0
        };
        let text_x = gutter_width + IMAGE_PAD;
        let width = text_x + max_cells as f32 * char_width + IMAGE_PAD;
        let height = IMAGE_PAD * 2.0 + line_count.max(1) as f32 * line_height;
        Self {
            font_size,
            char_width,
            line_height,
            gutter_width,
            text_x,
            width: width.ceil() as u32,
            height: height.ceil() as u32,
        }
    }

    pub(crate) fn baseline(&self, line_idx: usize) -> f32 {
        IMAGE_PAD + self.line_height * line_idx as f32 + self.font_size
    }

    pub(crate) fn line_top(&self, line_idx: usize) -> f32 {
        IMAGE_PAD + self.line_height * line_idx as f32
    }
}

pub(crate) fn text_width_cells(text: &str) -> usize {
    let mut width = 0usize;
    for ch in text.chars() {
        if ch == '\t' {
            width += DEFAULT_TAB_WIDTH;
        } else {
            width += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        }
    }
    width
}

pub(crate) fn truncate_to_cells(text: &str, max_cells: usize, ellipsis: &str) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if text_width_cells(text) <= max_cells {
        return text.to_string();
    }
    let ellipsis_width = text_width_cells(ellipsis);
    if ellipsis_width >= max_cells {
        return ellipsis.chars().take(1).collect();
    }
    let mut out = String::new();
    let mut current = 0usize;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current + w > max_cells - ellipsis_width {
            break;
        }
        out.push(ch);
        current += w;
    }
    out.push_str(ellipsis);
    out
}

pub(crate) fn scale_dimension(value: u32, scale: u32) -> Result<u32> {
    value
        .checked_mul(scale)
        .filter(|scaled| *scaled > 0)
        .ok_or_else(|| Error::Render(format!("invalid raster size {value}x{scale}")))
}
