use std::fmt::Write as _;
use tiny_skia::Pixmap;

use crate::fonts::FontSet;
use crate::layout::truncate_to_cells;
use crate::raster::{draw, svg_layer};
use crate::svg::{escape_attr, escape_text, open_svg};
use crate::text::capitalize;
use crate::{FrameStyle, Result, FONT_HEIGHT_TO_WIDTH_RATIO};

const TITLE_BAR_FILL: &str = "#2d2d2d";
const TITLE_BAR_RULE: &str = "#1a1a1a";
const TITLE_COLOR: &str = "#ffffff";

const MACOS_BUTTON_RADIUS: f32 = 8.0;
const MACOS_BUTTONS: [(f32, &str); 3] = [(28.0, "#ff6058"), (52.0, "#ffbe2e"), (76.0, "#2aca44")];
const MACOS_TITLE_SIZE: f32 = 14.0;
/// Title space kept clear of the traffic lights on each side.
const MACOS_TITLE_RESERVED: f32 = 100.0;

const WINDOWS_BUTTON_WIDTH: u32 = 46;
const WINDOWS_GLYPH_OFFSET: u32 = 16;
const WINDOWS_TITLE_X: f32 = 15.0;
const WINDOWS_TITLE_SIZE: f32 = 12.0;
/// Close, maximize, minimize from the right edge.
const WINDOWS_BUTTONS: [(&str, &str); 3] = [("#c42b1c", "✕"), ("#404040", "□"), ("#404040", "—")];

/// Window title: the caller's title, or `"<Language> Code"`.
pub(crate) fn window_title(title: Option<&str>, language: &str) -> String {
    match title {
        Some(title) => title.replace(['\n', '\r'], " ").trim().to_string(),
        None => format!("{} Code", capitalize(language)),
    }
}

/// Draws the title bar for `style` across the top `title_bar_height` rows.
/// Floating and minimal frames keep the space but draw nothing.
pub(crate) fn draw_chrome(
    canvas: &mut Pixmap,
    style: FrameStyle,
    title_bar_height: u32,
    title: &str,
    fonts: &FontSet,
) -> Result<()> {
    if title_bar_height == 0 {
        return Ok(());
    }
    let width = canvas.width();
    let svg = match style {
        FrameStyle::Macos => macos_svg(width, title_bar_height, title, &fonts.family_list),
        FrameStyle::Windows => windows_svg(width, title_bar_height, title, &fonts.family_list),
        FrameStyle::Floating | FrameStyle::Minimal | FrameStyle::None => return Ok(()),
    };
    let layer = svg_layer(&svg, &fonts.db, width, title_bar_height)?;
    draw(canvas, &layer, 0, 0);
    Ok(())
}

fn title_bar(svg: &mut String, width: u32, height: u32) {
    let _ = write!(
        svg,
        r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{TITLE_BAR_FILL}"/>"#
    );
}

fn fit_title(title: &str, available_px: f32, size: f32) -> String {
    let cells = (available_px / (size / FONT_HEIGHT_TO_WIDTH_RATIO)).floor().max(0.0) as usize;
    truncate_to_cells(title, cells, "…")
}

fn macos_svg(width: u32, height: u32, title: &str, family: &str) -> String {
    let mut svg = open_svg(width, height);
    title_bar(&mut svg, width, height);
    let rule_y = height as f32 - 0.5;
    let _ = write!(
        svg,
        r#"<line x1="0" y1="{rule_y}" x2="{width}" y2="{rule_y}" stroke="{TITLE_BAR_RULE}" stroke-width="1"/>"#
    );
    let cy = height as f32 / 2.0;
    for (cx, fill) in MACOS_BUTTONS {
        let _ = write!(
            svg,
            r#"<circle cx="{cx}" cy="{cy}" r="{MACOS_BUTTON_RADIUS}" fill="{fill}"/>"#
        );
    }
    let title = fit_title(
        title,
        width as f32 - 2.0 * MACOS_TITLE_RESERVED,
        MACOS_TITLE_SIZE,
    );
    if !title.is_empty() {
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" fill="{TITLE_COLOR}" font-family="{}" font-size="{MACOS_TITLE_SIZE}px" font-weight="500" text-anchor="middle" xml:space="preserve">{}</text>"#,
            width as f32 / 2.0,
            cy + MACOS_TITLE_SIZE * 0.35,
            escape_attr(family),
            escape_text(&title)
        );
    }
    svg.push_str("</svg>");
    svg
}

fn windows_svg(width: u32, height: u32, title: &str, family: &str) -> String {
    let mut svg = open_svg(width, height);
    title_bar(&mut svg, width, height);
    let baseline = height as f32 / 2.0 + WINDOWS_TITLE_SIZE * 0.35;
    let _ = write!(
        svg,
        r#"<g font-family="{}" font-size="{WINDOWS_TITLE_SIZE}px" fill="{TITLE_COLOR}">"#,
        escape_attr(family)
    );

    let mut x = width;
    for (fill, glyph) in WINDOWS_BUTTONS {
        x = x.saturating_sub(WINDOWS_BUTTON_WIDTH);
        let _ = write!(
            svg,
            r#"<rect x="{x}" y="0" width="{WINDOWS_BUTTON_WIDTH}" height="{height}" fill="{fill}"/><text x="{}" y="{baseline:.2}">{glyph}</text>"#,
            x + WINDOWS_GLYPH_OFFSET
        );
    }

    let title = fit_title(
        title,
        x as f32 - WINDOWS_TITLE_X * 2.0,
        WINDOWS_TITLE_SIZE,
    );
    if !title.is_empty() {
        let _ = write!(
            svg,
            r#"<text x="{WINDOWS_TITLE_X}" y="{baseline:.2}" xml:space="preserve">{}</text>"#,
            escape_text(&title)
        );
    }
    svg.push_str("</g></svg>");
    svg
}
