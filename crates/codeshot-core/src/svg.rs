use std::fmt::Write as _;

use crate::layout::{text_width_cells, CodeLayout};
use crate::options::Palette;
use crate::syntax::Highlighted;
use crate::{Line, LINE_NUMBER_PAD, HIGHLIGHT_LINE_OPACITY};

pub(crate) struct CodeSvg<'a> {
    pub(crate) highlighted: &'a Highlighted,
    pub(crate) layout: &'a CodeLayout,
    pub(crate) palette: Palette,
    pub(crate) line_numbers: bool,
    pub(crate) highlight_lines: &'a [usize],
    pub(crate) font_family: &'a str,
}

pub(crate) fn open_svg(width: u32, height: u32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )
}

/// A full-canvas blur filter. Filters default to a bounding-box region that
/// would clip the blur; user-space coordinates keep the whole canvas.
pub(crate) fn blur_filter(id: &str, std_dev: f32, width: u32, height: u32) -> String {
    format!(
        r#"<defs><filter id="{id}" filterUnits="userSpaceOnUse" x="0" y="0" width="{width}" height="{height}"><feGaussianBlur stdDeviation="{std_dev:.2}"/></filter></defs>"#
    )
}

pub(crate) fn build_code_svg(code: &CodeSvg<'_>) -> String {
    let layout = code.layout;
    let lines = &code.highlighted.lines;
    let mut svg = open_svg(layout.width, layout.height);
    let _ = write!(
        svg,
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        layout.width,
        layout.height,
        escape_attr(&code.highlighted.background)
    );

    if code.line_numbers {
        let _ = write!(
            svg,
            r#"<rect x="0" y="0" width="{:.2}" height="{}" fill="{}"/>"#,
            layout.gutter_width, layout.height, code.palette.line_number_bg
        );
        let _ = write!(
            svg,
            r#"<line x1="{x:.2}" y1="0" x2="{x:.2}" y2="{}" stroke="{}" stroke-width="1"/>"#,
            layout.height,
            code.palette.line_number_fg,
            x = layout.gutter_width - 0.5
        );
    }

    for number in code.highlight_lines {
        if *number == 0 || *number > lines.len() {
            continue;
        }
        let _ = write!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{HIGHLIGHT_LINE_OPACITY}"/>"#,
            layout.gutter_width,
            layout.line_top(number - 1),
            layout.width as f32 - layout.gutter_width,
            layout.line_height,
            code.palette.highlight
        );
    }

    let _ = write!(
        svg,
        r#"<g font-family="{}" font-size="{:.2}px">"#,
        escape_attr(code.font_family),
        layout.font_size
    );

    if code.line_numbers {
        let number_x = layout.gutter_width - LINE_NUMBER_PAD;
        for idx in 0..lines.len() {
            let _ = write!(
                svg,
                r#"<text x="{number_x:.2}" y="{:.2}" fill="{}" text-anchor="end">{}</text>"#,
                layout.baseline(idx),
                code.palette.line_number_fg,
                idx + 1
            );
        }
    }

    let mut bg_layer = String::new();
    let mut text_layer = String::new();
    for (idx, line) in lines.iter().enumerate() {
        push_code_line(
            &mut bg_layer,
            &mut text_layer,
            line,
            layout,
            idx,
            &code.highlighted.foreground,
        );
    }
    svg.push_str(&bg_layer);
    svg.push_str(&text_layer);
    svg.push_str("</g></svg>");
    svg
}

fn push_code_line(
    bg_layer: &mut String,
    text_layer: &mut String,
    line: &Line,
    layout: &CodeLayout,
    idx: usize,
    default_fg: &str,
) {
    let y = layout.baseline(idx);
    let mut cursor_x = layout.text_x;
    let mut spans = String::new();
    for span in &line.spans {
        let width_px = text_width_cells(&span.text) as f32 * layout.char_width;
        if let Some(bg) = &span.style.bg {
            let _ = write!(
                bg_layer,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                cursor_x,
                layout.line_top(idx),
                width_px,
                layout.line_height,
                bg
            );
        }

        let mut attrs = String::new();
        if let Some(fg) = &span.style.fg {
            let _ = write!(attrs, r#" fill="{fg}""#);
        }
        if span.style.bold {
            attrs.push_str(r#" font-weight="bold""#);
        }
        if span.style.italic {
            attrs.push_str(r#" font-style="italic""#);
        }
        if span.style.underline {
            attrs.push_str(r#" text-decoration="underline""#);
        }
        let text = escape_text(&span.text);
        if !text.is_empty() {
            let _ = write!(
                spans,
                r#"<tspan x="{cursor_x:.2}"{attrs}>{text}</tspan>"#
            );
        }
        cursor_x += width_px;
    }
    if spans.is_empty() {
        return;
    }
    let _ = write!(
        text_layer,
        r#"<text y="{y:.2}" fill="{}" xml:space="preserve">{spans}</text>"#,
        escape_attr(default_fg)
    );
}

/// Escapes markup characters and drops control characters XML cannot carry.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => out.push(' '),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
