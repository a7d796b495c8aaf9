//! Effect stages applied around the code image: rounded corners, layered
//! shadow, reflection, border glow and watermark.

use log::debug;
use std::fmt::Write as _;
use std::sync::Arc;
use tiny_skia::{Mask, Pixmap, PixmapPaint, Transform};
use usvg::fontdb::Database;

use crate::fonts::FontSet;
use crate::options::{ShadowLayer, SHADOW_LAYERS};
use crate::raster::{alpha_channel, apply_coverage, blur, draw, new_pixmap, resample, svg_layer};
use crate::render::raster_scale;
use crate::svg::{blur_filter, escape_attr, escape_text, open_svg};
use crate::{
    Error, Result, CORNER_MASK_SCALE, CORNER_RADIUS, FONT_HEIGHT_TO_WIDTH_RATIO, GLOW_COLOR,
    GLOW_INSET, REFLECTION_BLUR, REFLECTION_GAP, REFLECTION_MAX_OPACITY, SHADOW_CORNER_RADIUS,
    WATERMARK_FONT_SIZE, WATERMARK_MARGIN, WATERMARK_PADDING,
};

const GLOW_STROKE_WIDTH: f32 = 3.0;
const GLOW_BLUR: f32 = 3.0;
const GLOW_OPACITY: f32 = 100.0 / 255.0;
const WATERMARK_PLATE_RADIUS: f32 = 6.0;
const WATERMARK_PLATE_OPACITY: f32 = 100.0 / 255.0;
const WATERMARK_TEXT_OPACITY: f32 = 200.0 / 255.0;

/// Clips the code image to a rounded rectangle. The mask is drawn
/// supersampled and downsampled for smooth edges, then multiplied in.
pub(crate) fn round_corners(code: &mut Pixmap, fontdb: &Arc<Database>, max_pixels: u64) -> Result<()> {
    let (width, height) = (code.width(), code.height());
    let scale = raster_scale(CORNER_MASK_SCALE as u32, width, height, max_pixels);
    let (mask_w, mask_h) = (width * scale, height * scale);
    let radius = CORNER_RADIUS * scale as f32;

    let mut svg = open_svg(mask_w, mask_h);
    let _ = write!(
        svg,
        r#"<rect x="0" y="0" width="{mask_w}" height="{mask_h}" rx="{radius}" ry="{radius}" fill="white"/></svg>"#
    );
    let mask = svg_layer(&svg, fontdb, mask_w, mask_h)?;
    let mask = resample(&mask, width, height)?;
    apply_coverage(code, &alpha_channel(&mask))
}

/// Composites the fixed shadow layers under where the code image will sit.
pub(crate) fn apply_shadow(
    canvas: &mut Pixmap,
    code_size: (u32, u32),
    code_pos: (u32, u32),
    rounded: bool,
    fontdb: &Arc<Database>,
) -> Result<()> {
    let (width, height) = (canvas.width(), canvas.height());
    let mut svg = open_svg(width, height);
    svg.push_str("<defs>");
    for (idx, layer) in SHADOW_LAYERS.iter().enumerate() {
        let _ = write!(
            svg,
            r#"<filter id="shadow{idx}" filterUnits="userSpaceOnUse" x="0" y="0" width="{width}" height="{height}"><feGaussianBlur stdDeviation="{:.2}"/></filter>"#,
            layer.blur
        );
    }
    svg.push_str("</defs>");
    for (idx, layer) in SHADOW_LAYERS.iter().enumerate() {
        push_shadow_rect(&mut svg, idx, layer, code_size, code_pos, rounded);
    }
    svg.push_str("</svg>");

    let layer = svg_layer(&svg, fontdb, width, height)?;
    draw(canvas, &layer, 0, 0);
    Ok(())
}

fn push_shadow_rect(
    svg: &mut String,
    idx: usize,
    layer: &ShadowLayer,
    (code_w, code_h): (u32, u32),
    (code_x, code_y): (u32, u32),
    rounded: bool,
) {
    let radius = if rounded { SHADOW_CORNER_RADIUS } else { 0.0 };
    let _ = write!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="{code_w}" height="{code_h}" rx="{radius}" ry="{radius}" fill="black" fill-opacity="{:.3}" filter="url(#shadow{idx})"/>"#,
        code_x as f32 + layer.offset.0,
        code_y as f32 + layer.offset.1,
        layer.opacity
    );
}

/// Mirrors the code image below itself, fading from 40% opacity to nothing.
pub(crate) fn apply_reflection(canvas: &mut Pixmap, code: &Pixmap, code_pos: (u32, u32)) -> Result<()> {
    let (width, height) = (code.width(), code.height());
    let mut fade = Mask::new(width, height)
        .ok_or_else(|| Error::Render(format!("invalid mask size {width}x{height}")))?;
    let row_len = width as usize;
    for (y, row) in fade.data_mut().chunks_exact_mut(row_len).enumerate() {
        row.fill(reflection_alpha(y as u32, height));
    }

    let mut reflection = new_pixmap(width, height)?;
    reflection.draw_pixmap(
        0,
        0,
        code.as_ref(),
        &PixmapPaint::default(),
        Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, height as f32),
        Some(&fade),
    );
    let reflection = blur(&reflection, REFLECTION_BLUR)?;

    let y = code_pos.1 + height + REFLECTION_GAP;
    draw(canvas, &reflection, code_pos.0 as i32, y as i32);
    Ok(())
}

/// Quadratic ease-out fade: strongest next to the code, gone at the far edge.
pub(crate) fn reflection_alpha(row: u32, height: u32) -> u8 {
    if height == 0 {
        return 0;
    }
    let ratio = row as f32 / height as f32;
    let fade = 1.0 - (1.0 - ratio).powi(2);
    ((1.0 - fade) * REFLECTION_MAX_OPACITY * 255.0).round() as u8
}

/// Blurred neon outline inset from the frame edges.
pub(crate) fn apply_glow(canvas: &mut Pixmap, fontdb: &Arc<Database>) -> Result<()> {
    let (width, height) = (canvas.width(), canvas.height());
    let rect_w = (width as f32 - GLOW_INSET * 2.0).max(0.0);
    let rect_h = (height as f32 - GLOW_INSET * 2.0).max(0.0);
    let mut svg = open_svg(width, height);
    svg.push_str(&blur_filter("glow", GLOW_BLUR, width, height));
    let _ = write!(
        svg,
        r#"<rect x="{GLOW_INSET}" y="{GLOW_INSET}" width="{rect_w:.2}" height="{rect_h:.2}" fill="none" stroke="{GLOW_COLOR}" stroke-opacity="{GLOW_OPACITY:.3}" stroke-width="{GLOW_STROKE_WIDTH}" filter="url(#glow)"/></svg>"#
    );
    let layer = svg_layer(&svg, fontdb, width, height)?;
    draw(canvas, &layer, 0, 0);
    Ok(())
}

/// Rendered extent of a watermark text, relative to a baseline at y = font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TextBox {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
}

fn watermark_text(text: &str, family: &str, x: f32, baseline: f32) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<text x="{x:.2}" y="{baseline:.2}" font-family="{}" font-size="{WATERMARK_FONT_SIZE}px" fill="white" fill-opacity="{WATERMARK_TEXT_OPACITY:.3}" xml:space="preserve">{}</text>"#,
        escape_attr(family),
        escape_text(text)
    );
    svg
}

/// Measures `text` as the renderer will draw it; falls back to the
/// monospace estimate when no font can shape it.
pub(crate) fn measure_watermark(text: &str, fonts: &FontSet) -> TextBox {
    let estimate = TextBox {
        x: 0.0,
        y: 0.0,
        width: text.chars().count() as f32 * WATERMARK_FONT_SIZE / FONT_HEIGHT_TO_WIDTH_RATIO,
        height: WATERMARK_FONT_SIZE,
    };
    let mut svg = open_svg(1, 1);
    svg.push_str(&watermark_text(text, &fonts.family_list, 0.0, WATERMARK_FONT_SIZE));
    svg.push_str("</svg>");

    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::clone(&fonts.db);
    let Ok(tree) = usvg::Tree::from_str(&svg, &opt) else {
        return estimate;
    };
    if !tree.root().has_children() {
        debug!("watermark text produced no glyphs, using estimated size");
        return estimate;
    }
    let bbox = tree.root().bounding_box();
    if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
        return estimate;
    }
    TextBox {
        x: bbox.x(),
        y: bbox.y(),
        width: bbox.width(),
        height: bbox.height(),
    }
}

/// Draws `text` in the bottom-right corner on a translucent plate.
pub(crate) fn apply_watermark(canvas: &mut Pixmap, text: &str, fonts: &FontSet) -> Result<()> {
    let (width, height) = (canvas.width(), canvas.height());
    let measured = measure_watermark(text, fonts);
    let x = width as f32 - measured.width - WATERMARK_MARGIN;
    let y = height as f32 - measured.height - WATERMARK_MARGIN;

    let mut svg = open_svg(width, height);
    let _ = write!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{WATERMARK_PLATE_RADIUS}" ry="{WATERMARK_PLATE_RADIUS}" fill="black" fill-opacity="{WATERMARK_PLATE_OPACITY:.3}"/>"#,
        x - WATERMARK_PADDING,
        y - WATERMARK_PADDING,
        measured.width + WATERMARK_PADDING * 2.0,
        measured.height + WATERMARK_PADDING * 2.0
    );
    svg.push_str(&watermark_text(
        text,
        &fonts.family_list,
        x - measured.x,
        y - measured.y + WATERMARK_FONT_SIZE,
    ));
    svg.push_str("</svg>");

    let layer = svg_layer(&svg, &fonts.db, width, height)?;
    draw(canvas, &layer, 0, 0);
    Ok(())
}
