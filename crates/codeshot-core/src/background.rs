use log::debug;
use std::fmt::Write as _;
use std::sync::Arc;
use tiny_skia::{Color, Pixmap};
use usvg::fontdb::Database;

use crate::options::{is_hex_color, named_background, NEUTRAL_BACKGROUND};
use crate::raster::{new_pixmap, svg_layer};
use crate::svg::{blur_filter, open_svg};
use crate::{Result, GLOW_COLOR};

const NEON_PREFIX: &str = "neon-";
const NEON_GRID_SPACING: u32 = 50;
const NEON_GRID_BLUR: f32 = 2.0;

/// Canvas-sized background for a background name.
pub(crate) fn build_background(
    name: &str,
    width: u32,
    height: u32,
    fontdb: &Arc<Database>,
) -> Result<Pixmap> {
    if name == "transparent" {
        return new_pixmap(width, height);
    }
    if name.starts_with(NEON_PREFIX) {
        return neon_grid(width, height, fontdb);
    }

    let hex = if let Some(hex) = named_background(name) {
        hex
    } else if is_hex_color(name) {
        name
    } else {
        debug!("unknown background '{name}', using neutral fill");
        NEUTRAL_BACKGROUND
    };
    let mut pixmap = new_pixmap(width, height)?;
    pixmap.fill(parse_hex_color(hex).unwrap_or(Color::BLACK));
    Ok(pixmap)
}

fn neon_grid(width: u32, height: u32, fontdb: &Arc<Database>) -> Result<Pixmap> {
    let mut svg = open_svg(width, height);
    svg.push_str(&blur_filter("grid-blur", NEON_GRID_BLUR, width, height));
    let _ = write!(
        svg,
        r#"<rect x="0" y="0" width="{width}" height="{height}" fill="black"/><g filter="url(#grid-blur)" stroke="{GLOW_COLOR}" stroke-width="1">"#
    );
    for x in (0..width).step_by(NEON_GRID_SPACING as usize) {
        let _ = write!(svg, r#"<line x1="{x}" y1="0" x2="{x}" y2="{height}"/>"#);
    }
    for y in (0..height).step_by(NEON_GRID_SPACING as usize) {
        let _ = write!(svg, r#"<line x1="0" y1="{y}" x2="{width}" y2="{y}"/>"#);
    }
    svg.push_str("</g></svg>");
    svg_layer(&svg, fontdb, width, height)
}

/// Parses `#rgb` or `#rrggbb`.
pub(crate) fn parse_hex_color(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let (r, g, b) = match digits.len() {
        3 => {
            let mut parts = digits.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
            (parts.next()??, parts.next()??, parts.next()??)
        }
        6 => (
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
        ),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, 255))
}
