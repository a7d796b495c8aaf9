use crate::raster::unpremultiply_rgba;
use crate::{Error, PngOptions, PngStrip, Result, MAX_PNG_OPT_LEVEL};
use tiny_skia::Pixmap;

/// Encodes the finished canvas. Transparent output keeps its alpha channel;
/// everything else is flattened over white into an RGB image.
pub(crate) fn encode_canvas(pixmap: &Pixmap, keep_alpha: bool, config: &PngOptions) -> Result<Vec<u8>> {
    let (color, data) = if keep_alpha {
        (png::ColorType::Rgba, unpremultiply_rgba(pixmap.data()))
    } else {
        (png::ColorType::Rgb, flatten_over_white(pixmap.data()))
    };
    let png = encode_png(&data, pixmap.width(), pixmap.height(), color)?;
    optimize_png(png, config)
}

/// Source-over onto opaque white, for premultiplied input: `c + 255 - a`.
pub(crate) fn flatten_over_white(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 4 * 3);
    for chunk in data.chunks_exact(4) {
        let inv = 255 - chunk[3];
        out.extend_from_slice(&[
            chunk[0].saturating_add(inv),
            chunk[1].saturating_add(inv),
            chunk[2].saturating_add(inv),
        ]);
    }
    out
}

fn encode_png(data: &[u8], width: u32, height: u32, color: png::ColorType) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|err| Error::Render(format!("png encode: {err}")))?;
    writer
        .write_image_data(data)
        .map_err(|err| Error::Render(format!("png encode: {err}")))?;
    drop(writer);
    Ok(out)
}

pub(crate) fn optimize_png(png: Vec<u8>, config: &PngOptions) -> Result<Vec<u8>> {
    if !config.optimize {
        return Ok(png);
    }
    let level = config.level.min(MAX_PNG_OPT_LEVEL);
    let mut options = oxipng::Options::from_preset(level);
    options.strip = match config.strip {
        PngStrip::None => oxipng::StripChunks::None,
        PngStrip::Safe => oxipng::StripChunks::Safe,
        PngStrip::All => oxipng::StripChunks::All,
    };
    oxipng::optimize_from_memory(&png, &options)
        .map_err(|err| Error::Render(format!("png optimize: {err}")))
}
