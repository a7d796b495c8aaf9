//! Pixmap helpers shared by the renderer, the background builder and the
//! effect stages. Pixmaps stay premultiplied throughout; resampling and
//! blurring operate on premultiplied channels and re-clamp color to alpha.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::sync::Arc;
use tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};
use usvg::fontdb::Database;

use crate::{Error, Result};

pub(crate) fn new_pixmap(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| Error::Render(format!("invalid pixmap size {width}x{height}")))
}

/// Renders `svg` into a `width` x `height` pixmap, scaling user units by `scale`.
pub(crate) fn rasterize_svg(
    svg: &str,
    fontdb: &Arc<Database>,
    width: u32,
    height: u32,
    scale: f32,
) -> Result<Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::clone(fontdb);
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|err| Error::Render(format!("usvg parse: {err}")))?;

    let mut pixmap = new_pixmap(width, height)?;
    let transform = if (scale - 1.0).abs() < f32::EPSILON {
        Transform::identity()
    } else {
        Transform::from_scale(scale, scale)
    };
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Rasterizes a canvas-sized vector layer.
pub(crate) fn svg_layer(svg: &str, fontdb: &Arc<Database>, width: u32, height: u32) -> Result<Pixmap> {
    rasterize_svg(svg, fontdb, width, height, 1.0)
}

/// Source-over composite of `src` onto `dst` at (`x`, `y`).
pub(crate) fn draw(dst: &mut Pixmap, src: &Pixmap, x: i32, y: i32) {
    dst.draw_pixmap(x, y, src.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
}

pub(crate) fn to_image(pixmap: &Pixmap) -> Result<RgbaImage> {
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.data().to_vec())
        .ok_or_else(|| Error::Render("pixmap buffer size mismatch".to_string()))
}

pub(crate) fn from_image(image: RgbaImage) -> Result<Pixmap> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| Error::Render(format!("invalid pixmap size {width}x{height}")))?;
    let mut data = image.into_raw();
    clamp_premultiplied(&mut data);
    Pixmap::from_vec(data, size).ok_or_else(|| Error::Render("pixmap from buffer".to_string()))
}

/// Lanczos resample to exactly `width` x `height`.
pub(crate) fn resample(pixmap: &Pixmap, width: u32, height: u32) -> Result<Pixmap> {
    if pixmap.width() == width && pixmap.height() == height {
        return Ok(pixmap.clone());
    }
    let image = to_image(pixmap)?;
    from_image(imageops::resize(&image, width, height, FilterType::Lanczos3))
}

pub(crate) fn blur(pixmap: &Pixmap, sigma: f32) -> Result<Pixmap> {
    let image = to_image(pixmap)?;
    from_image(imageops::fast_blur(&image, sigma))
}

/// Multiplies every channel by the matching coverage value.
pub(crate) fn apply_coverage(pixmap: &mut Pixmap, coverage: &[u8]) -> Result<()> {
    let data = pixmap.data_mut();
    if data.len() != coverage.len() * 4 {
        return Err(Error::Render("coverage size mismatch".to_string()));
    }
    for (pixel, &cov) in data.chunks_exact_mut(4).zip(coverage) {
        if cov == 255 {
            continue;
        }
        for channel in pixel.iter_mut() {
            *channel = ((*channel as u16 * cov as u16 + 127) / 255) as u8;
        }
    }
    Ok(())
}

/// Alpha channel of `pixmap`, one byte per pixel.
pub(crate) fn alpha_channel(pixmap: &Pixmap) -> Vec<u8> {
    pixmap.data().chunks_exact(4).map(|px| px[3]).collect()
}

fn clamp_premultiplied(data: &mut [u8]) {
    for pixel in data.chunks_exact_mut(4) {
        let a = pixel[3];
        for channel in &mut pixel[..3] {
            if *channel > a {
                *channel = a;
            }
        }
    }
}

pub(crate) fn unpremultiply_rgba(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as u16;
        if a == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let r = ((chunk[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        let g = ((chunk[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        let b = ((chunk[2] as u16 * 255 + a / 2) / a).min(255) as u8;
        out.extend_from_slice(&[r, g, b, chunk[3]]);
    }
    out
}
