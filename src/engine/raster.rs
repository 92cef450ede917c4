//! Pixel backend: rasterizes the SVG rendering of a [`Layout`].
//!
//! Going through the vector document keeps PNG and SVG exports identical,
//! including anti-aliased shapes and logos of any supported format.

use image::{Rgba, RgbaImage};

use super::layout::Layout;
use super::svg;
use crate::error::{QrError, QrResult};

fn rasterize_svg(svg_string: &str, width: u32, height: u32) -> QrResult<tiny_skia::Pixmap> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_string, &opt)
        .map_err(|e| QrError::Export(format!("SVG parsing failed: {e}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| QrError::Export(format!("Failed to create {width}x{height} pixmap")))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(pixmap)
}

/// Render `layout`, logo included, into an RGBA buffer.
pub fn rasterize(layout: &Layout) -> QrResult<RgbaImage> {
    let pixmap = rasterize_svg(&svg::render(layout), layout.width, layout.height)?;

    let mut frame = RgbaImage::new(layout.width, layout.height);
    for (dst, src) in frame.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(frame)
}
