//! Vector backend: writes a [`Layout`] as an SVG document.

use std::fmt::Write;

use super::layout::{Layout, Outline, Paint};
use crate::color::HexColor;

/// Round to two decimals so coordinates stay short.
fn num(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn push_outline(d: &mut String, outline: &Outline) {
    match *outline {
        Outline::Circle { cx, cy, r } => {
            let _ = write!(
                d,
                "M{},{}a{r},{r} 0 1,0 {},0a{r},{r} 0 1,0 {},0z",
                num(cx - r),
                num(cy),
                num(2.0 * r),
                num(-2.0 * r),
                r = num(r),
            );
        }
        Outline::Rect { x, y, w, h, radii } => {
            let [tl, tr, br, bl] = radii.map(num);
            let (x, y, w, h) = (num(x), num(y), num(w), num(h));
            let arc = |d: &mut String, r: f64, ex: f64, ey: f64| {
                if r > 0.0 {
                    let _ = write!(d, "A{r},{r} 0 0,1 {},{}", num(ex), num(ey));
                }
            };
            let _ = write!(d, "M{},{}H{}", num(x + tl), y, num(x + w - tr));
            arc(d, tr, x + w, y + tr);
            let _ = write!(d, "V{}", num(y + h - br));
            arc(d, br, x + w - br, y + h);
            let _ = write!(d, "H{}", num(x + bl));
            arc(d, bl, x, y + h - bl);
            let _ = write!(d, "V{}", num(y + tl));
            arc(d, tl, x + tl, y);
            d.push('z');
        }
    }
}

fn fill_attrs(color: HexColor) -> String {
    if color.a == 0xff {
        format!("fill=\"{}\"", color.to_rgb_hex())
    } else {
        format!(
            "fill=\"{}\" fill-opacity=\"{}\"",
            color.to_rgb_hex(),
            num(color.opacity())
        )
    }
}

/// Render `layout` as a standalone SVG document.
pub fn render(layout: &Layout) -> String {
    let mut svg = String::with_capacity(8192);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = layout.width,
        h = layout.height,
    );

    let mut defs = String::new();
    for layer in &layout.layers {
        if let Paint::Linear(gradient) = &layer.paint {
            let (x1, y1, x2, y2) = layout.area.gradient_axis(gradient);
            let _ = write!(
                defs,
                "<linearGradient id=\"gradient-{region}\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\">\
                 <stop offset=\"0\" stop-color=\"{}\" stop-opacity=\"{}\"/>\
                 <stop offset=\"1\" stop-color=\"{}\" stop-opacity=\"{}\"/></linearGradient>",
                num(x1),
                num(y1),
                num(x2),
                num(y2),
                gradient.start.to_rgb_hex(),
                num(gradient.start.opacity()),
                gradient.end.to_rgb_hex(),
                num(gradient.end.opacity()),
                region = layer.region,
            );
        }
    }
    if !defs.is_empty() {
        let _ = write!(svg, "<defs>{}</defs>", defs);
    }

    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" {}/>",
        fill_attrs(layout.background)
    );

    for layer in &layout.layers {
        if layer.shapes.is_empty() {
            continue;
        }
        let fill = match &layer.paint {
            Paint::Solid(color) => fill_attrs(*color),
            Paint::Linear(_) => format!("fill=\"url(#gradient-{})\"", layer.region),
        };

        let mut d = String::new();
        for shape in &layer.shapes {
            push_outline(&mut d, &shape.outer);
            if let Some(hole) = &shape.hole {
                push_outline(&mut d, hole);
            }
        }
        let _ = write!(
            svg,
            "<path class=\"{}\" fill-rule=\"evenodd\" {} d=\"{}\"/>",
            layer.region, fill, d
        );
    }

    if let Some(logo) = &layout.logo {
        let href = escape_xml(&logo.data_uri);
        let _ = write!(
            svg,
            "<image x=\"{x}\" y=\"{y}\" width=\"{s}\" height=\"{s}\" preserveAspectRatio=\"xMidYMid meet\" href=\"{href}\" xlink:href=\"{href}\"/>",
            x = num(logo.x),
            y = num(logo.y),
            s = num(logo.size),
        );
    }

    svg.push_str("</svg>");
    svg
}
