//! Geometry shared by the raster and SVG backends.

use crate::color::HexColor;
use crate::config::Surface;
use crate::qr::{QrMatrix, FINDER_SIZE};
use crate::resolve::RenderRequest;
use crate::style::{CornerDotType, CornerSquareType, DotType, FillParams, Gradient, Region};

/// A closed outline in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    /// Rectangle with per-corner radii: top-left, top-right, bottom-right, bottom-left.
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radii: [f64; 4],
    },
    Circle { cx: f64, cy: f64, r: f64 },
}

impl Outline {
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Outline::Rect {
            x,
            y,
            w,
            h,
            radii: [0.0; 4],
        }
    }

    pub fn rounded(x: f64, y: f64, w: f64, h: f64, r: f64) -> Self {
        Outline::Rect {
            x,
            y,
            w,
            h,
            radii: [r; 4],
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        match *self {
            Outline::Circle { cx, cy, r } => {
                let (dx, dy) = (px - cx, py - cy);
                dx * dx + dy * dy <= r * r
            }
            Outline::Rect { x, y, w, h, radii } => {
                if px < x || py < y || px > x + w || py > y + h {
                    return false;
                }
                let [tl, tr, br, bl] = radii;
                let corners = [
                    (tl, x + tl, y + tl, px < x + tl && py < y + tl),
                    (tr, x + w - tr, y + tr, px > x + w - tr && py < y + tr),
                    (br, x + w - br, y + h - br, px > x + w - br && py > y + h - br),
                    (bl, x + bl, y + h - bl, px < x + bl && py > y + h - bl),
                ];
                corners.iter().all(|&(r, cx, cy, in_corner)| {
                    if r <= 0.0 || !in_corner {
                        return true;
                    }
                    let (dx, dy) = (px - cx, py - cy);
                    dx * dx + dy * dy <= r * r
                })
            }
        }
    }

    /// Pixel bounds as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match *self {
            Outline::Circle { cx, cy, r } => (cx - r, cy - r, cx + r, cy + r),
            Outline::Rect { x, y, w, h, .. } => (x, y, x + w, y + h),
        }
    }
}

/// A filled outline, optionally with a hole punched through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub outer: Outline,
    pub hole: Option<Outline>,
}

impl Shape {
    pub fn solid(outer: Outline) -> Self {
        Shape { outer, hole: None }
    }

    pub fn ring(outer: Outline, hole: Outline) -> Self {
        Shape {
            outer,
            hole: Some(hole),
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        self.outer.contains(px, py) && !self.hole.is_some_and(|h| h.contains(px, py))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(HexColor),
    Linear(Gradient),
}

impl From<FillParams> for Paint {
    fn from(fill: FillParams) -> Self {
        match (fill.gradient, fill.color) {
            (Some(gradient), _) => Paint::Linear(gradient),
            (None, Some(color)) => Paint::Solid(color),
            (None, None) => Paint::Solid(HexColor::BLACK),
        }
    }
}

/// Square drawing area of the code inside the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Area {
    /// Endpoints (x1, y1, x2, y2) of a gradient's axis across this area.
    ///
    /// The axis passes through the centre, rotated clockwise from pointing
    /// right, and spans the area's projection so both corners are covered.
    pub fn gradient_axis(&self, gradient: &Gradient) -> (f64, f64, f64, f64) {
        let theta = gradient.radians();
        let (dx, dy) = (theta.cos(), theta.sin());
        let half = self.size / 2.0 * (dx.abs() + dy.abs());
        let (cx, cy) = (self.x + self.size / 2.0, self.y + self.size / 2.0);
        (cx - dx * half, cy - dy * half, cx + dx * half, cy + dy * half)
    }

    pub fn color_at(&self, paint: &Paint, px: f64, py: f64) -> HexColor {
        match paint {
            Paint::Solid(color) => *color,
            Paint::Linear(gradient) => {
                let (x1, y1, x2, y2) = self.gradient_axis(gradient);
                let (ax, ay) = (x2 - x1, y2 - y1);
                let len2 = ax * ax + ay * ay;
                let t = if len2 > 0.0 {
                    ((px - x1) * ax + (py - y1) * ay) / len2
                } else {
                    0.0
                };
                gradient.start.lerp(gradient.end, t)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub region: Region,
    pub paint: Paint,
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogoPlacement {
    pub data_uri: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub background: HexColor,
    pub area: Area,
    pub layers: Vec<Layer>,
    pub logo: Option<LogoPlacement>,
}

/// Centred square of modules reserved for the logo: (first module, count).
fn logo_span(count: usize, image_size: f64) -> Option<(usize, usize)> {
    let mut span = (count as f64 * image_size.clamp(0.0, 1.0)).floor() as usize;
    if (count - span) % 2 == 1 {
        span = span.saturating_sub(1);
    }
    (span > 0).then(|| ((count - span) / 2, span))
}

pub fn build(matrix: &QrMatrix, request: &RenderRequest, surface: &Surface) -> Layout {
    let count = matrix.width();
    let side = f64::from(surface.width.min(surface.height));
    let margin = f64::from(request.margin);
    let dot = ((side - 2.0 * margin) / count as f64).floor().max(1.0);
    let qr_size = dot * count as f64;

    let area = Area {
        x: ((f64::from(surface.width) - qr_size) / 2.0).floor(),
        y: ((f64::from(surface.height) - qr_size) / 2.0).floor(),
        size: qr_size,
    };
    let origin = |row: usize, col: usize| (area.x + col as f64 * dot, area.y + row as f64 * dot);

    let mut logo = None;
    let mut hidden: Option<(usize, usize)> = None;
    if let Some(uri) = &request.image {
        if let Some((start, span)) = logo_span(count, request.image_options.image_size) {
            let inset = f64::from(request.image_options.margin);
            let (x, y) = origin(start, start);
            let size = span as f64 * dot - 2.0 * inset;
            if size > 0.0 {
                logo = Some(LogoPlacement {
                    data_uri: uri.clone(),
                    x: x + inset,
                    y: y + inset,
                    size,
                });
                if request.image_options.hide_background_dots {
                    hidden = Some((start, start + span));
                }
            }
        }
    }
    let is_hidden = |row: usize, col: usize| {
        hidden.is_some_and(|(lo, hi)| row >= lo && row < hi && col >= lo && col < hi)
    };

    let mut modules = Vec::new();
    for row in 0..count {
        for col in 0..count {
            let (r, c) = (row as isize, col as isize);
            if !matrix.is_dark(r, c) || matrix.in_finder(row, col) || is_hidden(row, col) {
                continue;
            }
            let (x, y) = origin(row, col);
            let outline = match request.dots_options.kind {
                DotType::Square => Outline::rect(x, y, dot, dot),
                DotType::Dots => Outline::Circle {
                    cx: x + dot / 2.0,
                    cy: y + dot / 2.0,
                    r: dot / 2.0,
                },
                DotType::Rounded => {
                    let up = matrix.is_dark(r - 1, c);
                    let down = matrix.is_dark(r + 1, c);
                    let left = matrix.is_dark(r, c - 1);
                    let right = matrix.is_dark(r, c + 1);
                    let round = |a: bool, b: bool| if a || b { 0.0 } else { dot / 2.0 };
                    Outline::Rect {
                        x,
                        y,
                        w: dot,
                        h: dot,
                        radii: [
                            round(up, left),
                            round(up, right),
                            round(down, right),
                            round(down, left),
                        ],
                    }
                }
            };
            modules.push(Shape::solid(outline));
        }
    }

    let mut frames = Vec::new();
    let mut balls = Vec::new();
    let finder = FINDER_SIZE as f64 * dot;
    for (row, col) in matrix.finder_origins() {
        let (x, y) = origin(row, col);
        let (cx, cy) = (x + finder / 2.0, y + finder / 2.0);

        frames.push(match request.corners_square_options.kind {
            CornerSquareType::Square => Shape::ring(
                Outline::rect(x, y, finder, finder),
                Outline::rect(x + dot, y + dot, finder - 2.0 * dot, finder - 2.0 * dot),
            ),
            CornerSquareType::Dot => Shape::ring(
                Outline::Circle {
                    cx,
                    cy,
                    r: finder / 2.0,
                },
                Outline::Circle {
                    cx,
                    cy,
                    r: finder / 2.0 - dot,
                },
            ),
            CornerSquareType::ExtraRounded => Shape::ring(
                Outline::rounded(x, y, finder, finder, 2.5 * dot),
                Outline::rounded(
                    x + dot,
                    y + dot,
                    finder - 2.0 * dot,
                    finder - 2.0 * dot,
                    1.5 * dot,
                ),
            ),
        });

        let ball = 3.0 * dot;
        balls.push(Shape::solid(match request.corners_dot_options.kind {
            CornerDotType::Square => Outline::rect(x + 2.0 * dot, y + 2.0 * dot, ball, ball),
            CornerDotType::Dot => Outline::Circle {
                cx,
                cy,
                r: ball / 2.0,
            },
        }));
    }

    Layout {
        width: surface.width,
        height: surface.height,
        background: request.background_options.color,
        area,
        layers: vec![
            Layer {
                region: Region::Modules,
                paint: request.dots_options.fill().into(),
                shapes: modules,
            },
            Layer {
                region: Region::EyeFrame,
                paint: request.corners_square_options.fill().into(),
                shapes: frames,
            },
            Layer {
                region: Region::EyeBall,
                paint: request.corners_dot_options.fill().into(),
                shapes: balls,
            },
        ],
        logo,
    }
}
