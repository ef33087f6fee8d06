//! Figure rasterizer built on imageproc
//!
//! All drawing goes through `Blend` so translucent fills composite over what
//! is already on the canvas.

use ab_glyph::PxScale;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    Blend, Canvas, draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_circle_mut,
    draw_line_segment_mut, draw_polygon_mut, draw_text_mut, text_size,
};
use imageproc::point::Point as PixelPoint;
use imageproc::rect::Rect;

use crate::color::{BLACK, WHITE};
use crate::error::{Result, VizError};
use crate::figure::{Figure, HAlign, MarkerShape, Panel, Point, Primitive, VAlign};
use crate::fonts::Fonts;

/// Segments used to draw a comet line
const COMET_SEGMENTS: usize = 24;
/// Pixel coordinates are clamped to this many canvas sizes around the origin
/// so imageproc's integer arithmetic cannot overflow.
const PIXEL_LIMIT_FACTOR: f32 = 4.0;

/// Maps one panel's data coordinates onto figure pixels.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    x0: f32,
    y0: f32,
    w: f32,
    h: f32,
    x_range: (f64, f64),
    y_range: (f64, f64),
    y_down: bool,
    limit: f32,
}

impl Transform {
    pub fn new(panel: &Panel, width: u32, height: u32) -> Self {
        Self {
            x0: panel.rect.left * width as f32,
            y0: panel.rect.top * height as f32,
            w: panel.rect.width * width as f32,
            h: panel.rect.height * height as f32,
            x_range: panel.x_range,
            y_range: panel.y_range,
            y_down: panel.y_down,
            limit: pixel_limit(width, height),
        }
    }

    pub fn to_px(&self, p: Point) -> (f32, f32) {
        let fx = (p.x - self.x_range.0) / (self.x_range.1 - self.x_range.0);
        let fy = (p.y - self.y_range.0) / (self.y_range.1 - self.y_range.0);
        let fy = if self.y_down { fy } else { 1.0 - fy };
        (
            clamp_px(self.x0 + fx as f32 * self.w, self.limit),
            clamp_px(self.y0 + fy as f32 * self.h, self.limit),
        )
    }

    /// Pixels per data unit along x
    pub fn scale_x(&self) -> f32 {
        self.w / (self.x_range.1 - self.x_range.0) as f32
    }
}

/// Rasterize a figure. `fonts` is only needed when the figure contains text.
pub fn rasterize(figure: &Figure, fonts: Option<&Fonts>) -> Result<RgbaImage> {
    if figure.width == 0 || figure.height == 0 {
        return Err(VizError::Render(format!(
            "figure '{}' has zero size",
            figure.name
        )));
    }
    if figure.has_text() && fonts.is_none() {
        return Err(VizError::Font(
            "figure contains text but no fonts are installed; call fonts::init first".into(),
        ));
    }

    let mut canvas = Blend(RgbaImage::from_pixel(
        figure.width,
        figure.height,
        figure.background,
    ));
    let pt = figure.dpi / 72.0;

    for panel in &figure.panels {
        let t = Transform::new(panel, figure.width, figure.height);
        for primitive in &panel.primitives {
            draw_primitive(&mut canvas, &t, pt, primitive, fonts)?;
        }
    }

    Ok(canvas.0)
}

fn draw_primitive(
    canvas: &mut Blend<RgbaImage>,
    t: &Transform,
    pt: f32,
    primitive: &Primitive,
    fonts: Option<&Fonts>,
) -> Result<()> {
    match primitive {
        Primitive::Line {
            from,
            to,
            color,
            width,
        } => thick_segment(canvas, t.to_px(*from), t.to_px(*to), width * pt, *color),
        Primitive::Polyline {
            points,
            color,
            width,
        } => {
            for pair in points.windows(2) {
                thick_segment(canvas, t.to_px(pair[0]), t.to_px(pair[1]), width * pt, *color);
            }
        }
        Primitive::Arrow {
            from,
            to,
            color,
            width,
        } => draw_arrow(canvas, t.to_px(*from), t.to_px(*to), width * pt, *color),
        Primitive::Comet {
            from,
            to,
            color,
            width,
        } => draw_comet(canvas, t.to_px(*from), t.to_px(*to), width * pt, *color),
        Primitive::Polygon {
            points,
            fill,
            edge,
            edge_width,
        } => {
            let px: Vec<(f32, f32)> = points.iter().map(|p| t.to_px(*p)).collect();
            if let Some(fill) = fill {
                fill_polygon(canvas, &px, *fill);
            }
            if let Some(edge) = edge {
                for i in 0..px.len() {
                    let next = px[(i + 1) % px.len()];
                    thick_segment(canvas, px[i], next, edge_width * pt, *edge);
                }
            }
        }
        Primitive::Circle {
            center,
            radius,
            fill,
            edge,
        } => {
            let (cx, cy) = t.to_px(*center);
            let r = clamp_px(*radius as f32 * t.scale_x(), t.limit).round() as i32;
            let c = (cx.round() as i32, cy.round() as i32);
            if let Some(fill) = fill {
                draw_filled_circle_mut(canvas, c, r, *fill);
            }
            if let Some(edge) = edge {
                draw_hollow_circle_mut(canvas, c, r, *edge);
            }
        }
        Primitive::Marker {
            at,
            shape,
            size,
            fill,
            edge,
        } => draw_marker(canvas, t.to_px(*at), *shape, size * pt, *fill, *edge),
        Primitive::Text {
            at,
            text,
            size,
            color,
            weight,
            h_align,
            v_align,
        } => {
            let fonts = fonts.ok_or_else(|| VizError::Font("fonts are not installed".into()))?;
            let font = fonts.face(*weight);
            let scale = PxScale::from(size * pt);
            let (tw, th) = text_size(scale, font, text);
            let (x, y) = t.to_px(*at);
            let x = match h_align {
                HAlign::Left => x,
                HAlign::Center => x - tw as f32 / 2.0,
                HAlign::Right => x - tw as f32,
            };
            let y = match v_align {
                VAlign::Top => y,
                VAlign::Center => y - th as f32 / 2.0,
                VAlign::Bottom => y - th as f32,
            };
            draw_text_mut(
                canvas,
                *color,
                x.round() as i32,
                y.round() as i32,
                scale,
                font,
                text,
            );
        }
        Primitive::Raster {
            extent,
            cols,
            rows,
            cells,
        } => {
            if cells.len() != cols * rows {
                return Err(VizError::Render(format!(
                    "raster has {} cells, expected {}x{}",
                    cells.len(),
                    cols,
                    rows
                )));
            }
            let dx = extent.width() / *cols as f64;
            let dy = extent.height() / *rows as f64;
            for row in 0..*rows {
                for col in 0..*cols {
                    let Some(color) = cells[row * cols + col] else {
                        continue;
                    };
                    let a = t.to_px(Point::new(
                        extent.x_min + col as f64 * dx,
                        extent.y_min + row as f64 * dy,
                    ));
                    let b = t.to_px(Point::new(
                        extent.x_min + (col + 1) as f64 * dx,
                        extent.y_min + (row + 1) as f64 * dy,
                    ));
                    let left = a.0.min(b.0).floor() as i32;
                    let top = a.1.min(b.1).floor() as i32;
                    let w = (a.0.max(b.0).ceil() as i32 - left).max(1) as u32;
                    let h = (a.1.max(b.1).ceil() as i32 - top).max(1) as u32;
                    draw_filled_rect_mut(canvas, Rect::at(left, top).of_size(w, h), color);
                }
            }
        }
    }
    Ok(())
}

fn pixel_limit(width: u32, height: u32) -> f32 {
    PIXEL_LIMIT_FACTOR * width.max(height) as f32
}

/// NaN maps to 0.
fn clamp_px(v: f32, limit: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-limit, limit) }
}

fn thick_segment<C>(canvas: &mut C, a: (f32, f32), b: (f32, f32), width: f32, color: Rgba<u8>)
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    if width <= 1.5 {
        draw_line_segment_mut(canvas, a, b, color);
        return;
    }
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 0.5 {
        return;
    }
    let half = width / 2.0;
    let (nx, ny) = (-dy / len * half, dx / len * half);
    let quad = [
        (a.0 + nx, a.1 + ny),
        (b.0 + nx, b.1 + ny),
        (b.0 - nx, b.1 - ny),
        (a.0 - nx, a.1 - ny),
    ];
    fill_polygon(canvas, &quad, color);
}

/// Fill a polygon given in pixel coordinates. Degenerate polygons are skipped.
fn fill_polygon<C>(canvas: &mut C, points: &[(f32, f32)], color: Rgba<u8>)
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    let (width, height) = canvas.dimensions();
    let limit = pixel_limit(width, height);
    let mut poly: Vec<PixelPoint<i32>> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let p = PixelPoint::new(
            clamp_px(x, limit).round() as i32,
            clamp_px(y, limit).round() as i32,
        );
        if poly.last() != Some(&p) {
            poly.push(p);
        }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() < 3 {
        return;
    }
    draw_polygon_mut(canvas, &poly, color);
}

fn draw_arrow(canvas: &mut Blend<RgbaImage>, a: (f32, f32), b: (f32, f32), width: f32, color: Rgba<u8>) {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    let head_len = (width * 4.0).max(8.0).min(len);
    let head_half = head_len * 0.6;
    let base = (b.0 - ux * head_len, b.1 - uy * head_len);

    thick_segment(canvas, a, base, width, color);
    let head = [
        b,
        (base.0 - uy * head_half, base.1 + ux * head_half),
        (base.0 + uy * head_half, base.1 - ux * head_half),
    ];
    fill_polygon(canvas, &head, color);
}

fn draw_comet(canvas: &mut Blend<RgbaImage>, a: (f32, f32), b: (f32, f32), width: f32, color: Rgba<u8>) {
    for k in 0..COMET_SEGMENTS {
        let t0 = k as f32 / COMET_SEGMENTS as f32;
        let t1 = (k + 1) as f32 / COMET_SEGMENTS as f32;
        let p0 = (a.0 + (b.0 - a.0) * t0, a.1 + (b.1 - a.1) * t0);
        let p1 = (a.0 + (b.0 - a.0) * t1, a.1 + (b.1 - a.1) * t1);
        let Rgba([r, g, bl, alpha]) = color;
        let faded = Rgba([r, g, bl, (alpha as f32 * t1).round() as u8]);
        thick_segment(canvas, p0, p1, (width * t1).max(1.0), faded);
    }
}

fn draw_marker(
    canvas: &mut Blend<RgbaImage>,
    at: (f32, f32),
    shape: MarkerShape,
    size: f32,
    fill: Rgba<u8>,
    edge: Rgba<u8>,
) {
    let r = (size / 2.0).max(1.0);
    let center = (at.0.round() as i32, at.1.round() as i32);
    match shape {
        MarkerShape::Circle => {
            draw_filled_circle_mut(canvas, center, r.round() as i32, fill);
            draw_hollow_circle_mut(canvas, center, r.round() as i32, edge);
        }
        MarkerShape::Triangle { rotation_degrees } => {
            let (sin, cos) = (rotation_degrees as f32).to_radians().sin_cos();
            // Screen y points down, so a positive angle turns clockwise.
            let rotate = |x: f32, y: f32| (at.0 + x * cos - y * sin, at.1 + x * sin + y * cos);
            let tri = [
                rotate(r, 0.0),
                rotate(-r * 0.5, r * 0.866),
                rotate(-r * 0.5, -r * 0.866),
            ];
            fill_polygon(canvas, &tri, fill);
            for i in 0..3 {
                draw_line_segment_mut(canvas, tri[i], tri[(i + 1) % 3], edge);
            }
        }
        MarkerShape::Football => {
            draw_filled_circle_mut(canvas, center, r.round() as i32, WHITE);
            let patch: Vec<(f32, f32)> = (0..5)
                .map(|i| {
                    let a = (-90.0 + 72.0 * i as f32).to_radians();
                    (at.0 + a.cos() * r * 0.4, at.1 + a.sin() * r * 0.4)
                })
                .collect();
            fill_polygon(canvas, &patch, BLACK);
            for (x, y) in &patch {
                let outer = (at.0 + (x - at.0) * 2.4, at.1 + (y - at.1) * 2.4);
                draw_line_segment_mut(canvas, (*x, *y), outer, BLACK);
            }
            draw_hollow_circle_mut(canvas, center, r.round() as i32, BLACK);
        }
    }
}
