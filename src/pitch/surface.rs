//! Blank pitch surfaces

use image::Rgba;
use serde::{Deserialize, Serialize};

use super::dimensions::{PitchDimensions, PitchType};
use crate::color::{darken, parse_color};
use crate::error::Result;
use crate::figure::{Figure, MarkerShape, Panel, PanelRect, Point, Primitive};

/// Name of the panel holding the pitch in every pitch figure
pub const PITCH_PANEL: &str = "pitch";

const STRIPE_COUNT: usize = 12;
const LINE_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    pub field_color: String,
    pub line_color: String,
    pub stripes: bool,
    pub pitch_type: PitchType,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            field_color: "grass".to_string(),
            line_color: "white".to_string(),
            stripes: true,
            pitch_type: PitchType::StatsBomb,
        }
    }
}

impl PitchConfig {
    pub fn field_rgba(&self) -> Result<Rgba<u8>> {
        parse_color(&self.field_color)
    }

    pub fn line_rgba(&self) -> Result<Rgba<u8>> {
        parse_color(&self.line_color)
    }
}

/// Largest rect with the given on-screen aspect (width / height) that fits
/// a `width` x `height` figure, centered.
pub fn fit_rect(width: u32, height: u32, aspect: f64) -> PanelRect {
    let fig_aspect = width as f64 / height as f64;
    if fig_aspect > aspect {
        let w = (aspect / fig_aspect) as f32;
        PanelRect {
            left: (1.0 - w) / 2.0,
            top: 0.0,
            width: w,
            height: 1.0,
        }
    } else {
        let h = (fig_aspect / aspect) as f32;
        PanelRect {
            left: 0.0,
            top: (1.0 - h) / 2.0,
            width: 1.0,
            height: h,
        }
    }
}

/// On-screen aspect of the pitch including its padding
pub fn screen_aspect(dims: &PitchDimensions) -> f64 {
    let (pad_x, pad_y) = dims.padding();
    dims.visual_aspect * ((dims.length + 2.0 * pad_x) / dims.length)
        / ((dims.width + 2.0 * pad_y) / dims.width)
}

/// Pitch panel with stripes and markings, placed at `rect`.
pub fn pitch_panel(config: &PitchConfig, rect: PanelRect) -> Result<Panel> {
    let field = config.field_rgba()?;
    let line = config.line_rgba()?;
    let dims = config.pitch_type.dimensions();
    let (pad_x, pad_y) = dims.padding();

    let mut panel = Panel::new(
        PITCH_PANEL,
        rect,
        (-pad_x, dims.length + pad_x),
        (-pad_y, dims.width + pad_y),
    );
    panel.y_down = dims.y_down;

    if config.stripes {
        let stripe = darken(field, 0.08);
        let band = dims.length / STRIPE_COUNT as f64;
        for i in (1..STRIPE_COUNT).step_by(2) {
            let x0 = band * i as f64;
            panel.push(Primitive::Polygon {
                points: vec![
                    Point::new(x0, 0.0),
                    Point::new(x0 + band, 0.0),
                    Point::new(x0 + band, dims.width),
                    Point::new(x0, dims.width),
                ],
                fill: Some(stripe),
                edge: None,
                edge_width: 0.0,
            });
        }
    }

    for primitive in markings(&dims, line) {
        panel.push(primitive);
    }
    Ok(panel)
}

/// Blank pitch figure of the given pixel size.
pub fn pitch_figure(config: &PitchConfig, width: u32, height: u32, name: &str) -> Result<Figure> {
    let field = config.field_rgba()?;
    let dims = config.pitch_type.dimensions();
    let mut figure = Figure::new(name, width, height, field);
    let rect = fit_rect(width, height, screen_aspect(&dims));
    figure.panels.push(pitch_panel(config, rect)?);
    Ok(figure)
}

fn markings(dims: &PitchDimensions, color: Rgba<u8>) -> Vec<Primitive> {
    let outline = |points: Vec<Point>| Primitive::Polygon {
        points,
        fill: None,
        edge: Some(color),
        edge_width: LINE_WIDTH,
    };
    let polyline = |points: Vec<Point>| Primitive::Polyline {
        points,
        color,
        width: LINE_WIDTH,
    };
    let spot = |at: Point| Primitive::Marker {
        at,
        shape: MarkerShape::Circle,
        size: 4.0,
        fill: color,
        edge: color,
    };

    let penalty_box = dims.left_box(dims.penalty_box_length, dims.penalty_box_y);
    let six_yard_box = dims.left_box(dims.six_yard_length, dims.six_yard_y);
    let arc = dims.left_penalty_arc();
    let goal = dims.left_goal();
    let mid = dims.width / 2.0;

    vec![
        outline(vec![
            Point::new(0.0, 0.0),
            Point::new(dims.length, 0.0),
            Point::new(dims.length, dims.width),
            Point::new(0.0, dims.width),
        ]),
        Primitive::Line {
            from: Point::new(dims.length / 2.0, 0.0),
            to: Point::new(dims.length / 2.0, dims.width),
            color,
            width: LINE_WIDTH,
        },
        polyline(dims.center_circle()),
        spot(dims.center()),
        polyline(penalty_box.clone()),
        polyline(dims.mirror(&penalty_box)),
        polyline(six_yard_box.clone()),
        polyline(dims.mirror(&six_yard_box)),
        spot(Point::new(dims.penalty_spot, mid)),
        spot(Point::new(dims.length - dims.penalty_spot, mid)),
        polyline(arc.clone()),
        polyline(dims.mirror(&arc)),
        polyline(goal.clone()),
        polyline(dims.mirror(&goal)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VizError;

    #[test]
    fn fit_rect_centers_along_the_slack_axis() {
        let wide = fit_rect(200, 100, 1.0);
        assert_eq!(wide.width, 0.5);
        assert_eq!(wide.left, 0.25);
        assert_eq!(wide.height, 1.0);

        let tall = fit_rect(100, 200, 1.0);
        assert_eq!(tall.height, 0.5);
        assert_eq!(tall.top, 0.25);
    }

    #[test]
    fn stripes_toggle_band_polygons() {
        let mut config = PitchConfig::default();
        let striped = pitch_panel(&config, PanelRect::FULL).unwrap();
        config.stripes = false;
        let plain = pitch_panel(&config, PanelRect::FULL).unwrap();

        let fills = |p: &Panel| {
            p.primitives
                .iter()
                .filter(|prim| matches!(prim, Primitive::Polygon { fill: Some(_), .. }))
                .count()
        };
        assert_eq!(fills(&striped), STRIPE_COUNT / 2);
        assert_eq!(fills(&plain), 0);
    }

    #[test]
    fn figure_uses_field_color_as_background() {
        let config = PitchConfig {
            field_color: "#102030".into(),
            ..PitchConfig::default()
        };
        let figure = pitch_figure(&config, 600, 400, "blank").unwrap();
        assert_eq!(figure.background, Rgba([16, 32, 48, 255]));
        assert!(figure.panel(PITCH_PANEL).unwrap().y_down);
    }

    #[test]
    fn invalid_line_color_is_rejected() {
        let config = PitchConfig {
            line_color: "chartreuse-ish".into(),
            ..PitchConfig::default()
        };
        assert!(matches!(
            pitch_figure(&config, 600, 400, "blank"),
            Err(VizError::InvalidColor(_))
        ));
    }
}
