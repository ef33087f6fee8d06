use image::Rgba;
use std::fmt;
use tracing::{debug, info};

use super::dataset::RadarDataset;
use super::geometry::{NUM_RINGS, RadarGeometry};
use crate::color::{WHITE, parse_color, with_alpha};
use crate::error::Result;
use crate::figure::{
    Figure, FontWeight, HAlign, MarkerShape, Panel, PanelRect, Point, Primitive, VAlign,
};
use crate::render::FigureSink;

const FIGURE_WIDTH: u32 = 760;
const FIGURE_HEIGHT: u32 = 800;
const TITLE_HEIGHT: f32 = 0.06;
const RADAR_HEIGHT: f32 = 0.915;
pub const TITLE_PANEL: &str = "title";
pub const RADAR_PANEL: &str = "radar";

const RING_FILL: Rgba<u8> = Rgba([0xE0, 0xE0, 0xE0, 255]);
const RING_EDGE: Rgba<u8> = Rgba([0xBD, 0xBD, 0xBD, 255]);
const LABEL_COLOR: Rgba<u8> = Rgba([0x3D, 0x3D, 0x3D, 255]);
const POLYGON_ALPHA: f64 = 0.6;

const PARAM_LABEL_SIZE: f32 = 22.0;
const RANGE_LABEL_SIZE: f32 = 16.0;
const VALUE_LABEL_SIZE: f32 = 12.0;
const NAME_SIZE: f32 = 25.0;
const TEAM_SIZE: f32 = 20.0;
const VERTEX_MARKER_SIZE: f32 = 10.0;

/// Gap between the outer ring and the metric names
const PARAM_LABEL_GAP: f64 = 0.7;
/// Room around the outer ring for metric names
const RADAR_MARGIN: f64 = 1.5;

const P1_LABEL_OFFSET: Point = Point::new(-0.3, -0.4);
const P2_LABEL_OFFSET: Point = Point::new(-0.2, 0.2);

/// A vertex value that survived label suppression.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub axis: usize,
    pub value: f64,
    /// Label anchor: vertex plus the player's offset
    pub at: Point,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTrace {
    pub name: String,
    pub values: Vec<f64>,
    pub vertices: Vec<Point>,
    pub labels: Vec<ValueLabel>,
}

/// Everything about a two-player radar that does not depend on styling.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarComparison {
    pub geometry: RadarGeometry,
    pub players: [PlayerTrace; 2],
}

pub struct ComparativeRadarGenerator {
    dataset: RadarDataset,
    sink: Box<dyn FigureSink>,
}

impl ComparativeRadarGenerator {
    pub fn new(dataset: RadarDataset, sink: Box<dyn FigureSink>) -> Self {
        Self { dataset, sink }
    }

    pub fn dataset(&self) -> &RadarDataset {
        &self.dataset
    }

    pub fn set_dataset(&mut self, dataset: RadarDataset) {
        debug!("Radar dataset replaced: {}", dataset);
        self.dataset = dataset;
    }

    pub fn compare(&self, p1_name: &str, p2_name: &str) -> Result<RadarComparison> {
        let p1_values = self.dataset.player_values(p1_name)?;
        let p2_values = self.dataset.player_values(p2_name)?;
        let geometry = RadarGeometry::new(&self.dataset);

        let trace = |name: &str, values: &[f64], offset: Point| {
            let vertices = geometry.vertices(values);
            let labels = values
                .iter()
                .zip(&vertices)
                .enumerate()
                .filter(|(_, (value, _))| !geometry.is_suppressed(**value))
                .map(|(axis, (value, vertex))| ValueLabel {
                    axis,
                    value: *value,
                    at: Point::new(vertex.x + offset.x, vertex.y + offset.y),
                    text: format_value(*value),
                })
                .collect();
            PlayerTrace {
                name: name.to_string(),
                values: values.to_vec(),
                vertices,
                labels,
            }
        };

        let players = [
            trace(p1_name, p1_values, P1_LABEL_OFFSET),
            trace(p2_name, p2_values, P2_LABEL_OFFSET),
        ];
        Ok(RadarComparison { geometry, players })
    }

    /// Build the comparison figure without showing it.
    pub fn build_radar(
        &self,
        p1_name: &str,
        p1_team: &str,
        p1_color: &str,
        p2_name: &str,
        p2_team: &str,
        p2_color: &str,
    ) -> Result<Figure> {
        let colors = [parse_color(p1_color)?, parse_color(p2_color)?];
        let comparison = self.compare(p1_name, p2_name)?;

        let mut figure = Figure::new("radar", FIGURE_WIDTH, FIGURE_HEIGHT, WHITE);
        let mut title = Panel::new(
            TITLE_PANEL,
            PanelRect {
                left: 0.0,
                top: 0.0,
                width: 1.0,
                height: TITLE_HEIGHT,
            },
            (0.0, 1.0),
            (0.0, 1.0),
        );
        let teams = [p1_team, p2_team];
        for (i, (player, color)) in comparison.players.iter().zip(colors).enumerate() {
            let (x, team_y, h_align) = if i == 0 {
                (0.01, -0.01, HAlign::Left)
            } else {
                (0.99, -0.1, HAlign::Right)
            };
            title.push(text(
                Point::new(x, 0.65),
                &player.name,
                NAME_SIZE,
                color,
                FontWeight::Bold,
                h_align,
                VAlign::Center,
            ));
            title.push(text(
                Point::new(x, team_y),
                teams[i],
                TEAM_SIZE,
                color,
                FontWeight::Thin,
                h_align,
                VAlign::Top,
            ));
        }

        let mut radar = Panel::new(RADAR_PANEL, radar_rect(), radar_range(), radar_range());
        rings(&mut radar);

        for (player, color) in comparison.players.iter().zip(colors) {
            radar.push(Primitive::Polygon {
                points: player.vertices.clone(),
                fill: Some(with_alpha(color, POLYGON_ALPHA)?),
                edge: None,
                edge_width: 0.0,
            });
        }

        let geometry = &comparison.geometry;
        for (i, axis) in geometry.axes().iter().enumerate() {
            for (j, value) in axis.ring_values.iter().enumerate() {
                radar.push(text(
                    geometry.point_on_axis(i, RadarGeometry::ring_radius(j)),
                    &format_value(*value),
                    RANGE_LABEL_SIZE,
                    LABEL_COLOR,
                    FontWeight::Thin,
                    HAlign::Center,
                    VAlign::Center,
                ));
            }
            radar.push(text(
                geometry.point_on_axis(i, RadarGeometry::outer_radius() + PARAM_LABEL_GAP),
                &axis.metric,
                PARAM_LABEL_SIZE,
                LABEL_COLOR,
                FontWeight::Thin,
                HAlign::Center,
                VAlign::Center,
            ));
        }

        for (player, color) in comparison.players.iter().zip(colors) {
            for vertex in &player.vertices {
                radar.push(Primitive::Marker {
                    at: *vertex,
                    shape: MarkerShape::Circle,
                    size: VERTEX_MARKER_SIZE,
                    fill: color,
                    edge: color,
                });
            }
        }

        for (player, color) in comparison.players.iter().zip(colors) {
            for label in &player.labels {
                radar.push(text(
                    label.at,
                    &label.text,
                    VALUE_LABEL_SIZE,
                    color,
                    FontWeight::Thin,
                    HAlign::Center,
                    VAlign::Bottom,
                ));
            }
        }

        figure.panels.push(title);
        figure.panels.push(radar);
        Ok(figure)
    }

    /// Build the comparison figure and show it.
    pub fn generate_radar(
        &mut self,
        p1_name: &str,
        p1_team: &str,
        p1_color: &str,
        p2_name: &str,
        p2_team: &str,
        p2_color: &str,
    ) -> Result<()> {
        let figure = self.build_radar(p1_name, p1_team, p1_color, p2_name, p2_team, p2_color)?;
        info!("Radar built: {} vs {}", p1_name, p2_name);
        self.sink.show(&figure)
    }
}

impl fmt::Display for ComparativeRadarGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComparativeRadarGenerator(data={})", self.dataset)
    }
}

/// Square radar area centered under the title band.
fn radar_rect() -> PanelRect {
    let height = RADAR_HEIGHT;
    let width = height * FIGURE_HEIGHT as f32 / FIGURE_WIDTH as f32;
    PanelRect {
        left: (1.0 - width) / 2.0,
        top: TITLE_HEIGHT,
        width,
        height,
    }
}

fn radar_range() -> (f64, f64) {
    let r = RadarGeometry::outer_radius() + RADAR_MARGIN;
    (-r, r)
}

/// Outermost ring first so inner rings paint over it.
fn rings(panel: &mut Panel) {
    for j in (1..=NUM_RINGS).rev() {
        let fill = if (NUM_RINGS - j) % 2 == 0 { RING_FILL } else { WHITE };
        panel.push(Primitive::Circle {
            center: Point::new(0.0, 0.0),
            radius: RadarGeometry::ring_radius(j),
            fill: Some(fill),
            edge: Some(RING_EDGE),
        });
    }
    panel.push(Primitive::Circle {
        center: Point::new(0.0, 0.0),
        radius: RadarGeometry::ring_radius(0),
        fill: Some(WHITE),
        edge: Some(RING_EDGE),
    });
}

fn text(
    at: Point,
    text: &str,
    size: f32,
    color: Rgba<u8>,
    weight: FontWeight,
    h_align: HAlign,
    v_align: VAlign,
) -> Primitive {
    Primitive::Text {
        at,
        text: text.to_string(),
        size,
        color,
        weight,
        h_align,
        v_align,
    }
}

/// Whole numbers print without a fractional part.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
