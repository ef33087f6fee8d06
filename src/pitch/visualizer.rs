//! Single-primitive pitch diagrams
//!
//! [`PitchVisualizer`] owns one live pitch figure. Every draw call resets it to
//! a blank pitch, overlays one kind of primitive and shows the result, so each
//! call produces exactly one fresh figure.

use image::Rgba;
use std::fmt;
use tracing::debug;

use super::surface::{PITCH_PANEL, PitchConfig, pitch_figure};
use crate::color::{BLACK, WHITE, parse_color, with_alpha};
use crate::config::FigureSettings;
use crate::error::{Result, VizError, ensure_finite};
use crate::figure::{Figure, MarkerShape, Point, Primitive};
use crate::render::FigureSink;

const PASS_COLOR: Rgba<u8> = Rgba([25, 25, 25, 255]);
const SHOT_COLOR: Rgba<u8> = Rgba([250, 250, 250, 255]);
const PLAYER_COLOR: Rgba<u8> = Rgba([31, 119, 180, 255]);
const ARROW_WIDTH: f32 = 2.5;
const COMET_WIDTH: f32 = 6.0;
const PLAYER_MARKER_SIZE: f32 = 14.0;
const BALL_MARKER_SIZE: f32 = 16.0;

pub struct PitchVisualizer {
    config: PitchConfig,
    size: FigureSettings,
    figure: Figure,
    sink: Box<dyn FigureSink>,
}

impl PitchVisualizer {
    pub fn new(config: PitchConfig, sink: Box<dyn FigureSink>) -> Result<Self> {
        Self::with_size(config, FigureSettings::default(), sink)
    }

    pub fn with_size(
        config: PitchConfig,
        size: FigureSettings,
        sink: Box<dyn FigureSink>,
    ) -> Result<Self> {
        let figure = pitch_figure(&config, size.width, size.height, "pitch")?;
        Ok(Self {
            config,
            size,
            figure,
            sink,
        })
    }

    pub fn config(&self) -> &PitchConfig {
        &self.config
    }

    /// Replace the whole configuration. The old one stays if the new one is invalid.
    pub fn set_config(&mut self, config: PitchConfig) -> Result<()> {
        config.field_rgba()?;
        config.line_rgba()?;
        self.config = config;
        self.rebuild()
    }

    pub fn field_color(&self) -> &str {
        &self.config.field_color
    }

    pub fn set_field_color(&mut self, color: &str) -> Result<()> {
        parse_color(color)?;
        self.config.field_color = color.to_string();
        self.rebuild()
    }

    pub fn line_color(&self) -> &str {
        &self.config.line_color
    }

    pub fn set_line_color(&mut self, color: &str) -> Result<()> {
        parse_color(color)?;
        self.config.line_color = color.to_string();
        self.rebuild()
    }

    pub fn stripes(&self) -> bool {
        self.config.stripes
    }

    pub fn set_stripes(&mut self, stripes: bool) -> Result<()> {
        self.config.stripes = stripes;
        self.rebuild()
    }

    /// The live figure, as last built or drawn.
    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// Discard overlays and rebuild a blank pitch from the current configuration.
    pub fn rebuild(&mut self) -> Result<()> {
        self.figure = pitch_figure(&self.config, self.size.width, self.size.height, "pitch")?;
        debug!("Rebuilt pitch: {}", self);
        Ok(())
    }

    /// Show a blank pitch.
    pub fn draw_pitch(&mut self) -> Result<()> {
        self.overlay("pitch", Vec::new())
    }

    pub fn draw_pass_direction(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<()> {
        self.ensure_on_pitch("pass", &[(x0, y0), (x1, y1)])?;
        self.overlay(
            "pass",
            vec![Primitive::Arrow {
                from: Point::new(x0, y0),
                to: Point::new(x1, y1),
                color: PASS_COLOR,
                width: ARROW_WIDTH,
            }],
        )
    }

    pub fn draw_shot_direction(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<()> {
        self.ensure_on_pitch("shot", &[(x0, y0), (x1, y1)])?;
        self.overlay(
            "shot",
            vec![Primitive::Comet {
                from: Point::new(x0, y0),
                to: Point::new(x1, y1),
                color: SHOT_COLOR,
                width: COMET_WIDTH,
            }],
        )
    }

    pub fn draw_player_position(&mut self, x: f64, y: f64) -> Result<()> {
        self.ensure_on_pitch("player position", &[(x, y)])?;
        self.overlay(
            "player",
            vec![Primitive::Marker {
                at: Point::new(x, y),
                shape: MarkerShape::Circle,
                size: PLAYER_MARKER_SIZE,
                fill: PLAYER_COLOR,
                edge: BLACK,
            }],
        )
    }

    /// Triangle marker facing right at 0 degrees; positive degrees turn it
    /// clockwise on screen.
    pub fn draw_player_position_with_arrow(
        &mut self,
        x: f64,
        y: f64,
        rotation_degrees: f64,
    ) -> Result<()> {
        self.ensure_on_pitch("player position", &[(x, y)])?;
        ensure_finite("rotation", &[rotation_degrees])?;
        self.overlay(
            "player_facing",
            vec![Primitive::Marker {
                at: Point::new(x, y),
                shape: MarkerShape::Triangle { rotation_degrees },
                size: PLAYER_MARKER_SIZE,
                fill: PLAYER_COLOR,
                edge: BLACK,
            }],
        )
    }

    pub fn draw_ball_position(&mut self, x: f64, y: f64) -> Result<()> {
        self.ensure_on_pitch("ball position", &[(x, y)])?;
        self.overlay(
            "ball",
            vec![Primitive::Marker {
                at: Point::new(x, y),
                shape: MarkerShape::Football,
                size: BALL_MARKER_SIZE,
                fill: WHITE,
                edge: BLACK,
            }],
        )
    }

    /// Filled wedge from (x, y) to both posts of the right-hand goal.
    pub fn draw_shot_angle(&mut self, x: f64, y: f64, alpha: f64, color: &str) -> Result<()> {
        self.ensure_on_pitch("shot position", &[(x, y)])?;
        let fill = with_alpha(parse_color(color)?, alpha)?;
        let (post_a, post_b) = self.config.pitch_type.dimensions().right_goal_posts();
        self.overlay(
            "shot_angle",
            vec![Primitive::Polygon {
                points: vec![Point::new(x, y), post_a, post_b],
                fill: Some(fill),
                edge: None,
                edge_width: 0.0,
            }],
        )
    }

    /// One filled polygon per (shape, color, alpha) triple. All three slices
    /// must have the same length.
    pub fn draw_zones(
        &mut self,
        shapes: &[Vec<(f64, f64)>],
        colors: &[&str],
        alphas: &[f64],
    ) -> Result<()> {
        let expected = shapes.len();
        if colors.len() != expected {
            return Err(VizError::LengthMismatch {
                what: "zone colors".into(),
                expected,
                actual: colors.len(),
            });
        }
        if alphas.len() != expected {
            return Err(VizError::LengthMismatch {
                what: "zone alphas".into(),
                expected,
                actual: alphas.len(),
            });
        }

        let mut zones = Vec::with_capacity(expected);
        for (i, ((shape, color), alpha)) in shapes.iter().zip(colors).zip(alphas).enumerate() {
            if shape.len() < 3 {
                return Err(VizError::Validation(format!(
                    "zone {} needs at least 3 vertices, got {}",
                    i,
                    shape.len()
                )));
            }
            self.ensure_on_pitch(&format!("zone {}", i), shape)?;
            let fill = with_alpha(parse_color(color)?, *alpha)?;
            zones.push(Primitive::Polygon {
                points: shape.iter().map(|&p| Point::from(p)).collect(),
                fill: Some(fill),
                edge: None,
                edge_width: 0.0,
            });
        }
        self.overlay("zones", zones)
    }

    /// Coordinates must be finite and land on the pitch or its padding.
    fn ensure_on_pitch(&self, what: &str, points: &[(f64, f64)]) -> Result<()> {
        let dims = self.config.pitch_type.dimensions();
        for &(x, y) in points {
            ensure_finite(what, &[x, y])?;
            if !dims.contains(Point::new(x, y)) {
                return Err(VizError::Validation(format!(
                    "{} at ({}, {}) is outside the {}x{} pitch",
                    what, x, y, dims.length, dims.width
                )));
            }
        }
        Ok(())
    }

    fn overlay(&mut self, name: &str, primitives: Vec<Primitive>) -> Result<()> {
        self.rebuild()?;
        self.figure.name = format!("pitch_{}", name);
        if let Some(panel) = self.figure.panel_mut(PITCH_PANEL) {
            panel.primitives.extend(primitives);
        }
        self.sink.show(&self.figure)
    }
}

impl fmt::Display for PitchVisualizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PitchVisualizer(field_color='{}', line_color='{}', stripes={})",
            self.config.field_color, self.config.line_color, self.config.stripes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySink;

    fn visualizer() -> (PitchVisualizer, MemorySink) {
        let sink = MemorySink::new();
        let viz = PitchVisualizer::new(PitchConfig::default(), Box::new(sink.clone())).unwrap();
        (viz, sink)
    }

    fn overlay_kinds(figure: &Figure, blank: &Figure) -> Vec<&'static str> {
        let panel = figure.panel(PITCH_PANEL).unwrap();
        let base = blank.panel(PITCH_PANEL).unwrap().primitives.len();
        panel.primitives[base..].iter().map(|p| p.kind()).collect()
    }

    #[test]
    fn each_draw_shows_one_fresh_figure() {
        let (mut viz, sink) = visualizer();
        let blank = viz.figure().clone();

        viz.draw_pass_direction(20.0, 40.0, 60.0, 20.0).unwrap();
        viz.draw_shot_direction(100.0, 40.0, 120.0, 40.0).unwrap();
        viz.draw_player_position(60.0, 40.0).unwrap();
        viz.draw_player_position_with_arrow(60.0, 40.0, 90.0).unwrap();
        viz.draw_ball_position(60.0, 40.0).unwrap();
        viz.draw_shot_angle(100.0, 30.0, 0.5, "red").unwrap();

        let shown = sink.figures();
        assert_eq!(shown.len(), 6);
        let expected = ["arrow", "comet", "marker", "marker", "marker", "polygon"];
        for (figure, kind) in shown.iter().zip(expected) {
            assert_eq!(overlay_kinds(figure, &blank), vec![kind]);
        }
    }

    #[test]
    fn rotation_is_carried_to_the_marker() {
        let (mut viz, _sink) = visualizer();
        viz.draw_player_position_with_arrow(10.0, 10.0, -45.0).unwrap();
        let last = viz.figure().panel(PITCH_PANEL).unwrap().primitives.last().cloned();
        assert!(matches!(
            last,
            Some(Primitive::Marker {
                shape: MarkerShape::Triangle { rotation_degrees },
                ..
            }) if rotation_degrees == -45.0
        ));
        assert!(viz
            .draw_player_position_with_arrow(10.0, 10.0, f64::NAN)
            .is_err());
    }

    #[test]
    fn shot_angle_targets_right_goal_with_alpha() {
        let (mut viz, _sink) = visualizer();
        viz.draw_shot_angle(100.0, 30.0, 0.25, "#ff0000").unwrap();
        let last = viz.figure().panel(PITCH_PANEL).unwrap().primitives.last().cloned();
        let Some(Primitive::Polygon { points, fill, .. }) = last else {
            panic!("expected wedge polygon");
        };
        assert_eq!(points[1], Point::new(120.0, 36.0));
        assert_eq!(points[2], Point::new(120.0, 44.0));
        assert_eq!(fill, Some(Rgba([255, 0, 0, 64])));

        assert!(matches!(
            viz.draw_shot_angle(100.0, 30.0, 2.0, "red"),
            Err(VizError::Validation(_))
        ));
        assert!(matches!(
            viz.draw_shot_angle(100.0, 30.0, 0.5, "nope"),
            Err(VizError::InvalidColor(_))
        ));
    }

    #[test]
    fn zones_draw_one_polygon_per_triple() {
        let (mut viz, sink) = visualizer();
        let blank = viz.figure().clone();
        let shapes = vec![
            vec![(0.0, 0.0), (40.0, 0.0), (40.0, 80.0), (0.0, 80.0)],
            vec![(40.0, 0.0), (80.0, 0.0), (80.0, 80.0)],
            vec![(80.0, 0.0), (120.0, 0.0), (120.0, 80.0), (80.0, 80.0)],
        ];
        viz.draw_zones(&shapes, &["red", "blue", "#00ff00"], &[0.2, 0.4, 1.0])
            .unwrap();

        let figure = sink.last().unwrap();
        assert_eq!(overlay_kinds(&figure, &blank), vec!["polygon"; 3]);
        let panel = figure.panel(PITCH_PANEL).unwrap();
        let fills: Vec<_> = panel.primitives[panel.primitives.len() - 3..]
            .iter()
            .map(|p| match p {
                Primitive::Polygon { fill, .. } => *fill,
                _ => None,
            })
            .collect();
        assert_eq!(
            fills,
            vec![
                Some(Rgba([214, 39, 40, 51])),
                Some(Rgba([31, 119, 180, 102])),
                Some(Rgba([0, 255, 0, 255])),
            ]
        );
    }

    #[test]
    fn zones_with_mismatched_lengths_fail_before_drawing() {
        let (mut viz, sink) = visualizer();
        let shapes = vec![vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]; 2];

        let err = viz.draw_zones(&shapes, &["red"], &[0.5, 0.5]).unwrap_err();
        assert!(matches!(
            err,
            VizError::LengthMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        let err = viz
            .draw_zones(&shapes, &["red", "blue"], &[0.5, 0.5, 0.5])
            .unwrap_err();
        assert!(matches!(err, VizError::LengthMismatch { actual: 3, .. }));
        assert!(sink.is_empty());
    }

    #[test]
    fn off_pitch_coordinates_fail_before_drawing() {
        let (mut viz, sink) = visualizer();
        assert!(matches!(
            viz.draw_pass_direction(-1e12, 10.0, 1e12, 70.0),
            Err(VizError::Validation(_))
        ));
        assert!(matches!(
            viz.draw_shot_direction(100.0, 40.0, 121.0, f64::INFINITY),
            Err(VizError::Validation(_))
        ));
        assert!(viz.draw_ball_position(60.0, -500.0).is_err());
        assert!(viz.draw_shot_angle(1e9, 30.0, 0.5, "red").is_err());

        let zones = vec![vec![(-1e12, -1e12), (1e12, -1e12), (1e12, 1e12)]];
        assert!(matches!(
            viz.draw_zones(&zones, &["red"], &[0.5]),
            Err(VizError::Validation(msg)) if msg.contains("zone 0")
        ));
        assert!(sink.is_empty());

        // Padding around the playing area is still drawable.
        let (pad_x, _) = PitchConfig::default().pitch_type.dimensions().padding();
        viz.draw_player_position(-pad_x / 2.0, 40.0).unwrap();
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn zone_with_two_vertices_is_rejected() {
        let (mut viz, _sink) = visualizer();
        let shapes = vec![vec![(0.0, 0.0), (10.0, 0.0)]];
        assert!(matches!(
            viz.draw_zones(&shapes, &["red"], &[0.5]),
            Err(VizError::Validation(_))
        ));
    }

    #[test]
    fn field_color_setter_rebuilds_and_keeps_other_settings() {
        let (mut viz, _sink) = visualizer();
        viz.set_stripes(false).unwrap();
        viz.set_line_color("#BDBDBD").unwrap();
        viz.draw_player_position(10.0, 10.0).unwrap();

        viz.set_field_color("#000000").unwrap();
        assert_eq!(viz.field_color(), "#000000");
        assert_eq!(viz.line_color(), "#BDBDBD");
        assert!(!viz.stripes());
        assert_eq!(viz.figure().background, Rgba([0, 0, 0, 255]));

        // Rebuild drops the earlier overlay.
        let panel = viz.figure().panel(PITCH_PANEL).unwrap();
        assert_eq!(panel.count("marker"), 3);
        assert_eq!(panel.count("polygon"), 1);
    }

    #[test]
    fn invalid_setter_leaves_config_untouched() {
        let (mut viz, _sink) = visualizer();
        assert!(viz.set_field_color("plaid").is_err());
        assert_eq!(viz.field_color(), "grass");
    }

    #[test]
    fn display_matches_configuration() {
        let (viz, _sink) = visualizer();
        assert_eq!(
            viz.to_string(),
            "PitchVisualizer(field_color='grass', line_color='white', stripes=true)"
        );
    }
}
