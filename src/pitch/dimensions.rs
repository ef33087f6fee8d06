//! Pitch coordinate systems and marking geometry

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::figure::Point;

/// Points used to approximate circles and arcs
const ARC_POINTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchType {
    /// 120 x 80, y grows downward
    #[default]
    StatsBomb,
    /// 100 x 100 percentages, y grows upward
    Opta,
}

/// Marking positions in the pitch's own units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchDimensions {
    pub length: f64,
    pub width: f64,
    pub y_down: bool,
    pub penalty_box_length: f64,
    pub penalty_box_y: (f64, f64),
    pub six_yard_length: f64,
    pub six_yard_y: (f64, f64),
    pub penalty_spot: f64,
    pub goal_y: (f64, f64),
    pub goal_depth: f64,
    /// Center circle radii along x and y (differ when units are not square)
    pub circle_radius: (f64, f64),
    /// On-screen length / width of the playing area
    pub visual_aspect: f64,
}

impl PitchType {
    pub fn dimensions(self) -> PitchDimensions {
        match self {
            PitchType::StatsBomb => PitchDimensions {
                length: 120.0,
                width: 80.0,
                y_down: true,
                penalty_box_length: 18.0,
                penalty_box_y: (18.0, 62.0),
                six_yard_length: 6.0,
                six_yard_y: (30.0, 50.0),
                penalty_spot: 12.0,
                goal_y: (36.0, 44.0),
                goal_depth: 2.4,
                circle_radius: (10.0, 10.0),
                visual_aspect: 1.5,
            },
            PitchType::Opta => PitchDimensions {
                length: 100.0,
                width: 100.0,
                y_down: false,
                penalty_box_length: 17.0,
                penalty_box_y: (21.1, 78.9),
                six_yard_length: 5.8,
                six_yard_y: (36.8, 63.2),
                penalty_spot: 11.5,
                goal_y: (45.2, 54.8),
                goal_depth: 1.9,
                circle_radius: (9.15 / 105.0 * 100.0, 9.15 / 68.0 * 100.0),
                visual_aspect: 105.0 / 68.0,
            },
        }
    }
}

impl PitchDimensions {
    pub fn center(&self) -> Point {
        Point::new(self.length / 2.0, self.width / 2.0)
    }

    /// Padding around the playing area, in pitch units along each axis
    pub fn padding(&self) -> (f64, f64) {
        (self.length * 0.04, self.width * 0.04 * self.visual_aspect)
    }

    /// Posts of the right-hand goal
    pub fn right_goal_posts(&self) -> (Point, Point) {
        (
            Point::new(self.length, self.goal_y.0),
            Point::new(self.length, self.goal_y.1),
        )
    }

    /// Whether `p` lies on the drawn area: the playing surface plus padding.
    pub fn contains(&self, p: Point) -> bool {
        let (pad_x, pad_y) = self.padding();
        (-pad_x..=self.length + pad_x).contains(&p.x) && (-pad_y..=self.width + pad_y).contains(&p.y)
    }

    /// Closed outline of a box that starts at the left goal line.
    pub fn left_box(&self, depth: f64, y: (f64, f64)) -> Vec<Point> {
        vec![
            Point::new(0.0, y.0),
            Point::new(depth, y.0),
            Point::new(depth, y.1),
            Point::new(0.0, y.1),
        ]
    }

    pub fn center_circle(&self) -> Vec<Point> {
        let c = self.center();
        let (rx, ry) = self.circle_radius;
        (0..=ARC_POINTS)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / ARC_POINTS as f64;
                Point::new(c.x + rx * a.cos(), c.y + ry * a.sin())
            })
            .collect()
    }

    /// The "D" outside the left penalty box.
    pub fn left_penalty_arc(&self) -> Vec<Point> {
        let (rx, ry) = self.circle_radius;
        let mid = self.width / 2.0;
        let reach = ((self.penalty_box_length - self.penalty_spot) / rx).clamp(-1.0, 1.0);
        let half = reach.acos();
        (0..=ARC_POINTS)
            .map(|i| {
                let a = -half + 2.0 * half * i as f64 / ARC_POINTS as f64;
                Point::new(self.penalty_spot + rx * a.cos(), mid + ry * a.sin())
            })
            .collect()
    }

    pub fn left_goal(&self) -> Vec<Point> {
        vec![
            Point::new(0.0, self.goal_y.0),
            Point::new(-self.goal_depth, self.goal_y.0),
            Point::new(-self.goal_depth, self.goal_y.1),
            Point::new(0.0, self.goal_y.1),
        ]
    }

    /// Reflect a left-side shape onto the right half.
    pub fn mirror(&self, points: &[Point]) -> Vec<Point> {
        points
            .iter()
            .map(|p| Point::new(self.length - p.x, p.y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statsbomb_goal_is_centered() {
        let dims = PitchType::StatsBomb.dimensions();
        let (top, bottom) = dims.right_goal_posts();
        assert_eq!(top, Point::new(120.0, 36.0));
        assert_eq!(bottom, Point::new(120.0, 44.0));
        assert_eq!((top.y + bottom.y) / 2.0, dims.width / 2.0);
    }

    #[test]
    fn penalty_arc_stays_outside_box() {
        for kind in [PitchType::StatsBomb, PitchType::Opta] {
            let dims = kind.dimensions();
            let arc = dims.left_penalty_arc();
            assert!(arc.len() > 2);
            for p in &arc {
                assert!(p.x >= dims.penalty_box_length - 1e-9, "{:?} inside box", p);
            }
        }
    }

    #[test]
    fn mirror_reflects_across_halfway_line() {
        let dims = PitchType::Opta.dimensions();
        let mirrored = dims.mirror(&[Point::new(10.0, 30.0)]);
        assert_eq!(mirrored, vec![Point::new(90.0, 30.0)]);
    }

    #[test]
    fn contains_covers_padding_only() {
        let dims = PitchType::StatsBomb.dimensions();
        let (pad_x, pad_y) = dims.padding();
        assert!(dims.contains(Point::new(0.0, 0.0)));
        assert!(dims.contains(Point::new(120.0 + pad_x, 80.0 + pad_y)));
        assert!(!dims.contains(Point::new(-pad_x - 0.1, 40.0)));
        assert!(!dims.contains(Point::new(60.0, 80.0 + pad_y + 0.1)));
        assert!(!dims.contains(Point::new(1e12, 40.0)));
    }

    #[test]
    fn center_circle_is_closed() {
        let circle = PitchType::StatsBomb.dimensions().center_circle();
        let first = circle.first().unwrap();
        let last = circle.last().unwrap();
        assert!((first.x - last.x).abs() < 1e-9 && (first.y - last.y).abs() < 1e-9);
    }
}
