//! Radar layout: one axis per metric, evenly spaced clockwise from the top.

use std::collections::BTreeSet;
use std::f64::consts::{FRAC_PI_2, TAU};

use super::dataset::RadarDataset;
use crate::figure::Point;

pub const NUM_RINGS: usize = 4;
pub const RING_WIDTH: f64 = 1.0;
pub const CENTER_RADIUS: f64 = 1.0;

/// Values that never get a label, alongside every ring value.
const ALWAYS_SUPPRESSED: [i64; 2] = [1, 2];

#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub metric: String,
    /// Rounded lower bound
    pub low: f64,
    /// Rounded upper bound
    pub high: f64,
    /// Radians, counter-clockwise from +x
    pub angle: f64,
    /// `NUM_RINGS + 1` evenly spaced values from `low` to `high`, rounded
    pub ring_values: Vec<f64>,
}

impl RadarAxis {
    /// Share of the range covered by `value`, clamped to [0, 1].
    pub fn proportion(&self, value: f64) -> f64 {
        ((value - self.low) / (self.high - self.low)).clamp(0.0, 1.0)
    }

    pub fn direction(&self) -> Point {
        Point::new(self.angle.cos(), self.angle.sin())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarGeometry {
    axes: Vec<RadarAxis>,
    suppressed: BTreeSet<i64>,
}

impl RadarGeometry {
    pub fn new(dataset: &RadarDataset) -> Self {
        let n = dataset.len();
        let axes: Vec<RadarAxis> = dataset
            .metrics()
            .iter()
            .enumerate()
            .map(|(i, metric)| {
                let low = dataset.low()[i].round();
                let high = dataset.high()[i].round();
                let step = (high - low) / NUM_RINGS as f64;
                RadarAxis {
                    metric: metric.clone(),
                    low,
                    high,
                    angle: FRAC_PI_2 - TAU * i as f64 / n as f64,
                    ring_values: (0..=NUM_RINGS)
                        .map(|j| (low + step * j as f64).round())
                        .collect(),
                }
            })
            .collect();

        let suppressed = axes
            .iter()
            .flat_map(|axis| axis.ring_values.iter().map(|v| *v as i64))
            .chain(ALWAYS_SUPPRESSED)
            .collect();

        Self { axes, suppressed }
    }

    pub fn axes(&self) -> &[RadarAxis] {
        &self.axes
    }

    pub fn outer_radius() -> f64 {
        CENTER_RADIUS + NUM_RINGS as f64 * RING_WIDTH
    }

    /// Radius of ring boundary `j`; `0` is the center circle.
    pub fn ring_radius(j: usize) -> f64 {
        CENTER_RADIUS + j as f64 * RING_WIDTH
    }

    pub fn radius(&self, axis: usize, value: f64) -> f64 {
        CENTER_RADIUS + self.axes[axis].proportion(value) * NUM_RINGS as f64 * RING_WIDTH
    }

    pub fn point_on_axis(&self, axis: usize, radius: f64) -> Point {
        let dir = self.axes[axis].direction();
        Point::new(dir.x * radius, dir.y * radius)
    }

    /// One vertex per axis; `values` must have one entry per metric.
    pub fn vertices(&self, values: &[f64]) -> Vec<Point> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| self.point_on_axis(i, self.radius(i, *v)))
            .collect()
    }

    /// Labels are dropped when the rounded value equals any rounded ring value
    /// of any metric, or 1 or 2.
    pub fn is_suppressed(&self, value: f64) -> bool {
        self.suppressed.contains(&(value.round() as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn dataset(low: f64, high: f64) -> RadarDataset {
        let players = BTreeMap::from([
            ("A".to_string(), vec![50.0, 80.0, 10.0]),
            ("B".to_string(), vec![90.0, 20.0, 200.0]),
        ]);
        RadarDataset::new(
            vec!["Pace".into(), "Shooting".into(), "Passing".into()],
            vec![low; 3],
            vec![high; 3],
            players,
        )
        .unwrap()
    }

    #[test]
    fn first_axis_points_up_and_order_is_clockwise() {
        let geo = RadarGeometry::new(&dataset(0.0, 100.0));
        let up = geo.axes()[0].direction();
        assert!(up.x.abs() < 1e-9 && (up.y - 1.0).abs() < 1e-9);
        // Second of three axes sits in the lower right.
        let second = geo.axes()[1].direction();
        assert!(second.x > 0.0 && second.y < 0.0);
    }

    #[test]
    fn ring_values_are_rounded_linspace() {
        let geo = RadarGeometry::new(&dataset(0.4, 10.4));
        assert_eq!(geo.axes()[0].ring_values, vec![0.0, 3.0, 5.0, 8.0, 10.0]);
    }

    #[test]
    fn radius_is_affine_in_proportion_and_clamped() {
        let geo = RadarGeometry::new(&dataset(0.0, 100.0));
        let span = RadarGeometry::outer_radius() - CENTER_RADIUS;
        assert!((geo.radius(0, 50.0) - (CENTER_RADIUS + 0.5 * span)).abs() < 1e-9);
        assert_eq!(geo.radius(0, -10.0), CENTER_RADIUS);
        assert_eq!(geo.radius(2, 200.0), RadarGeometry::outer_radius());
    }

    #[test]
    fn radii_are_monotonic_in_value() {
        let geo = RadarGeometry::new(&dataset(0.0, 100.0));
        let mut prev = 0.0;
        for v in (0..=100).step_by(5) {
            let r = geo.radius(1, v as f64);
            assert!(r >= prev);
            prev = r;
        }
    }

    #[test]
    fn suppression_covers_ring_values_and_small_integers() {
        let geo = RadarGeometry::new(&dataset(0.0, 100.0));
        for v in [0.0, 25.0, 50.0, 75.0, 100.0, 1.0, 2.0, 49.6, 1.4] {
            assert!(geo.is_suppressed(v), "{} should be suppressed", v);
        }
        for v in [80.0, 90.0, 20.0, 3.0, 50.6] {
            assert!(!geo.is_suppressed(v), "{} should be labeled", v);
        }
    }

    #[test]
    fn vertices_follow_axes() {
        let geo = RadarGeometry::new(&dataset(0.0, 100.0));
        let verts = geo.vertices(&[100.0, 0.0, 0.0]);
        assert_eq!(verts.len(), 3);
        assert!((verts[0].y - RadarGeometry::outer_radius()).abs() < 1e-9);
        let r1 = (verts[1].x.powi(2) + verts[1].y.powi(2)).sqrt();
        assert!((r1 - CENTER_RADIUS).abs() < 1e-9);
    }
}
