//! 2-D Gaussian kernel density estimation on a regular grid

use rayon::prelude::*;

use crate::error::{Result, VizError};
use crate::figure::Extent;
use crate::scraper::PositionalSample;

/// Smallest bandwidth used when samples have no spread on an axis
const MIN_BANDWIDTH: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct DensityGrid {
    pub extent: Extent,
    pub cols: usize,
    pub rows: usize,
    /// Row-major, row 0 at `extent.y_min`, evaluated at cell centers
    pub values: Vec<f64>,
}

impl DensityGrid {
    pub fn get(&self, col: usize, row: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Level index (0..levels) of every cell, levels evenly spaced up to the maximum.
    pub fn levels(&self, levels: usize) -> Vec<usize> {
        let max = self.max();
        let top = levels.saturating_sub(1);
        self.values
            .iter()
            .map(|v| {
                if max <= 0.0 {
                    0
                } else {
                    ((v / max) * levels as f64).floor().min(top as f64) as usize
                }
            })
            .collect()
    }
}

/// Bandwidths per axis by Scott's rule: `sigma * n^(-1/6)`.
pub fn scott_bandwidth(samples: &[PositionalSample]) -> (f64, f64) {
    let n = samples.len() as f64;
    let factor = n.powf(-1.0 / 6.0);
    let std = |values: Vec<f64>| {
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);
        var.sqrt()
    };
    let sx = std(samples.iter().map(|s| s.x).collect());
    let sy = std(samples.iter().map(|s| s.y).collect());
    (
        (sx * factor).max(MIN_BANDWIDTH),
        (sy * factor).max(MIN_BANDWIDTH),
    )
}

/// Evaluate a product-Gaussian KDE of `samples` over `extent`.
pub fn gaussian_kde(
    samples: &[PositionalSample],
    extent: Extent,
    cols: usize,
    rows: usize,
) -> Result<DensityGrid> {
    if samples.is_empty() {
        return Err(VizError::EmptySamples);
    }
    if cols == 0 || rows == 0 {
        return Err(VizError::Validation(format!(
            "density grid must be non-empty, got {}x{}",
            cols, rows
        )));
    }
    if let Some(bad) = samples.iter().find(|s| !s.x.is_finite() || !s.y.is_finite()) {
        return Err(VizError::Validation(format!(
            "positional sample has non-finite coordinates: ({}, {})",
            bad.x, bad.y
        )));
    }

    let (bx, by) = scott_bandwidth(samples);
    let norm = 1.0 / (2.0 * std::f64::consts::PI * bx * by * samples.len() as f64);
    let dx = extent.width() / cols as f64;
    let dy = extent.height() / rows as f64;

    let mut values = vec![0.0; cols * rows];
    values
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(row, out)| {
            let y = extent.y_min + (row as f64 + 0.5) * dy;
            for (col, cell) in out.iter_mut().enumerate() {
                let x = extent.x_min + (col as f64 + 0.5) * dx;
                let sum: f64 = samples
                    .iter()
                    .map(|s| {
                        let u = (x - s.x) / bx;
                        let v = (y - s.y) / by;
                        (-0.5 * (u * u + v * v)).exp()
                    })
                    .sum();
                *cell = sum * norm;
            }
        });

    Ok(DensityGrid {
        extent,
        cols,
        rows,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_extent() -> Extent {
        Extent {
            x_min: 0.0,
            x_max: 100.0,
            y_min: 0.0,
            y_max: 100.0,
        }
    }

    #[test]
    fn empty_samples_are_rejected() {
        let result = gaussian_kde(&[], unit_extent(), 10, 10);
        assert!(matches!(result, Err(VizError::EmptySamples)));
    }

    #[test]
    fn density_peaks_at_the_cluster() {
        let samples: Vec<_> = (0..20)
            .map(|i| PositionalSample::new(75.0 + (i % 5) as f64, 25.0 + (i / 5) as f64))
            .collect();
        let grid = gaussian_kde(&samples, unit_extent(), 20, 20).unwrap();

        let (mut best, mut best_idx) = (0.0, 0);
        for (i, v) in grid.values.iter().enumerate() {
            if *v > best {
                best = *v;
                best_idx = i;
            }
        }
        let (col, row) = (best_idx % grid.cols, best_idx / grid.cols);
        assert_eq!((col, row), (15, 5));
        assert!(grid.get(2, 18) < best * 0.01);
    }

    #[test]
    fn single_sample_uses_minimum_bandwidth() {
        let samples = [PositionalSample::new(50.0, 50.0)];
        assert_eq!(scott_bandwidth(&samples), (MIN_BANDWIDTH, MIN_BANDWIDTH));
        let grid = gaussian_kde(&samples, unit_extent(), 10, 10).unwrap();
        assert!(grid.values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn levels_span_zero_to_top() {
        let samples = [
            PositionalSample::new(49.0, 50.0),
            PositionalSample::new(50.0, 51.0),
            PositionalSample::new(51.0, 49.0),
        ];
        let grid = gaussian_kde(&samples, unit_extent(), 10, 10).unwrap();
        let levels = grid.levels(100);
        assert_eq!(levels.iter().copied().max(), Some(99));
        assert!(levels.iter().all(|l| *l < 100));
        assert!(levels.contains(&0));
    }

    #[test]
    fn non_finite_samples_are_rejected() {
        let samples = [PositionalSample::new(f64::INFINITY, 5.0)];
        assert!(matches!(
            gaussian_kde(&samples, unit_extent(), 4, 4),
            Err(VizError::Validation(_))
        ));
    }
}
