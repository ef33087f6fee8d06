//! Player heatmaps: scraper samples → kernel density → inferno contours on a pitch

mod colormap;
mod generator;
mod kde;

pub use colormap::inferno;
pub use generator::HeatmapGenerator;
pub use kde::{DensityGrid, gaussian_kde, scott_bandwidth};
