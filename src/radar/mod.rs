//! Two-player comparison radars

mod dataset;
mod generator;
mod geometry;

pub use dataset::{RadarDataset, RadarRecord};
pub use generator::{
    ComparativeRadarGenerator, PlayerTrace, RADAR_PANEL, RadarComparison, TITLE_PANEL, ValueLabel,
};
pub use geometry::{CENTER_RADIUS, NUM_RINGS, RING_WIDTH, RadarAxis, RadarGeometry};
