//! Pitch geometry, blank pitch surfaces and the single-primitive visualizer

mod dimensions;
mod surface;
mod visualizer;

pub use dimensions::{PitchDimensions, PitchType};
pub use surface::{PITCH_PANEL, PitchConfig, fit_rect, pitch_figure, pitch_panel, screen_aspect};
pub use visualizer::PitchVisualizer;
