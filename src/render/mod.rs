//! Rasterization and display of figures

mod raster;
mod sink;

pub use raster::{Transform, rasterize};
pub use sink::{FigureSink, MemorySink, PngSink};
