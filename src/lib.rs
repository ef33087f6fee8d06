//! Pitchplot - football charts rendered to PNG
//!
//! Three chart components build backend-independent [`Figure`]s and hand them
//! to a [`FigureSink`]:
//!
//! - [`HeatmapGenerator`]: a player's positional density over an Opta pitch
//! - [`ComparativeRadarGenerator`]: two players' metrics on one radar
//! - [`PitchVisualizer`]: single-primitive diagrams on a configurable pitch

pub mod color;
pub mod config;
pub mod error;
pub mod figure;
pub mod fonts;
pub mod heatmap;
pub mod pitch;
pub mod radar;
pub mod render;
pub mod scraper;

pub use config::{FontConfig, VizConfig};
pub use error::{Result, VizError};
pub use figure::{Figure, Panel, Point, Primitive};
pub use heatmap::HeatmapGenerator;
pub use pitch::{PitchConfig, PitchType, PitchVisualizer};
pub use radar::{ComparativeRadarGenerator, RadarDataset};
pub use render::{FigureSink, MemorySink, PngSink};
pub use scraper::{FileScraper, PositionalSample, Scraper, ScraperError};
