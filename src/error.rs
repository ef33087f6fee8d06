//! Error types shared by every chart component

use thiserror::Error;

use crate::scraper::ScraperError;

/// Everything that can go wrong while fetching, building or displaying a chart.
///
/// Input errors (`Validation`, `LengthMismatch`, `UnknownPlayer`, `InvalidColor`,
/// `EmptySamples`) are raised before any figure work starts. Collaborator and
/// rendering errors are passed through unchanged.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{what}: expected {expected} entries, got {actual}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("player '{0}' is not in the radar dataset")]
    UnknownPlayer(String),

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("heatmap needs at least one positional sample")]
    EmptySamples,

    #[error("scraper error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("font error: {0}")]
    Font(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("render error: {0}")]
    Render(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VizError>;

/// Reject non-finite coordinates before they reach the rasterizer.
pub(crate) fn ensure_finite(label: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(VizError::Validation(format!(
            "{} must be finite, got {:?}",
            label, values
        )))
    }
}

/// Opacity must lie in [0, 1].
pub(crate) fn ensure_alpha(alpha: f64) -> Result<()> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(VizError::Validation(format!(
            "alpha must be within [0, 1], got {}",
            alpha
        )))
    }
}
