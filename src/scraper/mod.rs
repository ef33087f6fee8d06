//! Positional data sources
//!
//! The heatmap generator only needs one capability from a scraper: the
//! positional samples of one player in one match. Network scrapers live
//! outside this crate and plug in through [`Scraper`].

mod file;

pub use file::{FileScraper, match_key, parse_samples, slugify};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One observed player location in pitch-relative units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionalSample {
    pub x: f64,
    pub y: f64,
}

impl PositionalSample {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("no heatmap for player '{player}' in match '{match_url}'")]
    PlayerNotFound { match_url: String, player: String },

    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: String,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

pub trait Scraper {
    /// Positional samples for `player` in the match at `match_url`.
    fn player_heatmap(
        &self,
        match_url: &str,
        player: &str,
    ) -> Result<Vec<PositionalSample>, ScraperError>;

    /// Short name for logs and `Display` impls.
    fn name(&self) -> &str {
        "scraper"
    }
}
