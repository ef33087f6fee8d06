//! Chart configuration loaded from `config/pitchplot.toml`
//!
//! Every section has defaults, so a missing file or a partial file both work.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, VizError};

/// Local configuration file (optional)
pub const CONFIG_FILE: &str = "config/pitchplot.toml";

pub const ROBOTO_THIN_URL: &str =
    "https://raw.githubusercontent.com/googlefonts/roboto/main/src/hinted/Roboto-Thin.ttf";
pub const ROBOTO_SLAB_URL: &str =
    "https://raw.githubusercontent.com/google/fonts/main/apache/robotoslab/RobotoSlab%5Bwght%5D.ttf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Directory the PNG sink writes into
    pub output_dir: PathBuf,
    pub fonts: FontConfig,
    pub heatmap: HeatmapSettings,
    pub figure: FigureSettings,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("showcase/charts"),
            fonts: FontConfig::default(),
            heatmap: HeatmapSettings::default(),
            figure: FigureSettings::default(),
        }
    }
}

/// Where the thin and bold font faces come from.
/// A local path wins over the URL when both are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub thin_url: String,
    pub bold_url: String,
    pub thin_path: Option<PathBuf>,
    pub bold_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            thin_url: ROBOTO_THIN_URL.to_string(),
            bold_url: ROBOTO_SLAB_URL.to_string(),
            thin_path: None,
            bold_path: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapSettings {
    /// Density grid cells per axis
    pub grid_size: usize,
    /// Filled contour levels
    pub levels: usize,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            grid_size: 100,
            levels: 100,
        }
    }
}

/// Pixel size of pitch diagrams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for FigureSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl VizConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| VizError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: VizConfig = toml::from_str(&contents)
            .map_err(|e| VizError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Local config file if present and valid, otherwise built-in defaults
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            info!("No {} found, using defaults", CONFIG_FILE);
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", CONFIG_FILE);
                config
            }
            Err(e) => {
                warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.heatmap.grid_size < 2 {
            return Err(VizError::Config(format!(
                "heatmap.grid_size must be at least 2, got {}",
                self.heatmap.grid_size
            )));
        }
        if self.heatmap.levels == 0 {
            return Err(VizError::Config("heatmap.levels must be positive".into()));
        }
        if self.figure.width == 0 || self.figure.height == 0 {
            return Err(VizError::Config("figure size must be non-zero".into()));
        }
        Ok(())
    }
}
