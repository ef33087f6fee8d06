//! Process-wide font registry
//!
//! Radar titles and labels use a thin and a bold face. They are fetched once
//! (over HTTP, or from local paths) by [`init`] and live for the rest of the
//! process. Rasterizing a figure that contains text before `init` is an error.

use ab_glyph::FontVec;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::info;

use crate::config::FontConfig;
use crate::error::{Result, VizError};
use crate::figure::FontWeight;

pub struct Fonts {
    pub thin: FontVec,
    pub bold: FontVec,
}

impl Fonts {
    /// Parse both faces from raw TTF/OTF bytes.
    pub fn from_bytes(thin: Vec<u8>, bold: Vec<u8>) -> Result<Self> {
        Ok(Self {
            thin: parse_face("thin", thin)?,
            bold: parse_face("bold", bold)?,
        })
    }

    pub fn face(&self, weight: FontWeight) -> &FontVec {
        match weight {
            FontWeight::Thin => &self.thin,
            FontWeight::Bold => &self.bold,
        }
    }
}

static FONTS: OnceLock<Fonts> = OnceLock::new();

/// Load and install the fonts described by `config`. Later calls return the
/// fonts installed by the first successful call.
pub fn init(config: &FontConfig) -> Result<&'static Fonts> {
    if let Some(fonts) = FONTS.get() {
        return Ok(fonts);
    }
    let fonts = load(config)?;
    Ok(install(fonts))
}

/// Install already-loaded fonts. No-op if fonts are installed.
pub fn install(fonts: Fonts) -> &'static Fonts {
    FONTS.get_or_init(|| fonts)
}

pub fn get() -> Option<&'static Fonts> {
    FONTS.get()
}

pub fn load(config: &FontConfig) -> Result<Fonts> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let thin = read_or_fetch(config.thin_path.as_deref(), &config.thin_url, timeout)?;
    let bold = read_or_fetch(config.bold_path.as_deref(), &config.bold_url, timeout)?;
    Fonts::from_bytes(thin, bold)
}

fn read_or_fetch(path: Option<&Path>, url: &str, timeout: Duration) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            let bytes = fs::read(path).map_err(|e| {
                VizError::Font(format!("Failed to read {}: {}", path.display(), e))
            })?;
            info!("Loaded font {} ({} bytes)", path.display(), bytes.len());
            Ok(bytes)
        }
        None => fetch(url, timeout),
    }
}

fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("pitchplot/0.1")
        .timeout(timeout)
        .build()?;

    info!("Fetching font {}", url);
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    info!("Fetched {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

fn parse_face(label: &str, bytes: Vec<u8>) -> Result<FontVec> {
    FontVec::try_from_vec(bytes)
        .map_err(|_| VizError::Font(format!("{} face is not a valid TrueType/OpenType font", label)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn garbage_bytes_are_rejected() {
        let result = Fonts::from_bytes(vec![0, 1, 2, 3], vec![4, 5, 6]);
        assert!(matches!(result, Err(VizError::Font(_))));
    }

    #[test]
    fn missing_local_path_is_startup_error() {
        let config = FontConfig {
            thin_path: Some(PathBuf::from("/no/such/font-thin.ttf")),
            bold_path: Some(PathBuf::from("/no/such/font-bold.ttf")),
            ..FontConfig::default()
        };
        let result = load(&config);
        assert!(matches!(result, Err(VizError::Font(msg)) if msg.contains("font-thin.ttf")));
    }
}
