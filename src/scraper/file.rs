//! File-backed scraper
//!
//! Samples live under `<root>/<match-key>/<player-slug>.txt`, one `x,y` row per
//! sample. A header row and `#` comments are allowed; extra columns are ignored.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{PositionalSample, Scraper, ScraperError};

#[derive(Debug, Clone)]
pub struct FileScraper {
    root: PathBuf,
}

impl FileScraper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sample_path(&self, match_url: &str, player: &str) -> PathBuf {
        self.root
            .join(match_key(match_url))
            .join(format!("{}.txt", slugify(player)))
    }
}

impl Scraper for FileScraper {
    fn player_heatmap(
        &self,
        match_url: &str,
        player: &str,
    ) -> Result<Vec<PositionalSample>, ScraperError> {
        let path = self.sample_path(match_url, player);
        if !path.exists() {
            return Err(ScraperError::PlayerNotFound {
                match_url: match_url.to_string(),
                player: player.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;
        let samples = parse_samples(&content, &path.display().to_string())?;
        debug!("Read {} samples from {}", samples.len(), path.display());
        Ok(samples)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Parse `x,y` rows. `source` only labels error messages.
pub fn parse_samples(content: &str, source: &str) -> Result<Vec<PositionalSample>, ScraperError> {
    let mut samples = Vec::new();
    let mut seen_row = false;

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split(',').map(str::trim);
        let (Some(x), Some(y)) = (parts.next(), parts.next()) else {
            return Err(ScraperError::Malformed {
                path: source.to_string(),
                line: idx + 1,
                reason: format!("expected 'x,y', got '{}'", line),
            });
        };

        match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => {
                samples.push(PositionalSample::new(x, y));
            }
            // Header row
            _ if !seen_row && x.chars().any(|c| c.is_ascii_alphabetic()) => {}
            _ => {
                return Err(ScraperError::Malformed {
                    path: source.to_string(),
                    line: idx + 1,
                    reason: format!("invalid coordinates '{}'", line),
                });
            }
        }
        seen_row = true;
    }

    Ok(samples)
}

/// Directory name for a match URL: the `#id:NNN` fragment when present,
/// otherwise the last path segment.
pub fn match_key(match_url: &str) -> String {
    if let Some((_, id)) = match_url.split_once("#id:") {
        return slugify(id);
    }
    let without_fragment = match_url.split(['#', '?']).next().unwrap_or(match_url);
    let segment = without_fragment
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(without_fragment);
    slugify(segment)
}

/// Lowercase alphanumeric runs joined by `_`.
pub fn slugify(name: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            pending_sep = false;
        } else {
            pending_sep = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Lionel  Messi"), "lionel_messi");
        assert_eq!(slugify("  N'Golo Kanté "), "n_golo_kanté");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn match_key_prefers_fragment_id() {
        assert_eq!(
            match_key("https://www.sofascore.com/team-a-team-b/AbCd#id:12345"),
            "12345"
        );
        assert_eq!(
            match_key("https://www.sofascore.com/team-a-team-b/AbCd/"),
            "abcd"
        );
        assert_eq!(match_key("https://example.com/m/final?tab=1"), "final");
    }

    #[test]
    fn parse_skips_header_and_comments() {
        let samples = parse_samples("# exported\nx,y\n10,20\n 30.5 , 40 ,extra\n", "mem").unwrap();
        assert_eq!(
            samples,
            vec![
                PositionalSample::new(10.0, 20.0),
                PositionalSample::new(30.5, 40.0)
            ]
        );
    }

    #[test]
    fn parse_rejects_bad_rows_after_data() {
        let err = parse_samples("1,2\nfoo,bar\n", "mem").unwrap_err();
        assert!(matches!(err, ScraperError::Malformed { line: 2, .. }));

        let err = parse_samples("12\n", "mem").unwrap_err();
        assert!(matches!(err, ScraperError::Malformed { line: 1, .. }));
    }

    #[test]
    fn reads_samples_from_match_directory() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let root = std::env::temp_dir().join(format!("pitchplot_scraper_{}", nanos));
        let scraper = FileScraper::new(&root);
        let url = "https://www.sofascore.com/a-b/xyz#id:42";

        let path = scraper.sample_path(url, "Jane Doe");
        assert_eq!(path, root.join("42").join("jane_doe.txt"));
        fs::create_dir_all(path.parent().unwrap()).expect("create match dir");
        fs::write(&path, "x,y\n50,50\n60,40\n").expect("write samples");

        let samples = scraper.player_heatmap(url, "Jane Doe").unwrap();
        assert_eq!(samples.len(), 2);

        let missing = scraper.player_heatmap(url, "Nobody");
        assert!(matches!(missing, Err(ScraperError::PlayerNotFound { .. })));

        let _ = fs::remove_dir_all(&root);
    }
}
