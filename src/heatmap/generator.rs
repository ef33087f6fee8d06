use std::fmt;
use tracing::{debug, info};

use super::colormap::inferno;
use super::kde::gaussian_kde;
use crate::color::BLACK;
use crate::config::HeatmapSettings;
use crate::error::{Result, VizError};
use crate::figure::{Extent, Figure, FontWeight, HAlign, Panel, Point, Primitive, VAlign};
use crate::pitch::{PITCH_PANEL, PitchConfig, PitchType, pitch_figure};
use crate::render::FigureSink;
use crate::scraper::{PositionalSample, Scraper};

/// 16 x 9 inches at 100 dpi
const FIGURE_WIDTH: u32 = 1600;
const FIGURE_HEIGHT: u32 = 900;
const TITLE_SIZE: f32 = 14.0;
const ANNOTATION_PANEL: &str = "annotations";

/// Fetches a player's positional samples and renders them as a density
/// heatmap over an Opta pitch.
pub struct HeatmapGenerator {
    scraper: Box<dyn Scraper>,
    sink: Box<dyn FigureSink>,
    settings: HeatmapSettings,
}

impl HeatmapGenerator {
    pub fn new(scraper: Box<dyn Scraper>, sink: Box<dyn FigureSink>) -> Self {
        Self::with_settings(scraper, sink, HeatmapSettings::default())
    }

    pub fn with_settings(
        scraper: Box<dyn Scraper>,
        sink: Box<dyn FigureSink>,
        settings: HeatmapSettings,
    ) -> Self {
        Self {
            scraper,
            sink,
            settings,
        }
    }

    pub fn scraper(&self) -> &dyn Scraper {
        self.scraper.as_ref()
    }

    pub fn set_scraper(&mut self, scraper: Box<dyn Scraper>) {
        debug!("Heatmap scraper replaced with '{}'", scraper.name());
        self.scraper = scraper;
    }

    /// Samples straight from the scraper, unmodified.
    pub fn fetch_heatmap_data(
        &self,
        match_url: &str,
        player_name: &str,
    ) -> Result<Vec<PositionalSample>> {
        let samples = self.scraper.player_heatmap(match_url, player_name)?;
        info!(
            "Fetched {} samples for {} from {}",
            samples.len(),
            player_name,
            self.scraper.name()
        );
        Ok(samples)
    }

    /// Build the heatmap figure without showing it.
    pub fn build_heatmap(
        &self,
        samples: &[PositionalSample],
        player_name: &str,
        match_title: &str,
    ) -> Result<Figure> {
        if samples.is_empty() {
            return Err(VizError::EmptySamples);
        }

        let config = heatmap_pitch();
        let dims = config.pitch_type.dimensions();
        let extent = Extent {
            x_min: 0.0,
            x_max: dims.length,
            y_min: 0.0,
            y_max: dims.width,
        };
        let grid_size = self.settings.grid_size;
        let grid = gaussian_kde(samples, extent, grid_size, grid_size)?;

        let top = self.settings.levels.saturating_sub(1).max(1) as f64;
        let cells = grid
            .levels(self.settings.levels)
            .into_iter()
            .map(|level| Some(inferno(level as f64 / top)))
            .collect();

        let mut figure = pitch_figure(&config, FIGURE_WIDTH, FIGURE_HEIGHT, "heatmap")?;
        let pitch = figure
            .panel_mut(PITCH_PANEL)
            .ok_or_else(|| VizError::Render("pitch panel missing".into()))?;
        // Density sits beneath the pitch markings.
        pitch.primitives.insert(
            0,
            Primitive::Raster {
                extent,
                cols: grid.cols,
                rows: grid.rows,
                cells,
            },
        );

        let mut annotations = Panel::new(ANNOTATION_PANEL, pitch.rect, (0.0, 1.0), (0.0, 1.0));
        annotations.push(Primitive::Arrow {
            from: Point::new(0.5, 1.0),
            to: Point::new(0.6, 1.0),
            color: BLACK,
            width: 1.5,
        });
        annotations.push(Primitive::Text {
            at: Point::new(0.04, 1.0),
            text: format!("{} - {}", player_name, match_title),
            size: TITLE_SIZE,
            color: BLACK,
            weight: FontWeight::Thin,
            h_align: HAlign::Left,
            v_align: VAlign::Center,
        });
        figure.panels.push(annotations);
        Ok(figure)
    }

    /// Build the heatmap and show it.
    pub fn render_heatmap(
        &mut self,
        samples: &[PositionalSample],
        player_name: &str,
        match_title: &str,
    ) -> Result<()> {
        let figure = self.build_heatmap(samples, player_name, match_title)?;
        self.sink.show(&figure)
    }
}

impl fmt::Display for HeatmapGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeatmapGenerator()")
    }
}

fn heatmap_pitch() -> PitchConfig {
    PitchConfig {
        field_color: "white".to_string(),
        line_color: "#efefef".to_string(),
        stripes: false,
        pitch_type: PitchType::Opta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySink;
    use crate::scraper::ScraperError;

    struct FixedScraper(Vec<PositionalSample>);

    impl Scraper for FixedScraper {
        fn player_heatmap(
            &self,
            _match_url: &str,
            player: &str,
        ) -> std::result::Result<Vec<PositionalSample>, ScraperError> {
            if player == "Known Player" {
                Ok(self.0.clone())
            } else {
                Err(ScraperError::PlayerNotFound {
                    match_url: "m".into(),
                    player: player.into(),
                })
            }
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn cluster() -> Vec<PositionalSample> {
        (0..30)
            .map(|i| PositionalSample::new(60.0 + (i % 6) as f64, 40.0 + (i / 6) as f64))
            .collect()
    }

    fn generator(samples: Vec<PositionalSample>) -> (HeatmapGenerator, MemorySink) {
        let sink = MemorySink::new();
        let settings = HeatmapSettings {
            grid_size: 20,
            levels: 100,
        };
        let generator = HeatmapGenerator::with_settings(
            Box::new(FixedScraper(samples)),
            Box::new(sink.clone()),
            settings,
        );
        (generator, sink)
    }

    #[test]
    fn fetch_returns_scraper_samples_unmodified() {
        let (generator, _sink) = generator(cluster());
        let samples = generator.fetch_heatmap_data("m", "Known Player").unwrap();
        assert_eq!(samples, cluster());
    }

    #[test]
    fn fetch_propagates_scraper_errors() {
        let (generator, _sink) = generator(cluster());
        let err = generator.fetch_heatmap_data("m", "Someone Else").unwrap_err();
        assert!(matches!(
            err,
            VizError::Scraper(ScraperError::PlayerNotFound { .. })
        ));
    }

    #[test]
    fn set_scraper_replaces_source() {
        let (mut generator, _sink) = generator(cluster());
        generator.set_scraper(Box::new(FixedScraper(vec![PositionalSample::new(1.0, 2.0)])));
        assert_eq!(generator.scraper().name(), "fixed");
        let samples = generator.fetch_heatmap_data("m", "Known Player").unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn empty_samples_fail_before_rendering() {
        let (mut generator, sink) = generator(Vec::new());
        let err = generator.render_heatmap(&[], "P", "M").unwrap_err();
        assert!(matches!(err, VizError::EmptySamples));
        assert!(sink.is_empty());
    }

    #[test]
    fn figure_has_density_under_markings_and_title() {
        let (mut generator, sink) = generator(cluster());
        generator
            .render_heatmap(&cluster(), "Known Player", "A vs B")
            .unwrap();

        let figure = sink.last().unwrap();
        assert_eq!((figure.width, figure.height), (FIGURE_WIDTH, FIGURE_HEIGHT));

        let pitch = figure.panel(PITCH_PANEL).unwrap();
        let Primitive::Raster { cols, rows, cells, .. } = &pitch.primitives[0] else {
            panic!("density raster must be the bottom layer");
        };
        assert_eq!((*cols, *rows), (20, 20));
        assert!(cells.iter().all(|c| c.is_some()));
        assert!(!pitch.y_down);

        let annotations = figure.panel(ANNOTATION_PANEL).unwrap();
        assert_eq!(annotations.count("arrow"), 1);
        let title = annotations.primitives.iter().find_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.clone()),
            _ => None,
        });
        assert_eq!(title.as_deref(), Some("Known Player - A vs B"));
    }

    #[test]
    fn display_is_constant() {
        let (generator, _sink) = generator(Vec::new());
        assert_eq!(generator.to_string(), "HeatmapGenerator()");
    }
}
