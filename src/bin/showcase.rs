//! Chart showcase
//!
//! Renders one of every chart into the configured output directory:
//! a player heatmap, a two-player radar and each pitch diagram.
//!
//! Usage:
//!   cargo run --bin showcase
//!   cargo run --bin showcase -- --config config/pitchplot.toml
//!   cargo run --bin showcase -- --samples-root data/matches --match "https://example.com/match/123" --player "Jane Doe"
//!   cargo run --bin showcase -- --dataset data/radar.json --players "A" "B"
//!
//! Without `--samples-root` the heatmap uses a seeded synthetic player.
//! Without `--dataset` the radar uses a small built-in dataset.
//! Set RUST_LOG to change verbosity (default `info`).

use pitchplot::heatmap::HeatmapGenerator;
use pitchplot::scraper::{FileScraper, PositionalSample, Scraper, ScraperError};
use pitchplot::{
    ComparativeRadarGenerator, PitchConfig, PitchVisualizer, PngSink, RadarDataset, Result,
    VizConfig, fonts,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEMO_MATCH: &str = "demo-match";
const DEMO_PLAYER: &str = "Demo Player";
const SYNTHETIC_SEED: u64 = 7;
const SYNTHETIC_SAMPLES: usize = 400;

struct ShowcaseArgs {
    config: Option<PathBuf>,
    samples_root: Option<PathBuf>,
    match_url: String,
    player: String,
    dataset: Option<PathBuf>,
    radar_players: Option<(String, String)>,
}

fn parse_args() -> ShowcaseArgs {
    let mut parsed = ShowcaseArgs {
        config: None,
        samples_root: None,
        match_url: DEMO_MATCH.to_string(),
        player: DEMO_PLAYER.to_string(),
        dataset: None,
        radar_players: None,
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = args.next().map(PathBuf::from),
            "--samples-root" => parsed.samples_root = args.next().map(PathBuf::from),
            "--match" => {
                if let Some(value) = args.next() {
                    parsed.match_url = value;
                }
            }
            "--player" => {
                if let Some(value) = args.next() {
                    parsed.player = value;
                }
            }
            "--dataset" => parsed.dataset = args.next().map(PathBuf::from),
            "--players" => {
                if let (Some(a), Some(b)) = (args.next(), args.next()) {
                    parsed.radar_players = Some((a, b));
                }
            }
            other => eprintln!("Ignoring unknown argument '{}'", other),
        }
    }

    parsed
}

/// Seeded stand-in for a network scraper: a winger drifting down the right.
struct SyntheticScraper {
    seed: u64,
}

impl Scraper for SyntheticScraper {
    fn player_heatmap(
        &self,
        _match_url: &str,
        _player: &str,
    ) -> std::result::Result<Vec<PositionalSample>, ScraperError> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let samples = (0..SYNTHETIC_SAMPLES)
            .map(|_| {
                let x: f64 = rng.gen_range(30.0..95.0);
                let y: f64 = 15.0 + rng.gen_range(-10.0..10.0) + (x - 30.0) * 0.1;
                PositionalSample::new(x, y.clamp(0.0, 100.0))
            })
            .collect();
        Ok(samples)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

fn demo_dataset() -> Result<RadarDataset> {
    let metrics = ["Goals", "Assists", "Key Passes", "Dribbles", "Tackles", "Shots"];
    let players = BTreeMap::from([
        ("Player A".to_string(), vec![0.62, 0.31, 2.4, 3.1, 0.8, 3.6]),
        ("Player B".to_string(), vec![0.28, 0.44, 3.3, 1.2, 2.2, 1.9]),
    ]);
    RadarDataset::new(
        metrics.iter().map(|m| m.to_string()).collect(),
        vec![0.0; metrics.len()],
        vec![1.0, 1.0, 4.0, 4.0, 3.0, 5.0],
        players,
    )
}

fn run_heatmap(args: &ShowcaseArgs, config: &VizConfig) -> Result<()> {
    let scraper: Box<dyn Scraper> = match &args.samples_root {
        Some(root) => Box::new(FileScraper::new(root)),
        None => Box::new(SyntheticScraper {
            seed: SYNTHETIC_SEED,
        }),
    };
    let mut generator = HeatmapGenerator::with_settings(
        scraper,
        Box::new(PngSink::new(&config.output_dir)),
        config.heatmap.clone(),
    );
    let samples = generator.fetch_heatmap_data(&args.match_url, &args.player)?;
    generator.render_heatmap(&samples, &args.player, &args.match_url)
}

fn run_radar(args: &ShowcaseArgs, config: &VizConfig) -> Result<()> {
    let dataset = match &args.dataset {
        Some(path) => load_dataset(path)?,
        None => demo_dataset()?,
    };
    let (p1, p2) = match &args.radar_players {
        Some(pair) => pair.clone(),
        None => {
            let mut names = dataset.player_names().map(str::to_string);
            match (names.next(), names.next()) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(pitchplot::VizError::Validation(
                        "radar dataset needs two players, pass --players".into(),
                    ));
                }
            }
        }
    };

    let mut generator =
        ComparativeRadarGenerator::new(dataset, Box::new(PngSink::new(&config.output_dir)));
    info!("{}", generator);
    generator.generate_radar(&p1, "Home", "red", &p2, "Away", "blue")
}

fn load_dataset(path: &Path) -> Result<RadarDataset> {
    let contents = fs::read_to_string(path)?;
    RadarDataset::from_json_str(&contents)
}

fn run_pitch(config: &VizConfig) -> Result<()> {
    let mut viz = PitchVisualizer::with_size(
        PitchConfig::default(),
        config.figure.clone(),
        Box::new(PngSink::new(&config.output_dir)),
    )?;
    info!("{}", viz);

    viz.draw_pitch()?;
    viz.draw_pass_direction(30.0, 40.0, 70.0, 20.0)?;
    viz.draw_shot_direction(100.0, 30.0, 120.0, 38.0)?;
    viz.draw_player_position(60.0, 40.0)?;
    viz.draw_player_position_with_arrow(60.0, 40.0, 45.0)?;
    viz.draw_ball_position(90.0, 50.0)?;
    viz.draw_shot_angle(105.0, 30.0, 0.5, "red")?;
    viz.draw_zones(
        &[
            vec![(0.0, 0.0), (40.0, 0.0), (40.0, 80.0), (0.0, 80.0)],
            vec![(80.0, 0.0), (120.0, 0.0), (120.0, 80.0), (80.0, 80.0)],
        ],
        &["blue", "red"],
        &[0.3, 0.3],
    )?;

    viz.set_stripes(false)?;
    viz.set_field_color("navy")?;
    viz.draw_pitch()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();
    let config = match &args.config {
        Some(path) => match VizConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => VizConfig::load(),
    };

    if let Err(e) = fonts::init(&config.fonts) {
        error!("Font setup failed: {}", e);
        process::exit(1);
    }

    let mut failed = false;
    for (name, outcome) in [
        ("heatmap", run_heatmap(&args, &config)),
        ("radar", run_radar(&args, &config)),
        ("pitch", run_pitch(&config)),
    ] {
        match outcome {
            Ok(()) => info!("Finished {} charts", name),
            Err(e) => {
                error!("{} charts failed: {}", name, e);
                failed = true;
            }
        }
    }

    if failed {
        process::exit(1);
    }
    info!("Charts written to {}", config.output_dir.display());
}
