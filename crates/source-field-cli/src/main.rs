mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use source_field_core::observation::ObservationSummary;
use source_field_core::{EnvConfig, Environment, EnvironmentSnapshot};
use std::path::PathBuf;
use tracing::{debug, info};

const DEFAULT_SEED: u64 = 42;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
}

/// Survey a ring-shaped source field with random noisy detections.
#[derive(Parser, Debug)]
#[command(name = "source-field", allow_negative_numbers = true)]
struct Args {
    #[arg(long, default_value_t = 0.0)]
    start_x: f64,
    #[arg(long, default_value_t = 0.0)]
    start_y: f64,
    #[arg(long, default_value_t = 1.0)]
    end_x: f64,
    #[arg(long, default_value_t = 1.0)]
    end_y: f64,
    /// Grid step.
    #[arg(long, default_value_t = 0.001)]
    dl: f64,
    #[arg(long, default_value_t = 0.3)]
    source_x: f64,
    #[arg(long, default_value_t = 0.4)]
    source_y: f64,
    /// Number of uniformly random query points.
    #[arg(long, default_value_t = 100)]
    points: usize,
    #[arg(long)]
    seed: Option<u64>,
    /// JSON environment config; replaces the bounds, step and source flags.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,
    /// Overlay committed observations and the source origin.
    #[arg(long)]
    show_observations: bool,
    #[arg(long, default_value_t = 30)]
    rows: usize,
    #[arg(long, default_value_t = 60)]
    cols: usize,
}

#[derive(Serialize)]
struct SurveyReport {
    config: EnvConfig,
    points: usize,
    summary: ObservationSummary,
    snapshot: EnvironmentSnapshot,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(args: &Args) -> Result<EnvConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            EnvConfig::from_json_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => EnvConfig::from_args(
            args.start_x,
            args.start_y,
            args.end_x,
            args.end_y,
            args.dl,
            args.source_x,
            args.source_y,
        )
        .with_seed(DEFAULT_SEED),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("invalid environment config")?;
    Ok(config)
}

/// Commit one observation at each of `points` uniform random coordinates.
fn survey<R: Rng>(
    env: &mut Environment<R>,
    points: usize,
    seed: u64,
) -> Result<ObservationSummary> {
    let bounds = env.grid().bounds();
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    for _ in 0..points {
        let x = rng.random_range(bounds.start_x..bounds.end_x);
        let y = rng.random_range(bounds.start_y..bounds.end_y);
        let label = env
            .register_observation(x, y)
            .with_context(|| format!("failed to sample ({x}, {y})"))?;
        debug!(x, y, ?label, "observation");
    }
    Ok(env.observation_summary())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = build_config(&args)?;
    let mut env = Environment::try_new(config.clone()).context("failed to build environment")?;
    info!(
        width = env.grid().width(),
        height = env.grid().height(),
        source_x = config.source_origin[0],
        source_y = config.source_origin[1],
        "environment ready"
    );

    let summary = survey(&mut env, args.points, config.seed.wrapping_add(1))?;
    info!(
        points = args.points,
        positive = summary.positive,
        negative = summary.negative,
        "survey complete"
    );

    match args.format {
        OutputFormat::Ascii => {
            for line in render::render_ascii(&env, args.rows, args.cols, args.show_observations) {
                println!("{line}");
            }
            println!("{}", render::legend(args.show_observations));
        }
        OutputFormat::Json => {
            let report = SurveyReport {
                config,
                points: args.points,
                summary,
                snapshot: env.snapshot(args.show_observations),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
