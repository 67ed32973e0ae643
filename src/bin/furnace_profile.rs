// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! furnace-profile: compute the temperature and pressure curves for a
//! recipe and write them as JSON for the plotting front end.

use anyhow::{Context, bail};
use clap::Parser;
use furnace_profile::calibration::CurveInterpolator;
use furnace_profile::config;
use furnace_profile::profile::{ProfileCalculator, ProfileRequest};
use furnace_profile::report::{self, ProfileReport};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "furnace-profile", about = "Furnace temperature and pressure profile calculator")]
struct Cli {
    /// Recipe records to compute, as `.toml` or `.json`.
    request: PathBuf,

    /// Path to the configuration file.
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = config::resolve_config_path(Some(&cli.config));
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Could not load config {}", config_path.display()))?;

    let request = load_request(&cli.request)?;
    let calculator = ProfileCalculator::new(CurveInterpolator::default(), cfg);
    let curves = calculator
        .compute(&request)
        .with_context(|| format!("Failed to compute profile {}", cli.request.display()))?;

    let report = ProfileReport::new(request.name.clone(), curves);
    log::info!(
        "Estimated time: {:.1} hours, peak pressure {:.1} Torr",
        report.summary.total_time_hours,
        report.summary.peak_pressure
    );

    let encoded = if cli.pretty {
        report::encode_pretty(&report)?
    } else {
        report::encode(&report)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, encoded).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote report to {}", path.display());
        }
        None => std::io::stdout().lock().write_all(encoded.as_bytes())?,
    }
    Ok(())
}

fn load_request(path: &Path) -> anyhow::Result<ProfileRequest> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let request: ProfileRequest = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
        Some("json") => report::decode(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?,
        _ => bail!("Unsupported request format: {} (expected .toml or .json)", path.display()),
    };

    log::info!(
        "Loaded {} segment(s), {} heating and {} cooling switch point(s) from {}",
        request.segments.len(),
        request.heating_switch_points.len(),
        request.cooling_switch_points.len(),
        path.display()
    );
    Ok(request)
}
