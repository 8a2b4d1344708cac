use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kepler_laws::config::{load_central_bodies, load_presets};
use kepler_laws::orbits::IntegratorSettings;
use kepler_laws::simulation::{measure_period, state_from_preset, third_law_table};

/// Print T, a and T²/a³ for every orbit preset around a central body.
#[derive(Parser, Debug)]
#[command(author, version, about = "Kepler third-law table for the preset catalog")]
struct Cli {
    /// Central body catalog (YAML file or directory of TOML files)
    #[arg(long, default_value = "configs/bodies.yaml")]
    bodies: PathBuf,

    /// Central body name (case-insensitive)
    #[arg(long, default_value = "SUN")]
    body: String,

    /// Orbit preset catalog (YAML file or directory of TOML files)
    #[arg(long, default_value = "configs/presets")]
    presets: PathBuf,

    /// Also integrate each orbit and report the measured period
    #[arg(long, default_value_t = false)]
    measure: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let bodies = load_central_bodies(&cli.bodies)?;
    let upper = cli.body.to_uppercase();
    let body = bodies
        .iter()
        .find(|b| b.name.to_uppercase() == upper)
        .ok_or_else(|| anyhow::anyhow!("Central body '{}' not found in catalog", cli.body))?;
    let presets = load_presets(&cli.presets)?;

    println!(
        "{:<10} {:>10} {:>8} {:>12} {:>14} {:>14} {:>10}{}",
        "orbit",
        "a",
        "e",
        "T",
        "a^3",
        "T^2",
        "T^2/a^3",
        if cli.measure { "   measured T" } else { "" }
    );

    for (row, preset) in third_law_table(body, &presets).iter().zip(&presets) {
        let measured = if cli.measure {
            let state = state_from_preset(body, preset)?;
            match measure_period(&state, IntegratorSettings::default())? {
                Some(period) => format!(" {:>14.6}", period),
                None => format!(" {:>14}", "undefined"),
            }
        } else {
            String::new()
        };
        println!(
            "{:<10} {:>10.4} {:>8.4} {:>12.6} {:>14.6} {:>14.6} {:>10.6}{}",
            row.name,
            row.semi_major_axis,
            row.eccentricity,
            row.period,
            row.semi_major_axis_cubed,
            row.period_squared,
            row.ratio,
            measured
        );
    }

    Ok(())
}
