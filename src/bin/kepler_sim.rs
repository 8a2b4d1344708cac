use std::f64::consts::PI;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use kepler_laws::config::{load_presets, load_simulation};
use kepler_laws::export::summary::{DivisionSummary, RunSummary, write_summary};
use kepler_laws::export::trace;
use kepler_laws::orbits::OrbitType;
use kepler_laws::primitives::units::rad_to_deg;
use kepler_laws::simulation::{LawMetrics, measure_period};
use kepler_laws::{LawMode, Simulation};

/// Run a Kepler orbit headless and report the metrics behind each law.
#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Kepler's laws simulation")]
struct Cli {
    /// Simulation configuration (TOML or YAML)
    #[arg(long, default_value = "configs/simulation.toml")]
    config: PathBuf,

    /// Orbit preset catalog (YAML file or directory of TOML files)
    #[arg(long, default_value = "configs/presets")]
    presets: PathBuf,

    /// Override the preset named in the configuration
    #[arg(long)]
    preset: Option<String>,

    /// Number of orbital periods to simulate
    #[arg(long, default_value_t = 1.0)]
    periods: f64,

    /// Animation frames per period (one `step` call each)
    #[arg(long, default_value_t = 360)]
    frames: usize,

    /// Override the number of equal-time divisions (2-6)
    #[arg(long)]
    divisions: Option<usize>,

    /// Law screen whose metrics are printed
    #[arg(long, value_enum)]
    law: Option<LawArg>,

    /// Write one CSV row per frame to this path (`-` for stdout)
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum LawArg {
    First,
    Second,
    Third,
}

impl From<LawArg> for LawMode {
    fn from(value: LawArg) -> Self {
        match value {
            LawArg::First => LawMode::FirstLaw,
            LawArg::Second => LawMode::SecondLaw,
            LawArg::Third => LawMode::ThirdLaw,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.frames == 0 {
        anyhow::bail!("--frames must be at least 1");
    }
    if !(cli.periods.is_finite() && cli.periods > 0.0) {
        anyhow::bail!("--periods must be positive");
    }

    let mut config = load_simulation(&cli.config)?;
    if let Some(preset) = &cli.preset {
        config.preset = preset.clone();
    }
    let presets = load_presets(&cli.presets)?;

    let mut sim = Simulation::from_config(&config, &presets)?;
    if let Some(count) = cli.divisions {
        sim.set_division_count(count)?;
    }
    if let Some(law) = cli.law {
        sim.set_law_mode(law.into());
    }

    let initial = sim.classification();
    let initial_energy = initial.elements.specific_energy;
    let time_scale = initial.elements.period.unwrap_or_else(|| {
        let r0 = sim.current_state().radius();
        2.0 * PI * (r0.powi(3) / config.central_body.mu).sqrt()
    });
    let frames = (cli.periods * cli.frames as f64).round().max(1.0) as usize;
    let dt = time_scale * cli.periods / frames as f64;

    let mut trace_writer = cli
        .trace
        .as_deref()
        .map(trace::TraceWriter::create)
        .transpose()?;

    let mut substeps = 0;
    let mut steps = 0;
    for _ in 0..frames {
        let report = sim.step(dt)?;
        substeps += report.substeps;
        steps += 1;

        if let Some(writer) = trace_writer.as_mut() {
            let state = sim.current_state();
            let classification = sim.classification();
            writer.write(&trace::Record {
                time: state.time(),
                position: state.position(),
                velocity: state.velocity(),
                radius: state.radius(),
                speed: state.speed(),
                specific_energy: classification.elements.specific_energy,
                angular_momentum: classification.elements.angular_momentum,
                eccentricity: classification.elements.eccentricity,
                orbit_type: orbit_type_label(classification.orbit_type),
                active_division: sim.divisions().active_interval(),
                total_area: sim.total_area_swept(),
            })?;
        }

        if sim.current_state().crashed() {
            break;
        }
    }
    if let Some(writer) = trace_writer {
        let rows = writer.finish()?;
        tracing::debug!(rows, "trace written");
    }

    let classification = sim.classification();
    let elements = &classification.elements;
    let measured_period = measure_period(sim.initial_state(), sim.settings().integrator)?;
    let energy_drift = if initial_energy != 0.0 {
        ((elements.specific_energy - initial_energy) / initial_energy).abs()
    } else {
        (elements.specific_energy - initial_energy).abs()
    };

    println!("=== Kepler Simulation (v{}) ===", kepler_laws::version());
    println!("Preset          : {}", config.preset);
    println!("Central body    : {} (mu = {:.6})", config.central_body.name, config.central_body.mu);
    println!("Orbit type      : {}", orbit_type_label(classification.orbit_type));
    println!(
        "Simulated       : t = {:.6} over {} frames ({} sub-steps)",
        sim.time(),
        steps,
        substeps
    );
    println!("Energy drift    : {:.3e} (relative)", energy_drift);

    match sim.law_metrics() {
        LawMetrics::First(first) => {
            println!("--- Law 1: orbits are ellipses with the Sun at one focus ---");
            println!("Eccentricity    : {:.6}", first.eccentricity);
            println!("Semi-major axis : {}", fmt_option(first.semi_major_axis));
            println!("Semi-minor axis : {}", fmt_option(first.semi_minor_axis));
            println!("Focal distance  : {}", fmt_option(first.focal_distance));
            println!(
                "Periapsis       : {:.6} at {:.3} deg",
                first.periapsis_distance,
                rad_to_deg(first.argument_of_periapsis)
            );
            println!("Apoapsis        : {}", fmt_option(first.apoapsis_distance));
        }
        LawMetrics::Second(second) => {
            println!("--- Law 2: equal areas in equal times ---");
            println!("Divisions       : {}", second.division_count);
            for (index, area) in second.division_areas.iter().enumerate() {
                let deviation = second
                    .expected_area
                    .map(|expected| format!("{:+.3e}", (area - expected) / expected))
                    .unwrap_or_else(|| "undefined".to_string());
                println!("  division {}    : area = {:.9} (deviation {})", index, area, deviation);
            }
            println!("Expected area   : {}", fmt_option(second.expected_area));
            println!("Total swept     : {:.9}", second.total_area_swept);
        }
        LawMetrics::Third(third) => {
            println!("--- Law 3: T^2 is proportional to a^3 ---");
            println!("Semi-major axis : {}", fmt_option(third.semi_major_axis));
            println!("Period          : {}", fmt_option(third.period));
            println!("Measured period : {}", fmt_option(measured_period));
            println!("T^2 / a^3       : {}", fmt_option(third.ratio));
            println!("4 pi^2 / mu     : {:.6}", third.kepler_constant);
        }
    }

    if let Some(path) = &cli.summary {
        let expected = if sim.divisions().is_defined() {
            elements
                .ellipse_area
                .map(|area| area / sim.division_count() as f64)
        } else {
            None
        };
        let summary = RunSummary {
            preset: config.preset.clone(),
            central_body: config.central_body.name.clone(),
            mu: config.central_body.mu,
            orbit_type: orbit_type_label(classification.orbit_type).to_string(),
            simulated_time: sim.time(),
            steps,
            substeps,
            eccentricity: elements.eccentricity,
            semi_major_axis: elements.semi_major_axis,
            semi_minor_axis: elements.semi_minor_axis,
            period: elements.period,
            measured_period,
            ellipse_area: elements.ellipse_area,
            total_area_swept: sim.total_area_swept(),
            energy_drift,
            divisions: sim
                .division_areas()
                .iter()
                .enumerate()
                .map(|(index, area)| DivisionSummary {
                    index,
                    area: *area,
                    deviation: expected.map(|e| (area - e) / e),
                })
                .collect(),
        };
        write_summary(path, &summary)?;
        tracing::info!(path = %path.display(), "summary written");
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn orbit_type_label(orbit_type: OrbitType) -> &'static str {
    match orbit_type {
        OrbitType::Stable => "stable",
        OrbitType::Escape => "escape",
        OrbitType::Crash => "crash",
    }
}

fn fmt_option(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.6}", v))
        .unwrap_or_else(|| "undefined".to_string())
}
