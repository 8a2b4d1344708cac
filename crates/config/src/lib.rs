//! Configuration models and loaders for the Kepler's laws engine.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Central body parsed from body catalogs.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CentralBodyConfig {
    pub name: String,
    /// Standard gravitational parameter in simulation units.
    pub mu: f64,
    /// Radius at which an orbiting body is considered to have crashed.
    #[serde(default)]
    pub collision_radius: f64,
}

/// Named orbit used to seed a simulation (planets, comets, custom shapes).
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OrbitPresetConfig {
    pub name: String,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    #[serde(default)]
    pub argument_of_periapsis_deg: f64,
    #[serde(default)]
    pub start: StartPointConfig,
    #[serde(default)]
    pub direction: DirectionConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartPointConfig {
    #[default]
    Periapsis,
    Apoapsis,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DirectionConfig {
    #[default]
    Counterclockwise,
    Clockwise,
}

/// Law screen selected at start-up.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LawModeConfig {
    #[default]
    FirstLaw,
    SecondLaw,
    ThirdLaw,
}

/// Sub-stepping parameters for the integrator.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    #[serde(default = "default_substep_fraction")]
    pub substep_fraction: f64,
    #[serde(default = "default_max_substeps")]
    pub max_substeps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            substep_fraction: default_substep_fraction(),
            max_substeps: default_max_substeps(),
        }
    }
}

/// Display preferences passed through to the presentation layer.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreferencesConfig {
    #[serde(default)]
    pub more_orbital_data: bool,
}

/// Top-level simulation settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulationConfig {
    pub central_body: CentralBodyConfig,
    /// Name of the orbit preset to start from.
    pub preset: String,
    #[serde(default)]
    pub integrator: IntegratorConfig,
    #[serde(default = "default_divisions")]
    pub divisions: usize,
    #[serde(default)]
    pub law_mode: LawModeConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

fn default_substep_fraction() -> f64 {
    0.005
}

fn default_max_substeps() -> usize {
    5_000_000
}

fn default_divisions() -> usize {
    4
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration '{name}': {reason}")]
    Invalid { name: String, reason: String },
    #[error("{}: {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },
}

/// Load central bodies from a YAML file, a TOML file, or a directory of TOML/YAML record files.
pub fn load_central_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<CentralBodyConfig>, ConfigError> {
    let bodies: Vec<CentralBodyConfig> = load_records(path)?;
    for body in &bodies {
        validate_body(body)?;
    }
    Ok(bodies)
}

/// Load orbit presets from a YAML file, a TOML file, or a directory of TOML/YAML record files.
pub fn load_presets<P: AsRef<Path>>(path: P) -> Result<Vec<OrbitPresetConfig>, ConfigError> {
    let presets: Vec<OrbitPresetConfig> = load_records(path)?;
    for preset in &presets {
        validate_preset(preset)?;
    }
    Ok(presets)
}

/// Load a single simulation configuration (TOML or YAML by extension).
pub fn load_simulation<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    let config: SimulationConfig = if is_toml(path) {
        toml::from_str(&std::fs::read_to_string(path)?)?
    } else {
        serde_yaml::from_reader(File::open(path)?)?
    };
    validate_simulation(&config)?;
    Ok(config)
}

/// Find a preset by case-insensitive name.
pub fn find_preset<'a>(presets: &'a [OrbitPresetConfig], name: &str) -> Option<&'a OrbitPresetConfig> {
    let upper = name.to_uppercase();
    presets.iter().find(|p| p.name.to_uppercase() == upper)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        return read_dir_records(path);
    }
    match record_format(path) {
        Some(RecordFormat::Toml) => Ok(vec![parse_record(path, RecordFormat::Toml)?]),
        _ => {
            let reader = File::open(path)?;
            Ok(serde_yaml::from_reader(reader)?)
        }
    }
}

/// One record per file; `.toml`, `.yaml` and `.yml` files are read in name order.
fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut entries: Vec<(PathBuf, RecordFormat)> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter_map(|path| record_format(&path).map(|format| (path, format)))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    entries
        .into_iter()
        .map(|(path, format)| parse_record(&path, format))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordFormat {
    Toml,
    Yaml,
}

fn record_format(path: &Path) -> Option<RecordFormat> {
    match path.extension()?.to_str()? {
        "toml" => Some(RecordFormat::Toml),
        "yaml" | "yml" => Some(RecordFormat::Yaml),
        _ => None,
    }
}

fn is_toml(path: &Path) -> bool {
    record_format(path) == Some(RecordFormat::Toml)
}

/// Parse a single record, tagging any failure with the file it came from.
fn parse_record<T>(path: &Path, format: RecordFormat) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let parsed = std::fs::read_to_string(path)
        .map_err(ConfigError::from)
        .and_then(|contents| match format {
            RecordFormat::Toml => toml::from_str(&contents).map_err(ConfigError::from),
            RecordFormat::Yaml => serde_yaml::from_str(&contents).map_err(ConfigError::from),
        });
    parsed.map_err(|source| ConfigError::Record {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name: name.to_string(),
        reason: reason.into(),
    }
}

fn validate_body(body: &CentralBodyConfig) -> Result<(), ConfigError> {
    if !body.mu.is_finite() || body.mu <= 0.0 {
        return Err(invalid(&body.name, format!("mu must be positive (got {})", body.mu)));
    }
    if !body.collision_radius.is_finite() || body.collision_radius < 0.0 {
        return Err(invalid(
            &body.name,
            format!("collision_radius must be non-negative (got {})", body.collision_radius),
        ));
    }
    Ok(())
}

fn validate_preset(preset: &OrbitPresetConfig) -> Result<(), ConfigError> {
    if !preset.semi_major_axis.is_finite() || preset.semi_major_axis <= 0.0 {
        return Err(invalid(
            &preset.name,
            format!("semi_major_axis must be positive (got {})", preset.semi_major_axis),
        ));
    }
    if !(0.0..1.0).contains(&preset.eccentricity) {
        return Err(invalid(
            &preset.name,
            format!("eccentricity must be in [0, 1) (got {})", preset.eccentricity),
        ));
    }
    Ok(())
}

fn validate_simulation(config: &SimulationConfig) -> Result<(), ConfigError> {
    validate_body(&config.central_body)?;
    if !(2..=6).contains(&config.divisions) {
        return Err(invalid(
            &config.preset,
            format!("divisions must be between 2 and 6 (got {})", config.divisions),
        ));
    }
    let integrator = &config.integrator;
    if !integrator.substep_fraction.is_finite() || integrator.substep_fraction <= 0.0 {
        return Err(invalid(
            &config.preset,
            format!("substep_fraction must be positive (got {})", integrator.substep_fraction),
        ));
    }
    if integrator.max_substeps == 0 {
        return Err(invalid(&config.preset, "max_substeps must be at least 1"));
    }
    Ok(())
}
