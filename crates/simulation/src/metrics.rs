//! Law-specific read models and the extended orbital data panel.

use kepler_config::LawModeConfig;
use kepler_core::constants::kepler_constant;
use kepler_core::vector::{self, Vector2};
use kepler_divisions::{DivisionPlanner, Marker};
use kepler_orbits::{OrbitalElements, OrbitalState, circular_speed, escape_speed};
use serde::Serialize;

/// Which of Kepler's laws the presentation layer is showing. No physics effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LawMode {
    #[default]
    FirstLaw,
    SecondLaw,
    ThirdLaw,
}

impl From<LawModeConfig> for LawMode {
    fn from(value: LawModeConfig) -> Self {
        match value {
            LawModeConfig::FirstLaw => LawMode::FirstLaw,
            LawModeConfig::SecondLaw => LawMode::SecondLaw,
            LawModeConfig::ThirdLaw => LawMode::ThirdLaw,
        }
    }
}

/// Orbit shape: ellipse axes, foci and apsides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstLawMetrics {
    pub eccentricity: f64,
    pub semi_major_axis: Option<f64>,
    pub semi_minor_axis: Option<f64>,
    /// Centre-to-focus distance c = a·e.
    pub focal_distance: Option<f64>,
    pub center: Option<Vector2>,
    pub foci: Option<[Vector2; 2]>,
    pub periapsis_distance: f64,
    pub apoapsis_distance: Option<f64>,
    pub argument_of_periapsis: f64,
}

/// Equal areas in equal times.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondLawMetrics {
    pub division_count: usize,
    pub division_areas: Vec<f64>,
    pub markers: Option<Vec<Marker>>,
    pub active_interval: Option<usize>,
    /// πab/n: what every division converges to after a full period.
    pub expected_area: Option<f64>,
    pub total_area_swept: f64,
    pub areal_velocity: f64,
}

/// Period against semi-major axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThirdLawMetrics {
    pub semi_major_axis: Option<f64>,
    pub period: Option<f64>,
    pub semi_major_axis_cubed: Option<f64>,
    pub period_squared: Option<f64>,
    /// T²/a³, equal to `kepler_constant` for every bound orbit.
    pub ratio: Option<f64>,
    pub kepler_constant: f64,
}

/// The subset of derived quantities a law screen reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LawMetrics {
    First(FirstLawMetrics),
    Second(SecondLawMetrics),
    Third(ThirdLawMetrics),
}

impl LawMetrics {
    pub(crate) fn build(
        mode: LawMode,
        state: &OrbitalState,
        elements: &OrbitalElements,
        planner: &DivisionPlanner,
        total_area_swept: f64,
    ) -> Self {
        match mode {
            LawMode::FirstLaw => LawMetrics::First(FirstLawMetrics {
                eccentricity: elements.eccentricity,
                semi_major_axis: elements.semi_major_axis,
                semi_minor_axis: elements.semi_minor_axis,
                focal_distance: elements.semi_major_axis.map(|a| a * elements.eccentricity),
                center: elements.center,
                foci: elements.foci,
                periapsis_distance: elements.periapsis_distance,
                apoapsis_distance: elements.apoapsis_distance,
                argument_of_periapsis: elements.argument_of_periapsis,
            }),
            LawMode::SecondLaw => {
                let expected_area = if planner.is_defined() {
                    elements
                        .ellipse_area
                        .map(|area| area / planner.division_count() as f64)
                } else {
                    None
                };
                LawMetrics::Second(SecondLawMetrics {
                    division_count: planner.division_count(),
                    division_areas: planner.division_areas().to_vec(),
                    markers: planner.markers(),
                    active_interval: planner.active_interval(),
                    expected_area,
                    total_area_swept,
                    areal_velocity: elements.areal_velocity,
                })
            }
            LawMode::ThirdLaw => {
                let a_cubed = elements.semi_major_axis.map(|a| a.powi(3));
                let t_squared = elements.period.map(|t| t * t);
                LawMetrics::Third(ThirdLawMetrics {
                    semi_major_axis: elements.semi_major_axis,
                    period: elements.period,
                    semi_major_axis_cubed: a_cubed,
                    period_squared: t_squared,
                    ratio: a_cubed.zip(t_squared).map(|(a3, t2)| t2 / a3),
                    kepler_constant: kepler_constant(state.mu()),
                })
            }
        }
    }
}

/// Position and velocity decomposed for the "more orbital data" panel.
///
/// Always computed; whether it is displayed is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalData {
    pub position: Vector2,
    pub velocity: Vector2,
    pub distance: f64,
    pub speed: f64,
    /// Polar angle of the body from +x, in radians.
    pub polar_angle: f64,
    pub true_anomaly: f64,
    /// v⃗ · r̂; positive when receding.
    pub radial_velocity: f64,
    /// L / r; positive when moving counter-clockwise.
    pub tangential_velocity: f64,
    /// Angle between the velocity and the local horizontal, in radians.
    pub flight_path_angle: f64,
    pub circular_speed: f64,
    pub escape_speed: f64,
    pub kinetic_energy: f64,
    pub potential_energy: f64,
    pub specific_energy: f64,
}

impl OrbitalData {
    pub(crate) fn build(state: &OrbitalState, elements: &OrbitalElements) -> Self {
        let position = state.position();
        let velocity = state.velocity();
        let distance = state.radius();
        let speed = state.speed();
        let r_hat = vector::scale(&position, 1.0 / distance);
        let radial_velocity = vector::dot(&velocity, &r_hat);
        let tangential_velocity = elements.angular_momentum / distance;

        Self {
            position,
            velocity,
            distance,
            speed,
            polar_angle: position[1].atan2(position[0]),
            true_anomaly: elements.true_anomaly,
            radial_velocity,
            tangential_velocity,
            flight_path_angle: radial_velocity.atan2(tangential_velocity.abs()),
            circular_speed: circular_speed(state.mu(), distance),
            escape_speed: escape_speed(state.mu(), distance),
            kinetic_energy: 0.5 * speed * speed,
            potential_energy: -state.mu() / distance,
            specific_energy: elements.specific_energy,
        }
    }
}
