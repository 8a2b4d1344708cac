//! Period versus semi-major axis across a catalog of orbits.

use std::f64::consts::{PI, TAU};

use kepler_config::{CentralBodyConfig, OrbitPresetConfig};
use kepler_orbits::{Integrator, IntegratorSettings, OrbitType, OrbitalState, classify};
use serde::Serialize;

use crate::error::SimulationError;

/// One line of the T²/a³ comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThirdLawRow {
    pub name: String,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub period: f64,
    pub semi_major_axis_cubed: f64,
    pub period_squared: f64,
    pub ratio: f64,
}

/// Analytic periods for every preset around `body`.
pub fn third_law_table(body: &CentralBodyConfig, presets: &[OrbitPresetConfig]) -> Vec<ThirdLawRow> {
    presets
        .iter()
        .map(|preset| {
            let a = preset.semi_major_axis;
            let a_cubed = a.powi(3);
            let period = 2.0 * PI * (a_cubed / body.mu).sqrt();
            let period_squared = period * period;
            ThirdLawRow {
                name: preset.name.clone(),
                semi_major_axis: a,
                eccentricity: preset.eccentricity,
                period,
                semi_major_axis_cubed: a_cubed,
                period_squared,
                ratio: period_squared / a_cubed,
            }
        })
        .collect()
}

/// Time for the body to sweep one full revolution, measured by integration.
///
/// Returns `None` for orbits without a period, and for orbits that crash or
/// fail to close within twice the analytic period.
pub fn measure_period(
    state: &OrbitalState,
    settings: IntegratorSettings,
) -> Result<Option<f64>, SimulationError> {
    let classification = classify(state);
    let Some(expected) = classification.elements.period else {
        return Ok(None);
    };
    if classification.orbit_type != OrbitType::Stable {
        return Ok(None);
    }

    let mut integrator = Integrator::new(state.clone(), settings)?;
    let chunk = integrator.max_substep();
    let start_time = state.time();
    let mut previous = polar_angle(state);
    let mut swept = 0.0_f64;

    loop {
        let before = integrator.state().time();
        integrator.step(chunk)?;
        let current = integrator.state();
        if current.crashed() {
            return Ok(None);
        }

        let angle = polar_angle(current);
        let delta = (angle - previous + PI).rem_euclid(TAU) - PI;
        let next = swept + delta.abs();
        if next >= TAU {
            let fraction = (TAU - swept) / (next - swept);
            return Ok(Some(before + fraction * chunk - start_time));
        }
        swept = next;
        previous = angle;

        if current.time() - start_time > 2.0 * expected {
            return Ok(None);
        }
    }
}

fn polar_angle(state: &OrbitalState) -> f64 {
    let position = state.position();
    position[1].atan2(position[0])
}
