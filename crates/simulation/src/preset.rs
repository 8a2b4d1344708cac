//! Conversion from configuration records to initial orbital states.

use kepler_config::{CentralBodyConfig, DirectionConfig, OrbitPresetConfig, StartPointConfig};
use kepler_core::units::deg_to_rad;
use kepler_orbits::{Direction, OrbitalState, StartPoint, StateError};

/// Place a body on the preset ellipse around `body`.
pub fn state_from_preset(
    body: &CentralBodyConfig,
    preset: &OrbitPresetConfig,
) -> Result<OrbitalState, StateError> {
    let start = match preset.start {
        StartPointConfig::Periapsis => StartPoint::Periapsis,
        StartPointConfig::Apoapsis => StartPoint::Apoapsis,
    };
    let direction = match preset.direction {
        DirectionConfig::Counterclockwise => Direction::Counterclockwise,
        DirectionConfig::Clockwise => Direction::Clockwise,
    };

    OrbitalState::from_elements(
        body.mu,
        body.collision_radius,
        preset.semi_major_axis,
        preset.eccentricity,
        deg_to_rad(preset.argument_of_periapsis_deg),
        start,
        direction,
    )
}
