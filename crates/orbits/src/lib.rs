//! Two-body orbit state, propagation, and classification.

pub mod classifier;
pub mod integrator;
pub mod state;

pub use classifier::{Classification, OrbitType, OrbitalElements, classify, orbit_type};
pub use integrator::{Integrator, IntegratorError, IntegratorSettings, StepReport, Sweep};
pub use state::{Direction, OrbitalState, StartPoint, StateError};

/// Speed of a circular orbit of radius `radius`.
pub fn circular_speed(mu: f64, radius: f64) -> f64 {
    (mu / radius).sqrt()
}

/// Speed at which a body at `radius` is exactly unbound (ε = 0).
pub fn escape_speed(mu: f64, radius: f64) -> f64 {
    (2.0 * mu / radius).sqrt()
}

/// Vis-viva speed at `radius` on an orbit of semi-major axis `semi_major_axis`.
pub fn vis_viva_speed(mu: f64, radius: f64, semi_major_axis: f64) -> f64 {
    (mu * (2.0 / radius - 1.0 / semi_major_axis)).sqrt()
}
