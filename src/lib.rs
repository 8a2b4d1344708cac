//! Orbital mechanics engine for teaching Kepler's three laws.
//!
//! The engine lives in the member crates; this crate re-exports them so that
//! front-ends (the bundled CLI, a GUI, a web build) share a single entry point.

pub use kepler_config as config;
pub use kepler_core as primitives;
pub use kepler_divisions as divisions;
pub use kepler_export as export;
pub use kepler_orbits as orbits;
pub use kepler_simulation as simulation;

pub use kepler_simulation::{LawMode, Simulation, SimulationError, SimulationSettings};

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
