//! Simulation façade for the Kepler's laws orbital engine.
//!
//! Wraps the integrator, classifier and division planner behind the command
//! and query surface a presentation layer drives once per animation frame.

pub mod error;
pub mod metrics;
pub mod observer;
pub mod preset;
pub mod simulation;
pub mod third_law;

pub use error::{ErrorKind, SimulationError};
pub use metrics::{
    FirstLawMetrics, LawMetrics, LawMode, OrbitalData, SecondLawMetrics, ThirdLawMetrics,
};
pub use observer::{ObserverId, Snapshot};
pub use preset::state_from_preset;
pub use simulation::{Simulation, SimulationSettings};
pub use third_law::{ThirdLawRow, measure_period, third_law_table};
