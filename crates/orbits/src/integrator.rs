//! Velocity-Verlet propagation of an [`OrbitalState`] under inverse-square gravity.
//!
//! The scheme is symplectic and time-reversible, so a bound orbit keeps its
//! energy bounded over long runs instead of drifting. Angular momentum is
//! conserved to rounding error because every kick is radial.

use kepler_core::vector::{self, Vector2};
use serde::Serialize;
use thiserror::Error;

use crate::classifier::RADIAL_TOLERANCE;
use crate::state::OrbitalState;

/// Bisection passes used to locate the collision time inside a sub-step.
const COLLISION_BISECTION_STEPS: usize = 64;
/// Radii below this fraction of the initial radius are treated as a collision
/// even when the configured collision radius is zero.
const SINGULAR_RADIUS_FRACTION: f64 = 1.0e-9;
/// Sub-step length scale for radial fall, as a fraction of the initial radius.
const RADIAL_LENGTH_SCALE_FRACTION: f64 = 1.0e-2;

/// Tunables for sub-stepping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntegratorSettings {
    /// Sub-step length as a fraction of the periapsis dynamical time √(q³/μ).
    ///
    /// q is floored by the crash radius, so grazing orbits are not resolved
    /// beyond the point where they stop.
    pub substep_fraction: f64,
    /// Hard cap on sub-steps performed by a single call.
    pub max_substeps: usize,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            substep_fraction: 0.005,
            max_substeps: 5_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegratorError {
    #[error("time step must be non-negative (got {0})")]
    NegativeTimeStep(f64),
    #[error("time step must be finite (got {0})")]
    NonFiniteTimeStep(f64),
    #[error("time step needs {requested} sub-steps, above the limit of {limit}")]
    TooManySubsteps { requested: f64, limit: usize },
    #[error("invalid integrator settings: {0}")]
    InvalidSettings(String),
    #[error("state became non-finite at t = {time}")]
    NumericDegeneracy { time: f64 },
}

/// Area swept by the radius vector during one sub-step.
///
/// Both fields carry the sign of the time direction, so reversing a step
/// produces the exact negation of the forward sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sweep {
    pub duration: f64,
    pub area: f64,
}

/// Outcome of a single `step`/`reverse` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepReport {
    /// Signed simulated time actually advanced (shorter than requested after a crash).
    pub elapsed: f64,
    pub substeps: usize,
    /// True when this call ended on the collision radius.
    pub crashed: bool,
    pub sweeps: Vec<Sweep>,
}

impl StepReport {
    /// Net signed area swept during the call.
    pub fn swept_area(&self) -> f64 {
        self.sweeps.iter().map(|s| s.area).sum()
    }
}

/// Single writer of the orbital state.
#[derive(Debug, Clone)]
pub struct Integrator {
    state: OrbitalState,
    settings: IntegratorSettings,
    max_substep: f64,
    crash_radius: f64,
}

impl Integrator {
    /// Take ownership of a freshly initialized state.
    pub fn new(state: OrbitalState, settings: IntegratorSettings) -> Result<Self, IntegratorError> {
        if !settings.substep_fraction.is_finite() || settings.substep_fraction <= 0.0 {
            return Err(IntegratorError::InvalidSettings(format!(
                "substep_fraction must be positive (got {})",
                settings.substep_fraction
            )));
        }
        if settings.max_substeps == 0 {
            return Err(IntegratorError::InvalidSettings(
                "max_substeps must be at least 1".to_string(),
            ));
        }

        let (max_substep, crash_radius) = session_scales(&state, &settings);
        Ok(Self {
            state,
            settings,
            max_substep,
            crash_radius,
        })
    }

    pub fn state(&self) -> &OrbitalState {
        &self.state
    }

    pub fn settings(&self) -> IntegratorSettings {
        self.settings
    }

    /// Longest sub-step used by this session.
    pub fn max_substep(&self) -> f64 {
        self.max_substep
    }

    /// Radius at which the body is stopped.
    pub fn crash_radius(&self) -> f64 {
        self.crash_radius
    }

    /// Advance the state by `dt` of simulated time.
    pub fn step(&mut self, dt: f64) -> Result<StepReport, IntegratorError> {
        check_time_step(dt)?;
        self.advance(dt)
    }

    /// Run the state backwards by `dt` of simulated time.
    pub fn reverse(&mut self, dt: f64) -> Result<StepReport, IntegratorError> {
        check_time_step(dt)?;
        self.advance(-dt)
    }

    fn advance(&mut self, dt: f64) -> Result<StepReport, IntegratorError> {
        if self.state.crashed || dt == 0.0 {
            return Ok(StepReport::default());
        }

        let requested = (dt.abs() / self.max_substep).ceil().max(1.0);
        if requested > self.settings.max_substeps as f64 {
            return Err(IntegratorError::TooManySubsteps {
                requested,
                limit: self.settings.max_substeps,
            });
        }
        let n = requested as usize;
        let h = dt / n as f64;
        let mu = self.state.mu;

        // Work on a copy so that a failure leaves the committed state untouched.
        let mut work = self.state.clone();
        let mut report = StepReport {
            sweeps: Vec::with_capacity(n),
            ..StepReport::default()
        };

        for _ in 0..n {
            let (mut position, mut velocity) = verlet(mu, &work.position, &work.velocity, h);
            if !vector::is_finite(&position) {
                return Err(IntegratorError::NumericDegeneracy { time: work.time });
            }

            let mut taken = h;
            if self.reaches_crash_radius(&work.position, &position) {
                let tau = self.collision_fraction(&work, h);
                taken = h * tau;
                (position, velocity) = verlet(mu, &work.position, &work.velocity, taken);
                work.crashed = true;
                report.crashed = true;
            }
            if !vector::is_finite(&position) || !vector::is_finite(&velocity) {
                return Err(IntegratorError::NumericDegeneracy { time: work.time });
            }

            let area = 0.5 * vector::cross(&work.position, &position).abs();
            report.sweeps.push(Sweep {
                duration: taken,
                area: area.copysign(taken),
            });
            report.elapsed += taken;
            report.substeps += 1;

            work.position = position;
            work.velocity = velocity;
            work.time += taken;

            if work.crashed {
                break;
            }
        }

        self.state = work;
        Ok(report)
    }

    /// True when the chord from `from` to `to` passes inside the crash radius.
    ///
    /// Testing the chord instead of the end point catches a fast body that
    /// would otherwise jump across the central body within one sub-step.
    fn reaches_crash_radius(&self, from: &Vector2, to: &Vector2) -> bool {
        let chord = vector::sub(to, from);
        let length_squared = vector::norm_squared(&chord);
        let closest = if length_squared == 0.0 {
            *from
        } else {
            let t = (-vector::dot(from, &chord) / length_squared).clamp(0.0, 1.0);
            vector::add_scaled(from, &chord, t)
        };
        vector::norm(&closest) < self.crash_radius
    }

    /// Fraction of the sub-step `h` at which the body reaches the crash radius.
    fn collision_fraction(&self, from: &OrbitalState, h: f64) -> f64 {
        let mut outside = 0.0_f64;
        let mut inside = 1.0_f64;
        for _ in 0..COLLISION_BISECTION_STEPS {
            let mid = 0.5 * (outside + inside);
            let (position, _) = verlet(from.mu, &from.position, &from.velocity, h * mid);
            if self.reaches_crash_radius(&from.position, &position) {
                inside = mid;
            } else {
                outside = mid;
            }
        }
        outside
    }
}

fn check_time_step(dt: f64) -> Result<(), IntegratorError> {
    if !dt.is_finite() {
        return Err(IntegratorError::NonFiniteTimeStep(dt));
    }
    if dt < 0.0 {
        return Err(IntegratorError::NegativeTimeStep(dt));
    }
    Ok(())
}

/// Sub-step length and crash radius, both fixed for the lifetime of a state.
///
/// Using the periapsis of the initial orbit keeps the sub-step independent of
/// where along the orbit a call starts, so stepping forward and back use the
/// same sequence of sub-steps. The periapsis pass is the fastest part of the
/// orbit, so the step resolves it however eccentric the orbit is.
///
/// A radial fall has no periapsis; it only has to resolve the approach to the
/// crash radius, which the bisection in `advance` pins down.
fn session_scales(state: &OrbitalState, settings: &IntegratorSettings) -> (f64, f64) {
    let r0 = state.radius();
    let crash_radius = state.collision_radius.max(SINGULAR_RADIUS_FRACTION * r0);

    let mu = state.mu;
    let speed = state.speed();
    let l = state.angular_momentum();
    let radial = speed == 0.0 || l.abs() <= RADIAL_TOLERANCE * r0 * speed;

    let length = if radial {
        crash_radius.max(RADIAL_LENGTH_SCALE_FRACTION * r0)
    } else {
        let energy = state.specific_energy();
        let e = (1.0 + 2.0 * energy * l * l / (mu * mu)).max(0.0).sqrt();
        let periapsis = (l * l / mu) / (1.0 + e);
        periapsis.max(crash_radius)
    };
    let max_substep = settings.substep_fraction * (length.powi(3) / mu).sqrt();
    (max_substep, crash_radius)
}

/// One kick-drift-kick update.
fn verlet(mu: f64, position: &Vector2, velocity: &Vector2, h: f64) -> (Vector2, Vector2) {
    let a0 = OrbitalState::acceleration_at(mu, position);
    let v_half = vector::add_scaled(velocity, &a0, 0.5 * h);
    let next_position = vector::add_scaled(position, &v_half, h);
    let a1 = OrbitalState::acceleration_at(mu, &next_position);
    let next_velocity = vector::add_scaled(&v_half, &a1, 0.5 * h);
    (next_position, next_velocity)
}
