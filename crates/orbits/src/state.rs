//! Physical state of a single body orbiting an immovable central mass.

use kepler_core::vector::{self, Vector2};
use serde::Serialize;
use thiserror::Error;

use crate::vis_viva_speed;

/// Errors raised when a position/velocity pair cannot describe an orbit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("position must not be the zero vector")]
    ZeroPosition,
    #[error("position and velocity must be finite")]
    NonFiniteVector,
    #[error("gravitational parameter must be positive and finite (got {0})")]
    InvalidMu(f64),
    #[error("collision radius must be non-negative and finite (got {0})")]
    InvalidCollisionRadius(f64),
    #[error("initial radius {radius} lies inside the collision radius {collision_radius}")]
    InsideCentralBody { radius: f64, collision_radius: f64 },
    #[error("orbit elements are not bound: a = {semi_major_axis}, e = {eccentricity}")]
    UnboundElements {
        semi_major_axis: f64,
        eccentricity: f64,
    },
}

/// Where along the ellipse a body built from elements starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StartPoint {
    #[default]
    Periapsis,
    Apoapsis,
}

/// Sense of travel around the central body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    Counterclockwise,
    Clockwise,
}

/// Position and velocity of the orbiting body plus the session constants of
/// the central body.
///
/// Fields are crate-private: only [`OrbitalState::initialize`] and the
/// integrator in this crate write them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalState {
    pub(crate) position: Vector2,
    pub(crate) velocity: Vector2,
    pub(crate) mu: f64,
    pub(crate) collision_radius: f64,
    pub(crate) time: f64,
    pub(crate) crashed: bool,
}

impl OrbitalState {
    /// Build a fresh state with no history (time zero, not crashed).
    pub fn initialize(
        position: Vector2,
        velocity: Vector2,
        mu: f64,
        collision_radius: f64,
    ) -> Result<Self, StateError> {
        if !vector::is_finite(&position) || !vector::is_finite(&velocity) {
            return Err(StateError::NonFiniteVector);
        }
        if !mu.is_finite() || mu <= 0.0 {
            return Err(StateError::InvalidMu(mu));
        }
        if !collision_radius.is_finite() || collision_radius < 0.0 {
            return Err(StateError::InvalidCollisionRadius(collision_radius));
        }
        let radius = vector::norm(&position);
        if radius == 0.0 {
            return Err(StateError::ZeroPosition);
        }
        if radius <= collision_radius {
            return Err(StateError::InsideCentralBody {
                radius,
                collision_radius,
            });
        }

        Ok(Self {
            position,
            velocity,
            mu,
            collision_radius,
            time: 0.0,
            crashed: false,
        })
    }

    /// Build a bound state from classical elements.
    ///
    /// The body is placed at periapsis or apoapsis with the vis-viva speed
    /// perpendicular to the radius vector.
    pub fn from_elements(
        mu: f64,
        collision_radius: f64,
        semi_major_axis: f64,
        eccentricity: f64,
        argument_of_periapsis: f64,
        start: StartPoint,
        direction: Direction,
    ) -> Result<Self, StateError> {
        if !(semi_major_axis.is_finite() && semi_major_axis > 0.0)
            || !(0.0..1.0).contains(&eccentricity)
        {
            return Err(StateError::UnboundElements {
                semi_major_axis,
                eccentricity,
            });
        }
        if !mu.is_finite() || mu <= 0.0 {
            return Err(StateError::InvalidMu(mu));
        }

        let (radius, angle) = match start {
            StartPoint::Periapsis => (semi_major_axis * (1.0 - eccentricity), argument_of_periapsis),
            StartPoint::Apoapsis => (
                semi_major_axis * (1.0 + eccentricity),
                argument_of_periapsis + std::f64::consts::PI,
            ),
        };
        let speed = vis_viva_speed(mu, radius, semi_major_axis);
        let r_hat = vector::from_angle(angle);
        let t_hat = match direction {
            Direction::Counterclockwise => vector::perp(&r_hat),
            Direction::Clockwise => vector::scale(&vector::perp(&r_hat), -1.0),
        };

        Self::initialize(
            vector::scale(&r_hat, radius),
            vector::scale(&t_hat, speed),
            mu,
            collision_radius,
        )
    }

    pub fn position(&self) -> Vector2 {
        self.position
    }

    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Standard gravitational parameter of the central body.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn collision_radius(&self) -> f64 {
        self.collision_radius
    }

    /// Simulated time elapsed since initialization.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Set once the integrator has stopped the body on the collision radius.
    pub fn crashed(&self) -> bool {
        self.crashed
    }

    /// Distance from the central body.
    pub fn radius(&self) -> f64 {
        vector::norm(&self.position)
    }

    pub fn speed(&self) -> f64 {
        vector::norm(&self.velocity)
    }

    /// Specific orbital energy v²/2 − μ/r.
    pub fn specific_energy(&self) -> f64 {
        0.5 * vector::norm_squared(&self.velocity) - self.mu / self.radius()
    }

    /// Specific angular momentum r × v (signed; positive is counter-clockwise).
    pub fn angular_momentum(&self) -> f64 {
        vector::cross(&self.position, &self.velocity)
    }

    /// Gravitational acceleration −μ r̂ / r² at `position`.
    pub(crate) fn acceleration_at(mu: f64, position: &Vector2) -> Vector2 {
        let r2 = vector::norm_squared(position);
        let r = r2.sqrt();
        vector::scale(position, -mu / (r2 * r))
    }
}
