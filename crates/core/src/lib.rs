//! Core units, constants, and shared primitives for the Kepler's laws workspace.

/// Physical constants. Heliocentric values use astronomical units and Julian years.
pub mod constants {
    use std::f64::consts::PI;

    /// Gravitational parameter of the Sun in AU³/yr² (Gaussian units, 4π²).
    pub const MU_SUN_AU3_YR2: f64 = 4.0 * PI * PI;
    /// Solar radius expressed in astronomical units.
    pub const SUN_RADIUS_AU: f64 = 0.004_650_47;

    /// Kepler's third-law constant T²/a³ = 4π²/μ for a given central body.
    #[inline]
    pub fn kepler_constant(mu: f64) -> f64 {
        4.0 * PI * PI / mu
    }
}

/// Angle conversions used by the configuration layer and reports.
pub mod units {
    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }
}

/// Planar vector helpers over plain `[f64; 2]` arrays.
pub mod vector {
    /// Alias for a 2D vector in length or velocity units depending on context.
    pub type Vector2 = [f64; 2];

    /// The zero vector.
    pub const ZERO: Vector2 = [0.0, 0.0];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector2) -> f64 {
        v[0].hypot(v[1])
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(v: &Vector2) -> f64 {
        dot(v, v)
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector2, b: &Vector2) -> f64 {
        a[0] * b[0] + a[1] * b[1]
    }

    /// Z component of the 3D cross product of two planar vectors.
    #[inline]
    pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
        a[0] * b[1] - a[1] * b[0]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] - b[0], a[1] - b[1]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector2, s: f64) -> Vector2 {
        [v[0] * s, v[1] * s]
    }

    /// `a + s * b`, the building block of every integrator update.
    #[inline]
    pub fn add_scaled(a: &Vector2, b: &Vector2, s: f64) -> Vector2 {
        [a[0] + s * b[0], a[1] + s * b[1]]
    }

    /// Unit vector at `angle` radians from the +x axis.
    #[inline]
    pub fn from_angle(angle: f64) -> Vector2 {
        [angle.cos(), angle.sin()]
    }

    /// Rotate a vector a quarter turn counter-clockwise.
    #[inline]
    pub fn perp(v: &Vector2) -> Vector2 {
        [-v[1], v[0]]
    }

    /// True when both components are finite.
    #[inline]
    pub fn is_finite(v: &Vector2) -> bool {
        v[0].is_finite() && v[1].is_finite()
    }
}
