//! Orbit classification: elements and orbit type derived from the current state.

use std::f64::consts::{PI, TAU};

use kepler_core::vector::{self, Vector2};
use serde::Serialize;

use crate::state::OrbitalState;

/// Relative size of r × v below which an orbit is treated as radial.
pub(crate) const RADIAL_TOLERANCE: f64 = 1.0e-12;
/// Eccentricity-vector magnitude below which the orbit counts as circular.
const CIRCULAR_TOLERANCE: f64 = 1.0e-12;

/// Physical outcome of the current trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrbitType {
    /// Bound ellipse (0 ≤ e < 1) that clears the central body.
    Stable,
    /// Parabolic or hyperbolic path (e ≥ 1).
    Escape,
    /// The trajectory meets the central body, or already has.
    Crash,
}

/// Elements derived from an [`OrbitalState`].
///
/// Size and timing quantities that only exist for closed orbits are `None`
/// when the orbit is unbound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalElements {
    /// ε = v²/2 − μ/r.
    pub specific_energy: f64,
    /// L = r × v; the sign gives the direction of travel.
    pub angular_momentum: f64,
    pub eccentricity: f64,
    /// Angle of the periapsis direction from +x, in radians. Zero for circles.
    pub argument_of_periapsis: f64,
    /// Angle from periapsis to the body, measured along the direction of travel.
    pub true_anomaly: f64,
    /// p = L²/μ.
    pub semi_latus_rectum: f64,
    pub periapsis_distance: f64,
    /// Rate of area swept by the radius vector, |L|/2.
    pub areal_velocity: f64,
    pub semi_major_axis: Option<f64>,
    pub semi_minor_axis: Option<f64>,
    pub period: Option<f64>,
    pub apoapsis_distance: Option<f64>,
    pub mean_motion: Option<f64>,
    /// πab.
    pub ellipse_area: Option<f64>,
    pub center: Option<Vector2>,
    /// Occupied focus (the central body) first, then the empty focus.
    pub foci: Option<[Vector2; 2]>,
    /// L = 0: the body falls straight through the origin.
    pub radial: bool,
}

impl OrbitalElements {
    pub fn is_bound(&self) -> bool {
        self.semi_major_axis.is_some()
    }
}

/// Elements and type computed together from one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub elements: OrbitalElements,
    pub orbit_type: OrbitType,
}

/// Derive elements and orbit type. Pure and deterministic.
pub fn classify(state: &OrbitalState) -> Classification {
    let elements = elements(state);
    let orbit_type = orbit_type_for(state, &elements);
    Classification {
        elements,
        orbit_type,
    }
}

/// Orbit type only.
pub fn orbit_type(state: &OrbitalState) -> OrbitType {
    classify(state).orbit_type
}

fn orbit_type_for(state: &OrbitalState, elements: &OrbitalElements) -> OrbitType {
    if state.crashed() || elements.radial {
        return OrbitType::Crash;
    }

    let bound = elements.specific_energy < 0.0;
    let approaching = vector::dot(&state.position(), &state.velocity()) < 0.0;
    if elements.periapsis_distance <= state.collision_radius() && (bound || approaching) {
        return OrbitType::Crash;
    }

    if bound {
        OrbitType::Stable
    } else {
        OrbitType::Escape
    }
}

fn elements(state: &OrbitalState) -> OrbitalElements {
    let mu = state.mu();
    let r_vec = state.position();
    let v_vec = state.velocity();
    let r = state.radius();
    let v = state.speed();

    let energy = state.specific_energy();
    let l = state.angular_momentum();
    let radial = v == 0.0 || l.abs() <= RADIAL_TOLERANCE * r * v;

    let eccentricity = (1.0 + 2.0 * energy * l * l / (mu * mu)).max(0.0).sqrt();
    let semi_latus_rectum = l * l / mu;
    let periapsis_distance = semi_latus_rectum / (1.0 + eccentricity);

    // e⃗ = ((v² − μ/r) r⃗ − (r⃗·v⃗) v⃗) / μ points at periapsis.
    let e_vec = vector::scale(
        &vector::sub(
            &vector::scale(&r_vec, v * v - mu / r),
            &vector::scale(&v_vec, vector::dot(&r_vec, &v_vec)),
        ),
        1.0 / mu,
    );
    let argument_of_periapsis = if vector::norm(&e_vec) > CIRCULAR_TOLERANCE {
        e_vec[1].atan2(e_vec[0])
    } else {
        0.0
    };

    let polar = r_vec[1].atan2(r_vec[0]);
    let swept = if l >= 0.0 {
        polar - argument_of_periapsis
    } else {
        argument_of_periapsis - polar
    };
    let true_anomaly = swept.rem_euclid(TAU);

    let mut elements = OrbitalElements {
        specific_energy: energy,
        angular_momentum: l,
        eccentricity,
        argument_of_periapsis,
        true_anomaly,
        semi_latus_rectum,
        periapsis_distance,
        areal_velocity: 0.5 * l.abs(),
        semi_major_axis: None,
        semi_minor_axis: None,
        period: None,
        apoapsis_distance: None,
        mean_motion: None,
        ellipse_area: None,
        center: None,
        foci: None,
        radial,
    };

    if energy < 0.0 {
        let a = -mu / (2.0 * energy);
        let e = eccentricity.min(1.0);
        let b = a * (1.0 - e * e).sqrt();
        let mean_motion = (mu / (a * a * a)).sqrt();
        let axis = vector::from_angle(argument_of_periapsis);
        let center = vector::scale(&axis, -a * e);

        elements.semi_major_axis = Some(a);
        elements.semi_minor_axis = Some(b);
        elements.period = Some(2.0 * PI / mean_motion);
        elements.apoapsis_distance = Some(a * (1.0 + e));
        elements.mean_motion = Some(mean_motion);
        elements.ellipse_area = Some(PI * a * b);
        elements.center = Some(center);
        elements.foci = Some([vector::ZERO, vector::scale(&center, 2.0)]);
    }

    elements
}
