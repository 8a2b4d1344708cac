use std::f64::consts::PI;

use kepler_laws::orbits::{
    Direction, OrbitType, OrbitalState, StartPoint, StateError, classify, escape_speed, orbit_type,
};

#[test]
fn parabolic_energy_is_classified_as_escape() {
    // v² / 2 = 2 = μ / r exactly.
    let state = OrbitalState::initialize([1.0, 0.0], [0.0, 2.0], 2.0, 0.1).unwrap();
    let c = classify(&state);
    assert_eq!(c.elements.specific_energy, 0.0);
    assert_eq!(c.orbit_type, OrbitType::Escape);
    assert!(c.elements.period.is_none());
    assert!(c.elements.semi_major_axis.is_none());
}

#[test]
fn slightly_negative_energy_is_classified_as_stable() {
    let speed = (4.0_f64 - 2.0e-9).sqrt();
    let state = OrbitalState::initialize([1.0, 0.0], [0.0, speed], 2.0, 0.1).unwrap();
    let c = classify(&state);
    assert!(c.elements.specific_energy < 0.0);
    assert!((c.elements.specific_energy + 1.0e-9).abs() < 1.0e-12);
    assert_eq!(c.orbit_type, OrbitType::Stable);
    assert!(c.elements.period.is_some());
}

#[test]
fn circular_orbit_elements() {
    let state = OrbitalState::initialize([1.0, 0.0], [0.0, 1.0], 1.0, 0.01).unwrap();
    let e = classify(&state).elements;
    assert!(e.eccentricity < 1e-9);
    assert!((e.semi_major_axis.unwrap() - 1.0).abs() < 1e-12);
    assert!((e.semi_minor_axis.unwrap() - 1.0).abs() < 1e-9);
    assert!((e.period.unwrap() - 2.0 * PI).abs() < 1e-12);
    assert!((e.ellipse_area.unwrap() - PI).abs() < 1e-9);
    assert!((e.areal_velocity - 0.5).abs() < 1e-12);
    assert!(!e.radial);
    assert!(e.is_bound());
    assert_eq!(orbit_type(&state), OrbitType::Stable);
}

#[test]
fn hyperbolic_orbit_has_no_period() {
    let speed = 1.5 * escape_speed(1.0, 1.0);
    let state = OrbitalState::initialize([1.0, 0.0], [0.0, speed], 1.0, 0.01).unwrap();
    let c = classify(&state);
    assert_eq!(c.orbit_type, OrbitType::Escape);
    assert!(c.elements.eccentricity > 1.0);
    assert!(c.elements.period.is_none());
    assert!(c.elements.apoapsis_distance.is_none());
    assert!(c.elements.foci.is_none());
    assert!(!c.elements.is_bound());
}

#[test]
fn radial_orbit_is_a_crash() {
    let state = OrbitalState::initialize([2.0, 0.0], [-0.3, 0.0], 1.0, 0.01).unwrap();
    let c = classify(&state);
    assert!(c.elements.radial);
    assert_eq!(c.orbit_type, OrbitType::Crash);
    assert!((c.elements.eccentricity - 1.0).abs() < 1e-12);

    let at_rest = OrbitalState::initialize([2.0, 0.0], [0.0, 0.0], 1.0, 0.01).unwrap();
    assert_eq!(classify(&at_rest).orbit_type, OrbitType::Crash);
}

#[test]
fn bound_orbit_grazing_the_central_body_is_a_crash() {
    let state = OrbitalState::initialize([1.0, 0.0], [0.0, 0.1], 1.0, 0.05).unwrap();
    let c = classify(&state);
    assert!(c.elements.periapsis_distance < 0.05);
    assert_eq!(c.orbit_type, OrbitType::Crash);
    // Geometry is still reported for the doomed ellipse.
    assert!(c.elements.period.is_some());
}

#[test]
fn hyperbola_crashes_only_while_approaching() {
    let inbound = OrbitalState::initialize([10.0, 0.0], [-2.0, 0.01], 1.0, 0.1).unwrap();
    assert_eq!(classify(&inbound).orbit_type, OrbitType::Crash);

    let outbound = OrbitalState::initialize([10.0, 0.0], [2.0, 0.01], 1.0, 0.1).unwrap();
    assert_eq!(classify(&outbound).orbit_type, OrbitType::Escape);
}

#[test]
fn classification_is_deterministic() {
    let state = OrbitalState::initialize([0.3, -1.1], [0.7, 0.2], 1.0, 0.01).unwrap();
    assert_eq!(classify(&state), classify(&state));
}

#[test]
fn elements_round_trip_from_preset_geometry() {
    let omega = 0.75;
    let state = OrbitalState::from_elements(
        1.0,
        0.01,
        2.0,
        0.5,
        omega,
        StartPoint::Periapsis,
        Direction::Counterclockwise,
    )
    .unwrap();
    let e = classify(&state).elements;
    assert!((e.semi_major_axis.unwrap() - 2.0).abs() < 1e-9);
    assert!((e.eccentricity - 0.5).abs() < 1e-9);
    assert!((e.argument_of_periapsis - omega).abs() < 1e-9);
    assert!(e.true_anomaly < 1e-9 || (e.true_anomaly - 2.0 * PI).abs() < 1e-9);
    assert!((state.radius() - 1.0).abs() < 1e-12);

    // Empty focus sits 2ae away from the Sun, opposite periapsis.
    let foci = e.foci.unwrap();
    let empty = foci[1];
    assert!((empty[0].hypot(empty[1]) - 2.0).abs() < 1e-9);
}

#[test]
fn clockwise_apoapsis_start() {
    let state = OrbitalState::from_elements(
        1.0,
        0.01,
        2.0,
        0.5,
        0.0,
        StartPoint::Apoapsis,
        Direction::Clockwise,
    )
    .unwrap();
    let e = classify(&state).elements;
    assert!(e.angular_momentum < 0.0);
    assert!((state.radius() - 3.0).abs() < 1e-12);
    assert!((e.true_anomaly - PI).abs() < 1e-9);
}

#[test]
fn degenerate_initial_conditions_are_rejected() {
    assert_eq!(
        OrbitalState::initialize([0.0, 0.0], [0.0, 1.0], 1.0, 0.0).unwrap_err(),
        StateError::ZeroPosition
    );
    assert_eq!(
        OrbitalState::initialize([1.0, 0.0], [f64::NAN, 1.0], 1.0, 0.0).unwrap_err(),
        StateError::NonFiniteVector
    );
    assert!(matches!(
        OrbitalState::initialize([1.0, 0.0], [0.0, 1.0], 0.0, 0.0).unwrap_err(),
        StateError::InvalidMu(_)
    ));
    assert!(matches!(
        OrbitalState::initialize([1.0, 0.0], [0.0, 1.0], 1.0, -1.0).unwrap_err(),
        StateError::InvalidCollisionRadius(_)
    ));
    assert!(matches!(
        OrbitalState::initialize([0.5, 0.0], [0.0, 1.0], 1.0, 0.6).unwrap_err(),
        StateError::InsideCentralBody { .. }
    ));
    assert!(matches!(
        OrbitalState::from_elements(
            1.0,
            0.0,
            1.0,
            1.2,
            0.0,
            StartPoint::Periapsis,
            Direction::Counterclockwise
        )
        .unwrap_err(),
        StateError::UnboundElements { .. }
    ));
}
