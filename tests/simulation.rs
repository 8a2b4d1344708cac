use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use kepler_laws::orbits::OrbitType;
use kepler_laws::simulation::{ErrorKind, LawMetrics, Snapshot};
use kepler_laws::{LawMode, Simulation, SimulationSettings};

fn ellipse(settings: SimulationSettings) -> Simulation {
    Simulation::with_initial_conditions([1.0, 0.0], [0.0, 1.2], 1.0, 0.05, settings)
        .expect("valid initial conditions")
}

fn circle() -> Simulation {
    Simulation::with_initial_conditions(
        [1.0, 0.0],
        [0.0, 1.0],
        1.0,
        0.01,
        SimulationSettings::default(),
    )
    .unwrap()
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

#[test]
fn many_frames_forward_and_back_return_home() {
    let mut sim = ellipse(SimulationSettings::default());
    let start = sim.current_state().clone();

    for _ in 0..1000 {
        sim.step(0.01).unwrap();
    }
    assert!(distance(sim.current_state().position(), start.position()) > 0.1);
    for _ in 0..1000 {
        sim.reverse(0.01).unwrap();
    }

    let end = sim.current_state();
    assert!(distance(end.position(), start.position()) < 1e-6);
    assert!(distance(end.velocity(), start.velocity()) < 1e-6);
    assert!(sim.time().abs() < 1e-9);
    assert!(sim.total_area_swept().abs() < 1e-9);
    assert!(sim.division_areas().iter().all(|a| a.abs() < 1e-9));
}

#[test]
fn bound_orbit_closes_after_one_period() {
    let mut sim = Simulation::with_initial_conditions(
        [1.0, 0.0],
        [0.0, 1.05],
        1.0,
        0.01,
        SimulationSettings::default(),
    )
    .unwrap();
    let start = sim.current_state().clone();
    let period = sim.current_elements().period.unwrap();

    for _ in 0..360 {
        sim.step(period / 360.0).unwrap();
    }
    let end = sim.current_state();
    assert!(distance(end.position(), start.position()) < 1e-3);
    assert!(distance(end.velocity(), start.velocity()) < 1e-3);
    assert_eq!(sim.current_type(), OrbitType::Stable);
}

#[test]
fn highly_eccentric_orbit_stays_bound_over_a_period() {
    // Released from apoapsis at 5% of circular speed: e ≈ 0.9975, q ≈ 1.25e-3.
    let mut sim = Simulation::with_initial_conditions(
        [1.0, 0.0],
        [0.0, 0.05],
        1.0,
        0.0,
        SimulationSettings::default(),
    )
    .unwrap();
    let start = sim.current_state().clone();
    let initial = sim.current_elements();
    assert!(initial.eccentricity > 0.997);
    assert!(initial.periapsis_distance < 2e-3);
    assert_eq!(sim.current_type(), OrbitType::Stable);
    let period = initial.period.unwrap();

    for _ in 0..360 {
        sim.step(period / 360.0).unwrap();
        assert_eq!(sim.current_type(), OrbitType::Stable);
    }

    let end = sim.current_state();
    let energy_error =
        ((end.specific_energy() - start.specific_energy()) / start.specific_energy()).abs();
    assert!(energy_error < 1e-4, "energy error {energy_error}");
    assert!(distance(end.position(), start.position()) < 1e-3);
    assert!((sim.current_elements().eccentricity - initial.eccentricity).abs() < 1e-4);
}

#[test]
fn half_a_circular_orbit_reaches_the_antipode() {
    let mut sim = circle();
    assert_eq!(sim.current_type(), OrbitType::Stable);
    sim.step(PI).unwrap();

    let position = sim.current_state().position();
    assert!(distance(position, [-1.0, 0.0]) < 1e-4, "position {position:?}");
    assert!(sim.current_elements().eccentricity < 1e-6);
}

#[test]
fn divisions_sweep_equal_areas_over_one_period() {
    for n in 2..=6 {
        let settings = SimulationSettings {
            divisions: n,
            ..SimulationSettings::default()
        };
        let mut sim = ellipse(settings);
        let elements = sim.current_elements();
        let period = elements.period.unwrap();
        let expected = elements.ellipse_area.unwrap() / n as f64;

        for _ in 0..360 {
            sim.step(period / 360.0).unwrap();
        }

        let areas = sim.division_areas();
        assert_eq!(areas.len(), n);
        for (index, area) in areas.iter().enumerate() {
            assert!(
                ((area - expected) / expected).abs() < 1e-3,
                "n = {n}, division {index}: {area} vs {expected}"
            );
        }
        let sum: f64 = areas.iter().sum();
        assert!((sum - sim.total_area_swept()).abs() < 1e-9);
    }
}

#[test]
fn second_law_metrics_report_expected_area() {
    let settings = SimulationSettings {
        law_mode: LawMode::SecondLaw,
        ..SimulationSettings::default()
    };
    let sim = ellipse(settings);
    let LawMetrics::Second(second) = sim.law_metrics() else {
        panic!("second-law metrics expected");
    };
    let area = sim.current_elements().ellipse_area.unwrap();
    assert_eq!(second.division_count, 4);
    assert!((second.expected_area.unwrap() - area / 4.0).abs() < 1e-12);
    assert_eq!(second.markers.unwrap().len(), 4);
    assert_eq!(second.active_interval, Some(0));
}

#[test]
fn invalid_division_count_changes_nothing() {
    let mut sim = ellipse(SimulationSettings::default());
    sim.step(0.7).unwrap();
    let areas = sim.division_areas().to_vec();

    let err = sim.set_division_count(7).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(sim.division_count(), 4);
    assert_eq!(sim.division_areas(), areas.as_slice());

    sim.set_division_count(3).unwrap();
    assert_eq!(sim.division_count(), 3);
    assert_eq!(sim.division_areas(), &[0.0; 3]);
}

#[test]
fn negative_time_step_is_an_invalid_argument() {
    let mut sim = ellipse(SimulationSettings::default());
    sim.step(0.3).unwrap();
    let before = sim.snapshot();

    let err = sim.step(-0.1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(sim.snapshot(), before);

    let err = sim.step(f64::INFINITY).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(sim.snapshot(), before);
}

#[test]
fn escape_orbit_has_no_divisions() {
    let speed = 1.5 * 2.0_f64.sqrt();
    let mut sim = Simulation::with_initial_conditions(
        [1.0, 0.0],
        [0.0, speed],
        1.0,
        0.01,
        SimulationSettings::default(),
    )
    .unwrap();
    assert_eq!(sim.current_type(), OrbitType::Escape);

    sim.step(1.0).unwrap();
    assert!(sim.current_elements().period.is_none());
    assert!(sim.markers().is_none());
    assert_eq!(sim.division_areas(), &[0.0; 4]);
    assert!(sim.total_area_swept() > 0.0);
}

#[test]
fn crash_course_stops_on_the_central_body() {
    let mut sim = Simulation::with_initial_conditions(
        [1.0, 0.0],
        [0.0, 0.1],
        1.0,
        0.05,
        SimulationSettings::default(),
    )
    .unwrap();
    assert_eq!(sim.current_type(), OrbitType::Crash);
    assert!(sim.markers().is_none());

    let report = sim.step(2.0).unwrap();
    assert!(report.crashed);
    assert!(sim.current_state().crashed());
    assert_eq!(sim.current_type(), OrbitType::Crash);

    let frozen = sim.current_state().clone();
    sim.step(1.0).unwrap();
    assert_eq!(sim.current_state(), &frozen);
}

#[test]
fn reset_restores_initial_conditions() {
    let mut sim = ellipse(SimulationSettings::default());
    let initial = sim.current_state().clone();
    assert_eq!(sim.generation(), 0);

    sim.step(1.1).unwrap();
    sim.reset();

    assert_eq!(sim.current_state(), &initial);
    assert_eq!(sim.generation(), 1);
    assert_eq!(sim.total_area_swept(), 0.0);
    assert!(sim.division_areas().iter().all(|a| *a == 0.0));
}

#[test]
fn initialize_replaces_the_orbit_or_keeps_the_old_one() {
    let mut sim = ellipse(SimulationSettings::default());
    sim.step(0.4).unwrap();
    let before = sim.snapshot();

    let err = sim.initialize([0.0, 0.0], [0.0, 1.0], 1.0, 0.01).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(sim.snapshot(), before);

    sim.initialize([2.0, 0.0], [0.0, 0.5], 1.0, 0.01).unwrap();
    assert_eq!(sim.generation(), 1);
    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.current_state().position(), [2.0, 0.0]);
    assert_eq!(sim.initial_state().position(), [2.0, 0.0]);
}

#[test]
fn observers_receive_snapshots_until_unsubscribed() {
    let mut sim = ellipse(SimulationSettings::default());
    let seen: Rc<RefCell<Vec<Snapshot>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = sim.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.clone()));

    sim.step(0.2).unwrap();
    sim.set_law_mode(LawMode::ThirdLaw);
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(seen.borrow()[1].law_mode, LawMode::ThirdLaw);
    assert!((seen.borrow()[0].time - 0.2).abs() < 1e-12);

    // Rejected commands publish nothing.
    assert!(sim.step(-1.0).is_err());
    assert_eq!(seen.borrow().len(), 2);

    assert!(sim.unsubscribe(id));
    assert!(!sim.unsubscribe(id));
    sim.step(0.2).unwrap();
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn third_law_ratio_matches_kepler_constant() {
    let mu = 2.5;
    let mut sim = Simulation::with_initial_conditions(
        [1.0, 0.0],
        [0.0, 1.7],
        mu,
        0.01,
        SimulationSettings::default(),
    )
    .unwrap();
    sim.set_law_mode(LawMode::ThirdLaw);
    let LawMetrics::Third(third) = sim.law_metrics() else {
        panic!("third-law metrics expected");
    };
    let expected = 4.0 * PI * PI / mu;
    assert!((third.kepler_constant - expected).abs() < 1e-12);
    assert!(((third.ratio.unwrap() - expected) / expected).abs() < 1e-9);
}

#[test]
fn first_law_metrics_describe_the_ellipse() {
    let sim = ellipse(SimulationSettings::default());
    let LawMetrics::First(first) = sim.law_metrics_for(LawMode::FirstLaw) else {
        panic!("first-law metrics expected");
    };
    let a = first.semi_major_axis.unwrap();
    assert!((first.eccentricity - 0.44).abs() < 1e-9);
    assert!((first.periapsis_distance - 1.0).abs() < 1e-9);
    assert!((first.focal_distance.unwrap() - a * 0.44).abs() < 1e-9);
    assert!((first.apoapsis_distance.unwrap() - a * 1.44).abs() < 1e-9);
}

#[test]
fn orbital_data_for_a_circle() {
    let data = circle().orbital_data();
    assert!((data.distance - 1.0).abs() < 1e-12);
    assert!((data.speed - 1.0).abs() < 1e-12);
    assert!(data.radial_velocity.abs() < 1e-12);
    assert!((data.tangential_velocity - 1.0).abs() < 1e-12);
    assert!(data.flight_path_angle.abs() < 1e-12);
    assert!((data.circular_speed - 1.0).abs() < 1e-12);
    assert!((data.escape_speed - 2.0_f64.sqrt()).abs() < 1e-12);
    assert!((data.kinetic_energy - 0.5).abs() < 1e-12);
    assert!((data.potential_energy + 1.0).abs() < 1e-12);
    assert!((data.specific_energy + 0.5).abs() < 1e-12);
}

#[test]
fn more_orbital_data_preference_is_only_stored() {
    let mut sim = circle();
    let before = sim.snapshot();
    assert!(!sim.more_orbital_data());
    sim.set_more_orbital_data(true);
    assert!(sim.more_orbital_data());
    assert_eq!(sim.snapshot(), before);
}

#[test]
fn reset_returns_to_the_most_recent_initialization() {
    let mut sim = ellipse(SimulationSettings::default());
    sim.initialize([0.0, 3.0], [-0.4, 0.0], 1.0, 0.05).unwrap();
    let fresh = sim.current_state().clone();
    let substep = sim.max_substep();

    sim.step(2.0).unwrap();
    sim.reverse(0.5).unwrap();
    sim.reset();

    assert_eq!(sim.current_state(), &fresh);
    assert_eq!(sim.initial_state(), &fresh);
    assert_eq!(sim.max_substep(), substep);
    assert_eq!(sim.generation(), 2);
    assert_eq!(sim.time(), 0.0);
}

#[test]
fn reset_revives_a_crashed_body() {
    let mut sim = Simulation::with_initial_conditions(
        [1.0, 0.0],
        [0.0, 0.1],
        1.0,
        0.05,
        SimulationSettings::default(),
    )
    .unwrap();
    sim.step(2.0).unwrap();
    assert!(sim.current_state().crashed());

    sim.reset();
    assert!(!sim.current_state().crashed());
    assert_eq!(sim.current_state().position(), [1.0, 0.0]);
    assert!(sim.step(0.1).unwrap().substeps > 0);
}
