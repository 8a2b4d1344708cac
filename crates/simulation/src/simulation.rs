//! The simulation façade: one orbiting body, its divisions, and its observers.

use kepler_config::{OrbitPresetConfig, SimulationConfig, find_preset};
use kepler_core::vector::Vector2;
use kepler_divisions::{DEFAULT_DIVISIONS, DivisionPlanner, Marker};
use kepler_orbits::{
    Classification, Integrator, IntegratorSettings, OrbitType, OrbitalElements, OrbitalState,
    StepReport, classify,
};
use tracing::{debug, info, warn};

use crate::error::SimulationError;
use crate::metrics::{LawMetrics, LawMode, OrbitalData};
use crate::observer::{ObserverId, ObserverRegistry, Snapshot};
use crate::preset::state_from_preset;

/// Start-up options for a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    pub integrator: IntegratorSettings,
    pub divisions: usize,
    pub law_mode: LawMode,
    pub more_orbital_data: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            integrator: IntegratorSettings::default(),
            divisions: DEFAULT_DIVISIONS,
            law_mode: LawMode::default(),
            more_orbital_data: false,
        }
    }
}

impl From<&SimulationConfig> for SimulationSettings {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            integrator: IntegratorSettings {
                substep_fraction: config.integrator.substep_fraction,
                max_substeps: config.integrator.max_substeps,
            },
            divisions: config.divisions,
            law_mode: config.law_mode.into(),
            more_orbital_data: config.preferences.more_orbital_data,
        }
    }
}

/// Frame-driven Kepler simulation.
///
/// Every command either applies completely or returns an error and leaves
/// the simulation untouched. Observers are notified after a command has
/// finished, never in the middle of one.
#[derive(Debug)]
pub struct Simulation {
    integrator: Integrator,
    /// Integrator as it was right after the last `initialize`; `reset` restores it.
    origin: Integrator,
    planner: DivisionPlanner,
    settings: SimulationSettings,
    law_mode: LawMode,
    more_orbital_data: bool,
    generation: u64,
    total_area: f64,
    last_type: OrbitType,
    observers: ObserverRegistry,
}

impl Simulation {
    /// Start a simulation from an already validated state.
    pub fn new(state: OrbitalState, settings: SimulationSettings) -> Result<Self, SimulationError> {
        let integrator = Integrator::new(state.clone(), settings.integrator)?;
        let mut planner = DivisionPlanner::new(settings.divisions)?;
        let classification = classify(&state);
        planner.reset(division_period(&classification));

        debug!(
            orbit_type = ?classification.orbit_type,
            eccentricity = classification.elements.eccentricity,
            "simulation created"
        );

        Ok(Self {
            origin: integrator.clone(),
            integrator,
            planner,
            settings,
            law_mode: settings.law_mode,
            more_orbital_data: settings.more_orbital_data,
            generation: 0,
            total_area: 0.0,
            last_type: classification.orbit_type,
            observers: ObserverRegistry::default(),
        })
    }

    /// Start a simulation from raw initial conditions.
    pub fn with_initial_conditions(
        position: Vector2,
        velocity: Vector2,
        mu: f64,
        collision_radius: f64,
        settings: SimulationSettings,
    ) -> Result<Self, SimulationError> {
        let state = OrbitalState::initialize(position, velocity, mu, collision_radius)?;
        Self::new(state, settings)
    }

    /// Start a simulation from a configuration file and a preset catalog.
    pub fn from_config(
        config: &SimulationConfig,
        presets: &[OrbitPresetConfig],
    ) -> Result<Self, SimulationError> {
        let preset = find_preset(presets, &config.preset).ok_or_else(|| {
            SimulationError::InvalidArgument(format!(
                "orbit preset '{}' not found in catalog",
                config.preset
            ))
        })?;
        let state = state_from_preset(&config.central_body, preset)?;
        Self::new(state, SimulationSettings::from(config))
    }

    /// Replace the orbit with new initial conditions, discarding all history.
    pub fn initialize(
        &mut self,
        position: Vector2,
        velocity: Vector2,
        mu: f64,
        collision_radius: f64,
    ) -> Result<(), SimulationError> {
        let state = OrbitalState::initialize(position, velocity, mu, collision_radius)
            .inspect_err(|err| warn!(%err, "initialize rejected"))?;
        let integrator = Integrator::new(state, self.settings.integrator)?;

        self.origin = integrator.clone();
        self.integrator = integrator;
        self.restart();
        debug!(generation = self.generation, "simulation initialized");
        self.publish();
        Ok(())
    }

    /// Return to the initial conditions of the current generation.
    pub fn reset(&mut self) {
        self.integrator = self.origin.clone();
        self.restart();
        debug!(generation = self.generation, "simulation reset");
        self.publish();
    }

    fn restart(&mut self) {
        let classification = classify(self.integrator.state());
        self.planner.reset(division_period(&classification));
        self.total_area = 0.0;
        self.last_type = classification.orbit_type;
        self.generation += 1;
    }

    /// Advance by `dt` of simulated time (`dt ≥ 0`).
    pub fn step(&mut self, dt: f64) -> Result<StepReport, SimulationError> {
        let report = self
            .integrator
            .step(dt)
            .inspect_err(|err| warn!(%err, dt, "step rejected"))?;
        self.absorb(&report);
        self.publish();
        Ok(report)
    }

    /// Run time backwards by `dt` (`dt ≥ 0`), undoing a matching `step`.
    pub fn reverse(&mut self, dt: f64) -> Result<StepReport, SimulationError> {
        let report = self
            .integrator
            .reverse(dt)
            .inspect_err(|err| warn!(%err, dt, "reverse rejected"))?;
        self.absorb(&report);
        self.publish();
        Ok(report)
    }

    fn absorb(&mut self, report: &StepReport) {
        for sweep in &report.sweeps {
            self.planner.on_step(sweep.duration, sweep.area);
            self.total_area += sweep.area;
        }

        if report.crashed {
            let state = self.integrator.state();
            info!(
                time = state.time(),
                radius = state.radius(),
                "body reached the collision radius"
            );
        }

        let orbit_type = self.current_type();
        if orbit_type != self.last_type {
            info!(from = ?self.last_type, to = ?orbit_type, "orbit type changed");
            if orbit_type != OrbitType::Stable {
                self.planner.reset(None);
            }
            self.last_type = orbit_type;
        }
    }

    /// Change the number of equal-time divisions (2..=6); restarts the accumulators.
    pub fn set_division_count(&mut self, count: usize) -> Result<(), SimulationError> {
        self.planner
            .set_division_count(count)
            .inspect_err(|err| warn!(%err, "division count rejected"))?;
        self.settings.divisions = count;
        self.publish();
        Ok(())
    }

    pub fn set_law_mode(&mut self, mode: LawMode) {
        self.law_mode = mode;
        self.publish();
    }

    /// Preference flag for the extended data panel; stored only.
    pub fn set_more_orbital_data(&mut self, enabled: bool) {
        self.more_orbital_data = enabled;
    }

    /// Register an observer called after every successful command.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn publish(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.observers.publish(&snapshot);
    }

    pub fn current_state(&self) -> &OrbitalState {
        self.integrator.state()
    }

    pub fn initial_state(&self) -> &OrbitalState {
        self.origin.state()
    }

    pub fn classification(&self) -> Classification {
        classify(self.integrator.state())
    }

    pub fn current_elements(&self) -> OrbitalElements {
        self.classification().elements
    }

    pub fn current_type(&self) -> OrbitType {
        self.classification().orbit_type
    }

    /// Per-division areas, always as long as the division count.
    pub fn division_areas(&self) -> &[f64] {
        self.planner.division_areas()
    }

    /// Division markers, or `None` when the orbit has no period.
    pub fn markers(&self) -> Option<Vec<Marker>> {
        self.planner.markers()
    }

    pub fn division_count(&self) -> usize {
        self.planner.division_count()
    }

    pub fn divisions(&self) -> &DivisionPlanner {
        &self.planner
    }

    /// Area swept by the radius vector since the last reset.
    pub fn total_area_swept(&self) -> f64 {
        self.total_area
    }

    /// Simulated time since the last reset.
    pub fn time(&self) -> f64 {
        self.integrator.state().time()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn law_mode(&self) -> LawMode {
        self.law_mode
    }

    pub fn more_orbital_data(&self) -> bool {
        self.more_orbital_data
    }

    pub fn settings(&self) -> SimulationSettings {
        self.settings
    }

    /// Integrator sub-step length for this generation.
    pub fn max_substep(&self) -> f64 {
        self.integrator.max_substep()
    }

    /// Metrics for the active law screen.
    pub fn law_metrics(&self) -> LawMetrics {
        let state = self.integrator.state();
        let elements = classify(state).elements;
        LawMetrics::build(self.law_mode, state, &elements, &self.planner, self.total_area)
    }

    /// Metrics for a specific law screen regardless of the active mode.
    pub fn law_metrics_for(&self, mode: LawMode) -> LawMetrics {
        let state = self.integrator.state();
        let elements = classify(state).elements;
        LawMetrics::build(mode, state, &elements, &self.planner, self.total_area)
    }

    /// Extended position/velocity breakdown.
    pub fn orbital_data(&self) -> OrbitalData {
        let state = self.integrator.state();
        OrbitalData::build(state, &classify(state).elements)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.integrator.state();
        let classification = classify(state);
        Snapshot {
            generation: self.generation,
            time: state.time(),
            position: state.position(),
            velocity: state.velocity(),
            orbit_type: classification.orbit_type,
            elements: classification.elements,
            law_mode: self.law_mode,
            division_areas: self.planner.division_areas().to_vec(),
            total_area_swept: self.total_area,
        }
    }
}

fn division_period(classification: &Classification) -> Option<f64> {
    match classification.orbit_type {
        OrbitType::Stable => classification.elements.period,
        OrbitType::Escape | OrbitType::Crash => None,
    }
}
