//! Observers notified with a complete snapshot once a command has finished.

use std::fmt;

use kepler_core::vector::Vector2;
use kepler_orbits::{OrbitType, OrbitalElements};
use serde::Serialize;

use crate::metrics::LawMode;

/// Read-only view of the simulation after a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Incremented by every `initialize` and `reset`.
    pub generation: u64,
    pub time: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    pub orbit_type: OrbitType,
    pub elements: OrbitalElements,
    pub law_mode: LawMode,
    pub division_areas: Vec<f64>,
    pub total_area_swept: f64,
}

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn FnMut(&Snapshot)>;

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(ObserverId, Callback)>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&mut self, callback: Callback) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn publish(&mut self, snapshot: &Snapshot) {
        for (_, callback) in self.observers.iter_mut() {
            callback(snapshot);
        }
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
