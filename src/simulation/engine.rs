//! Simulation driver
//!
//! `Simulation` owns the ordered body list, the runtime [`Parameters`] and the
//! force set, and runs one step as:
//! 1. radial and vertical gravity
//! 2. spring creation, spring forces and pruning
//! 3. friction, position update and wall containment
//! 4. circle-circle impacts
//!
//! `SharedSimulation` wraps it in a single lock so a render thread only ever sees a
//! whole pre-step or post-step state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::simulation::collision::resolve_collisions;
use crate::simulation::forces::ForceSet;
use crate::simulation::integrator::{contain, euler_integrator};
use crate::simulation::params::{Bounds, Parameters};
use crate::simulation::springs::{self, SpringChurn};
use crate::simulation::states::Body;

/// What happened during one unpaused step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub springs: SpringChurn,
    pub impacts: usize,
}

pub struct Simulation {
    bodies: Vec<Body>,
    params: Parameters,
    forces: ForceSet,
    t: f64, // accumulated simulated time
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}

impl Simulation {
    pub fn new(params: Parameters) -> Self {
        Self::with_forces(params, ForceSet::default())
    }

    /// Use a custom set of velocity terms in place of radial + vertical gravity
    pub fn with_forces(params: Parameters, forces: ForceSet) -> Self {
        Self {
            bodies: Vec::new(),
            params,
            forces,
            t: 0.0,
        }
    }

    /// Append a body, returning its index (stable until [`Simulation::clear_all`])
    pub fn add_body(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Remove every body and with them every spring edge
    pub fn clear_all(&mut self) {
        debug!(bodies = self.bodies.len(), "clearing simulation");
        self.bodies.clear();
        self.t = 0.0;
    }

    /// Connect every ordered pair within `threshold`, ignoring the degree cap
    pub fn seed_initial_connections(&mut self, threshold: f64) -> usize {
        springs::seed_initial_connections(&mut self.bodies, threshold)
    }

    /// Advance by `delta` inside `bounds`.
    ///
    /// While paused no dynamics run and `None` is returned, but bodies are still
    /// held inside `bounds` (which may have shrunk since the last step).
    pub fn step(&mut self, delta: f64, bounds: &Bounds) -> Option<StepReport> {
        if self.params.paused {
            for b in self.bodies.iter_mut() {
                contain(b, bounds);
            }
            return None;
        }

        let params = &self.params;
        let bodies = &mut self.bodies;

        self.forces.apply(params, bodies, delta);

        let springs = if params.springs {
            springs::update(bodies, params, delta)
        } else {
            SpringChurn::default()
        };

        euler_integrator(bodies, params, bounds, delta);

        let impacts = if params.collisions {
            resolve_collisions(bodies)
        } else {
            0
        };

        self.t += delta;
        Some(StepReport { springs, impacts })
    }

    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    /// Direct access for scene tools. Spring lists are not reachable through it,
    /// so the edge counters cannot be desynchronized.
    pub fn body_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn edge_count(&self) -> usize {
        springs::edge_count(&self.bodies)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Owned copy of the body list for readers outside the lock
    pub fn snapshot(&self) -> Vec<Body> {
        self.bodies.clone()
    }
}

/// Cloneable handle serializing all access to one [`Simulation`]
#[derive(Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(sim: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sim)),
        }
    }

    /// A panic inside a previous holder leaves plain data behind, keep using it
    fn lock(&self) -> MutexGuard<'_, Simulation> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn step(&self, delta: f64, bounds: &Bounds) -> Option<StepReport> {
        self.lock().step(delta, bounds)
    }

    pub fn snapshot(&self) -> Vec<Body> {
        self.lock().snapshot()
    }

    pub fn with<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        f(&self.lock())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Simulation) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::{NVec2, Shape};

    fn running() -> Simulation {
        Simulation::new(Parameters {
            paused: false,
            ..Parameters::default()
        })
    }

    #[test]
    fn paused_step_is_a_noop_inside_bounds() {
        let mut sim = Simulation::default();
        sim.add_body(Body::circle(NVec2::new(50.0, 50.0), NVec2::new(3.0, 0.0), 1.0).unwrap());
        assert!(sim.step(1.0, &Bounds::new(100.0, 100.0)).is_none());
        assert_eq!(sim.bodies()[0].x, NVec2::new(50.0, 50.0));
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn paused_step_still_contains_after_resize() {
        let mut sim = Simulation::default();
        sim.add_body(Body::circle(NVec2::new(90.0, 50.0), NVec2::zeros(), 5.0).unwrap());
        sim.step(1.0, &Bounds::new(60.0, 100.0));
        assert_eq!(sim.bodies()[0].x.x, 55.0);
    }

    #[test]
    fn step_advances_time_and_position() {
        let mut sim = running();
        sim.add_body(Body::circle(NVec2::new(50.0, 50.0), NVec2::new(3.0, 0.0), 1.0).unwrap());
        let report = sim.step(0.5, &Bounds::new(100.0, 100.0)).unwrap();
        assert_eq!(report, StepReport::default());
        assert_eq!(sim.bodies()[0].x, NVec2::new(51.5, 50.0));
        assert_eq!(sim.time(), 0.5);
    }

    #[test]
    fn clear_all_drops_bodies_and_edges() {
        let mut sim = running();
        sim.add_body(Body::circle(NVec2::new(10.0, 10.0), NVec2::zeros(), 1.0).unwrap());
        sim.add_body(Body::circle(NVec2::new(12.0, 10.0), NVec2::zeros(), 1.0).unwrap());
        assert_eq!(sim.seed_initial_connections(5.0), 2);
        sim.clear_all();
        assert!(sim.is_empty());
        assert_eq!(sim.edge_count(), 0);
    }

    #[test]
    fn body_mut_edits_keep_edges_in_sync() {
        let mut params = Parameters {
            paused: false,
            ..Parameters::default()
        };
        params.springs = true;
        let mut sim = Simulation::new(params);
        let a = sim.add_body(Body::circle(NVec2::new(10.0, 10.0), NVec2::zeros(), 1.0).unwrap());
        let b = sim.add_body(Body::circle(NVec2::new(20.0, 10.0), NVec2::zeros(), 1.0).unwrap());
        assert_eq!(sim.seed_initial_connections(15.0), 2);
        assert!(sim.body(2).is_none());

        // teleport b out of reach; its edges are only reachable read-only
        let body = sim.body_mut(b).unwrap();
        body.x = NVec2::new(90.0, 90.0);
        body.set_shape(Shape::Circle { radius: 2.0 }, 0.001).unwrap();
        assert_eq!(sim.body(b).unwrap().incoming_springs(), 1);

        sim.step(1.0, &Bounds::new(100.0, 100.0));
        assert_eq!(sim.edge_count(), 0);
        assert_eq!(sim.body(a).unwrap().incoming_springs(), 0);
        assert!(springs::incoming_counts_consistent(sim.bodies()));
    }

    #[test]
    fn shared_handle_sees_steps() {
        let shared = SharedSimulation::new(running());
        shared.with_mut(|sim| {
            sim.add_body(Body::circle(NVec2::new(50.0, 50.0), NVec2::new(1.0, 0.0), 1.0).unwrap())
        });
        shared.step(1.0, &Bounds::new(100.0, 100.0));
        let snap = shared.snapshot();
        assert_eq!(snap[0].x, NVec2::new(51.0, 50.0));
        assert_eq!(shared.with(|sim| sim.len()), 1);
    }
}
