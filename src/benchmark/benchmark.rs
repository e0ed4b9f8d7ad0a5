use std::time::Instant;

use crate::simulation::engine::Simulation;
use crate::simulation::params::{Bounds, Parameters};
use crate::simulation::states::{Body, NVec2};

/// Helper to build a square lattice of `side * side` resting circles spaced 10 apart
fn make_simulation(side: usize, params: Parameters) -> Simulation {
    let mut sim = Simulation::new(params);
    for i in 0..side {
        for j in 0..side {
            let i_f = i as f64;
            let j_f = j as f64;
            // deterministic jitter, no rand needed
            let x = NVec2::new(
                50.0 + i_f * 10.0 + (i_f * 0.37 + j_f).sin(),
                50.0 + j_f * 10.0 + (j_f * 0.13 + i_f).cos(),
            );
            if let Ok(b) = Body::circle(x, NVec2::zeros(), 3.0) {
                sim.add_body(b);
            }
        }
    }
    sim
}

/// Every force and the collision pass enabled
fn make_params() -> Parameters {
    Parameters {
        collisions: true,
        radial_gravity: true,
        vertical_gravity: true,
        background_friction: true,
        springs: true,
        max_connections_per_node: 6,
        paused: false,
        ..Parameters::default()
    }
}

/// Time `Simulation::step` for growing lattices
/// Prints CSV so the output can be pasted into a spreadsheet
pub fn bench_step() {
    println!("N,ms_per_step,edges");

    for side in [10, 20, 30, 40, 60] {
        let n = side * side;
        // Small n: average over more steps to smooth noise
        let steps = if n <= 900 { 20 } else { 3 };

        let mut sim = make_simulation(side, make_params());
        let bounds = Bounds::new(side as f64 * 10.0 + 100.0, side as f64 * 10.0 + 100.0);

        // Warm up
        sim.step(1.0, &bounds);

        let t0 = Instant::now();
        for _ in 0..steps {
            sim.step(1.0, &bounds);
        }
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6},{}", n, ms, sim.edge_count());
    }
}
