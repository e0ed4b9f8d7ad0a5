//! Build fully-initialized simulations from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`:
//! - world bounds (`Bounds`)
//! - the `Simulation` with validated parameters, every configured body, and the
//!   initial spring seeding pass already applied

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::configuration::config::{BodyConfig, GridConfig, ScenarioConfig, ShapeConfig};
use crate::error::{Error, Result};
use crate::simulation::engine::Simulation;
use crate::simulation::params::{Bounds, Parameters};
use crate::simulation::states::{Body, Color, NVec2, Shape};
use crate::simulation::utils::{random_between, random_color};

/// Runtime bundle: the world and the simulation living in it
pub struct Scenario {
    pub bounds: Bounds,
    pub simulation: Simulation,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let params = cfg.parameters.into_parameters()?;
        if !(cfg.world.width > 0.0 && cfg.world.height > 0.0) {
            return Err(Error::InvalidParam(format!(
                "world must have positive size, got {} x {}",
                cfg.world.width, cfg.world.height
            )));
        }
        let bounds = Bounds::new(cfg.world.width, cfg.world.height);

        let mut rng: StdRng = match cfg.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };

        let mut bodies = Vec::new();
        if let Some(grid) = &cfg.grid {
            bodies.extend(grid_bodies(grid, &params, &mut rng)?);
        }
        for bc in &cfg.bodies {
            bodies.push(body_from_config(bc, &params, &mut rng)?);
        }

        let threshold = params.initial_connection_distance;
        let mut simulation = Simulation::new(params);
        for b in bodies {
            simulation.add_body(b);
        }
        let seeded = simulation.seed_initial_connections(threshold);

        debug!(bodies = simulation.len(), seeded, "scenario built");
        Ok(Self { bounds, simulation })
    }
}

fn vec2(v: &[f64], what: &str) -> Result<NVec2> {
    match v {
        [] => Ok(NVec2::zeros()),
        [x, y] => Ok(NVec2::new(*x, *y)),
        _ => Err(Error::InvalidParam(format!(
            "{what} must have 2 components, got {}",
            v.len()
        ))),
    }
}

fn body_from_config<R: Rng>(bc: &BodyConfig, params: &Parameters, rng: &mut R) -> Result<Body> {
    if bc.x.len() != 2 {
        return Err(Error::InvalidParam(format!(
            "position must have 2 components, got {}",
            bc.x.len()
        )));
    }
    let x = vec2(&bc.x, "position")?;
    let v = vec2(&bc.v, "velocity")?;
    let shape = match bc.shape {
        ShapeConfig::Circle { radius } => Shape::Circle { radius },
        ShapeConfig::Rectangle { width, height } => Shape::Rectangle { width, height },
    };
    let color = bc.color.map(Color::from).unwrap_or_else(|| random_color(rng));

    Ok(Body::new(shape, x, v, params.cubic_pixel_mass)?
        .with_damping(bc.damping.unwrap_or(params.damping))
        .with_color(color))
}

/// Circles on a `cols` x `rows` lattice, column-major, each nudged horizontally by
/// up to half the jitter width
pub fn grid_bodies<R: Rng>(grid: &GridConfig, params: &Parameters, rng: &mut R) -> Result<Vec<Body>> {
    let half = 0.5 * grid.jitter;
    let v = NVec2::new(grid.velocity[0], grid.velocity[1]);
    let mut bodies = Vec::with_capacity(grid.rows * grid.cols);

    for i in 0..grid.cols {
        for j in 0..grid.rows {
            let x = NVec2::new(
                grid.origin[0] + i as f64 * grid.spacing + random_between(rng, -half, half),
                grid.origin[1] + j as f64 * grid.spacing,
            );
            let body = Body::circle(x, v, grid.radius)?
                .with_damping(params.damping)
                .with_color(random_color(rng));
            bodies.push(body);
        }
    }
    Ok(bodies)
}
