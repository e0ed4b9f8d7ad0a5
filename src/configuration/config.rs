//! Configuration types for loading scenes from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scene. A scenario consists of:
//!
//! - [`WorldConfig`]      – world bounds handed to every step
//! - [`ParametersConfig`] – overrides for the runtime [`Parameters`] defaults
//! - [`GridConfig`]       – optional lattice of identical circles
//! - [`BodyConfig`]       – explicitly placed bodies
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! world:
//!   width: 800.0
//!   height: 800.0
//!
//! seed: 42                  # RNG seed for grid jitter and colors, omit for a random one
//!
//! parameters:               # every field optional
//!   paused: false
//!   springs: true
//!   vertical_gravity: true
//!   max_connections_per_node: 6
//!
//! grid:
//!   rows: 30
//!   cols: 30
//!   spacing: 20.0
//!   origin: [100.0, 100.0]
//!   radius: 5.0
//!   velocity: [0.0, 1.0]
//!   jitter: 1.0             # horizontal jitter width, centered on the lattice point
//!
//! bodies:
//!   - shape: circle
//!     radius: 30.0
//!     x: [600.0, 400.0]
//!     v: [-1.5, 0.0]
//!     color: [1.0, 0.0, 0.0]
//!   - shape: rectangle
//!     width: 40.0
//!     height: 20.0
//!     x: [50.0, 50.0]
//!     v: [1.0, 0.0]
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::simulation::params::Parameters;

/// World size; the world spans [0, width] x [0, height]
#[derive(Deserialize, Debug, Clone)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
}

/// Optional overrides of [`Parameters`]; anything left out keeps its default
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct ParametersConfig {
    pub collisions: Option<bool>,
    pub radial_gravity: Option<bool>,
    pub vertical_gravity: Option<bool>,
    pub background_friction: Option<bool>,
    pub springs: Option<bool>,

    pub radial_gravity_force: Option<f64>,
    pub vertical_gravity_force: Option<f64>,
    pub friction_force: Option<f64>,
    pub spring_force: Option<f64>,
    pub spring_damping: Option<f64>,
    pub rest_length: Option<f64>,
    pub initial_connection_distance: Option<f64>,
    pub max_spring_distance: Option<f64>,
    pub max_connections_per_node: Option<usize>,
    pub cubic_pixel_mass: Option<f64>,
    pub damping: Option<f64>,

    pub simulation_speed_exponent: Option<i32>,
    pub paused: Option<bool>,
    pub variable_timestep: Option<bool>,
    pub target_fps: Option<u32>,
    pub max_frame_time: Option<f64>, // seconds
}

impl ParametersConfig {
    /// Defaults overlaid with every field present in the file, then validated
    pub fn into_parameters(self) -> Result<Parameters> {
        let cfg = self;
        let mut p = Parameters::default();
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = cfg.$field { p.$field = v; })*
            };
        }
        overlay!(
            collisions,
            radial_gravity,
            vertical_gravity,
            background_friction,
            springs,
            radial_gravity_force,
            vertical_gravity_force,
            friction_force,
            spring_force,
            spring_damping,
            rest_length,
            initial_connection_distance,
            max_spring_distance,
            max_connections_per_node,
            cubic_pixel_mass,
            damping,
            simulation_speed_exponent,
            paused,
            variable_timestep,
            target_fps,
        );
        if let Some(secs) = cfg.max_frame_time {
            p.max_frame_time = Duration::try_from_secs_f64(secs).map_err(|e| {
                Error::InvalidParam(format!("max_frame_time {secs}: {e}"))
            })?;
        }
        p.validate()?;
        Ok(p)
    }
}

/// Shape of an explicitly placed body
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ShapeConfig {
    Circle { radius: f64 },
    Rectangle { width: f64, height: f64 },
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    #[serde(flatten)]
    pub shape: ShapeConfig,
    pub x: Vec<f64>, // position (circle center, rectangle top-left corner)
    #[serde(default)]
    pub v: Vec<f64>, // velocity, defaults to rest
    pub damping: Option<f64>, // falls back to parameters.damping
    pub color: Option<[f32; 3]>, // random when omitted
}

/// Lattice of identical circles, laid out column by column
#[derive(Deserialize, Debug, Clone)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub spacing: f64,
    pub origin: [f64; 2],
    pub radius: f64,
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub jitter: f64,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub world: WorldConfig,
    pub seed: Option<u64>,
    #[serde(default)]
    pub parameters: ParametersConfig,
    pub grid: Option<GridConfig>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(reader)?)
    }
}
