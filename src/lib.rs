pub mod simulation;
pub mod configuration;
pub mod benchmark;
pub mod error;

pub use error::{Error, Result};

pub use simulation::states::{Body, Color, NVec2, Shape, ShapeKind};
pub use simulation::params::{Bounds, Parameters, Toggle};
pub use simulation::forces::{Force, ForceSet, RadialGravity, VerticalGravity};
pub use simulation::engine::{SharedSimulation, Simulation, StepReport};
pub use simulation::springs::SpringChurn;
pub use simulation::scenario::Scenario;

pub use configuration::config::{BodyConfig, GridConfig, ParametersConfig, ScenarioConfig, ShapeConfig, WorldConfig};

pub use benchmark::benchmark::bench_step;
