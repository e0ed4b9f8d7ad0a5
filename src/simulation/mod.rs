pub mod utils;
pub mod states;
pub mod params;
pub mod forces;
pub mod springs;
pub mod integrator;
pub mod collision;
pub mod engine;
pub mod scenario;
