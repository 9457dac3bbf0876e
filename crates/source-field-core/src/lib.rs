//! Ring-shaped source field on a uniform 2D grid, with Bernoulli observations
//! and a persistent per-cell observation map.

pub mod config;
pub mod environment;
pub mod field;
pub mod grid;
pub mod observation;
pub mod shared;

pub use config::{Bounds, EnvConfig, EnvConfigError};
pub use environment::{EnvError, Environment, EnvironmentSnapshot};
pub use observation::{Observation, SampleMode};
pub use shared::SharedEnvironment;
