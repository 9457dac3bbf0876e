pub mod snapshot;

pub use snapshot::*;

use crate::config::{EnvConfig, EnvConfigError};
use crate::field::IntensityField;
use crate::grid::Grid;
use crate::observation::{Observation, ObservationMap, SampleMode};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum EnvError {
    InvalidConfiguration(EnvConfigError),
    OutOfBounds { x: f64, y: f64 },
    LockPoisoned,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvError::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
            EnvError::OutOfBounds { x, y } => {
                write!(f, "coordinate ({x}, {y}) lies outside the grid")
            }
            EnvError::LockPoisoned => write!(f, "environment lock was poisoned"),
        }
    }
}

impl From<EnvConfigError> for EnvError {
    fn from(err: EnvConfigError) -> Self {
        EnvError::InvalidConfiguration(err)
    }
}

impl Error for EnvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EnvError::InvalidConfiguration(e) => Some(e),
            _ => None,
        }
    }
}

/// Ground-truth sensing environment.
///
/// Owns the grid, the intensity field for the current source origin, the
/// observation map and the random source used for sampling. Every operation
/// either succeeds completely or returns an error without touching state.
pub struct Environment<R = ChaCha12Rng> {
    config: EnvConfig,
    grid: Grid,
    field: IntensityField,
    observations: ObservationMap,
    rng: R,
}

impl Environment<ChaCha12Rng> {
    pub fn new(config: EnvConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Build an environment sampling from `ChaCha12Rng` seeded with `config.seed`.
    pub fn try_new(config: EnvConfig) -> Result<Self, EnvError> {
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Self::try_with_rng(config, rng)
    }

    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }
}

impl<R: Rng> Environment<R> {
    pub fn try_with_rng(config: EnvConfig, rng: R) -> Result<Self, EnvError> {
        config.validate()?;
        let grid = Grid::from_config(&config);
        let mut field = IntensityField::zeros(grid.width(), grid.height());
        field.regenerate(&grid, config.source_origin);
        let observations = ObservationMap::new(grid.width(), grid.height());
        debug!(
            width = grid.width(),
            height = grid.height(),
            dl = config.dl,
            source_x = config.source_origin[0],
            source_y = config.source_origin[1],
            "environment constructed"
        );
        Ok(Self {
            config,
            grid,
            field,
            observations,
            rng,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn field(&self) -> &IntensityField {
        &self.field
    }

    pub fn observation_map(&self) -> &ObservationMap {
        &self.observations
    }

    pub fn source_origin(&self) -> [f64; 2] {
        self.config.source_origin
    }

    /// Swap in a different random source, returning the previous one.
    pub fn replace_rng(&mut self, rng: R) -> R {
        std::mem::replace(&mut self.rng, rng)
    }

    /// Move the source and regenerate the whole field.
    ///
    /// Origins outside the grid bounds are accepted; the ring then falls
    /// partly or entirely off the grid. The observation map is left as is.
    pub fn set_source_origin(&mut self, sx: f64, sy: f64) -> Result<(), EnvError> {
        if !sx.is_finite() {
            return Err(EnvConfigError::NonFinite {
                name: "source_origin.x",
            }
            .into());
        }
        if !sy.is_finite() {
            return Err(EnvConfigError::NonFinite {
                name: "source_origin.y",
            }
            .into());
        }
        self.config.source_origin = [sx, sy];
        self.field.regenerate(&self.grid, self.config.source_origin);
        debug!(source_x = sx, source_y = sy, "source origin moved");
        Ok(())
    }

    /// Field value of the cell containing `(x, y)`.
    pub fn intensity_at(&self, x: f64, y: f64) -> Result<f64, EnvError> {
        let (i, j) = self.locate(x, y)?;
        Ok(self.field.data()[self.grid.flat_index(i, j)])
    }

    /// Draw one Bernoulli trial with success probability equal to the field
    /// value of the cell containing `(x, y)`.
    ///
    /// A uniform draw `u` in `[0, 1)` yields `Positive` when `u < Z` and
    /// `Negative` otherwise, so a draw equal to `Z` counts as negative. The
    /// bounds check runs before the draw; an out-of-bounds call consumes no
    /// randomness.
    pub fn sample_observation(
        &mut self,
        x: f64,
        y: f64,
        mode: SampleMode,
    ) -> Result<Observation, EnvError> {
        let (i, j) = self.locate(x, y)?;
        let p = self.field.data()[self.grid.flat_index(i, j)];
        let u: f64 = self.rng.random();
        let label = if u < p {
            Observation::Positive
        } else {
            Observation::Negative
        };
        if mode == SampleMode::Commit {
            self.observations.set(i, j, label);
        }
        Ok(label)
    }

    pub fn register_observation(&mut self, x: f64, y: f64) -> Result<Observation, EnvError> {
        self.sample_observation(x, y, SampleMode::Commit)
    }

    pub fn probe_observation(&mut self, x: f64, y: f64) -> Result<Observation, EnvError> {
        self.sample_observation(x, y, SampleMode::DryRun)
    }

    pub fn clear_observation_map(&mut self) {
        self.observations.clear();
        debug!("observation map cleared");
    }

    fn locate(&self, x: f64, y: f64) -> Result<(usize, usize), EnvError> {
        self.grid
            .cell_index(x, y)
            .ok_or(EnvError::OutOfBounds { x, y })
    }
}
