use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Axis-aligned rectangle covered by the environment grid.
///
/// The box is half-open: a coordinate `x` lies inside when `start_x <= x < end_x`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl Bounds {
    pub fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> f64 {
        self.end_y - self.start_y
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.start_x + self.end_x) / 2.0,
            (self.start_y + self.end_y) / 2.0,
        ]
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.start_x..self.end_x).contains(&x) && (self.start_y..self.end_y).contains(&y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Construction parameters for an [`Environment`](crate::environment::Environment).
///
/// Bounds and step are fixed for the lifetime of the environment. The source
/// origin has no implicit default; use [`EnvConfig::centered`] to place it at
/// the middle of the bounds explicitly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub bounds: Bounds,
    pub dl: f64,
    pub source_origin: [f64; 2],
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnvConfigError {
    NonFinite { name: &'static str },
    NonPositiveStep { dl: f64 },
    EmptyAxis { axis: Axis, start: f64, end: f64 },
    GridTooLarge { max: usize },
    Parse(String),
}

impl fmt::Display for EnvConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvConfigError::NonFinite { name } => write!(f, "{name} must be finite"),
            EnvConfigError::NonPositiveStep { dl } => {
                write!(f, "grid step dl must be positive (got {dl})")
            }
            EnvConfigError::EmptyAxis { axis, start, end } => write!(
                f,
                "{axis}-axis is empty: end ({end}) must be greater than start ({start})"
            ),
            EnvConfigError::GridTooLarge { max } => {
                write!(f, "grid exceeds supported maximum of {max} cells")
            }
            EnvConfigError::Parse(msg) => write!(f, "invalid config document: {msg}"),
        }
    }
}

impl Error for EnvConfigError {}

impl EnvConfig {
    pub const MAX_GRID_CELLS: usize = 1 << 26;

    pub fn new(bounds: Bounds, dl: f64, source_origin: [f64; 2]) -> Self {
        Self {
            bounds,
            dl,
            source_origin,
            seed: 0,
        }
    }

    /// Config from the flat argument order `(start_x, start_y, end_x, end_y, dl,
    /// source_x, source_y)` used by the command line and the Python bindings.
    pub fn from_args(
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        dl: f64,
        source_x: f64,
        source_y: f64,
    ) -> Self {
        Self::new(
            Bounds::new(start_x, start_y, end_x, end_y),
            dl,
            [source_x, source_y],
        )
    }

    /// Config whose source origin sits at the center of `bounds`.
    pub fn centered(bounds: Bounds, dl: f64) -> Self {
        Self::new(bounds, dl, bounds.center())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, EnvConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| EnvConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EnvConfigError> {
        let b = &self.bounds;
        let finite_checks = [
            ("start_x", b.start_x),
            ("start_y", b.start_y),
            ("end_x", b.end_x),
            ("end_y", b.end_y),
            ("dl", self.dl),
            ("source_origin.x", self.source_origin[0]),
            ("source_origin.y", self.source_origin[1]),
        ];
        if let Some(&(name, _)) = finite_checks.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EnvConfigError::NonFinite { name });
        }
        if self.dl <= 0.0 {
            return Err(EnvConfigError::NonPositiveStep { dl: self.dl });
        }
        if b.end_x <= b.start_x {
            return Err(EnvConfigError::EmptyAxis {
                axis: Axis::X,
                start: b.start_x,
                end: b.end_x,
            });
        }
        if b.end_y <= b.start_y {
            return Err(EnvConfigError::EmptyAxis {
                axis: Axis::Y,
                start: b.start_y,
                end: b.end_y,
            });
        }
        // Axis lengths as the grid computes them; a span far below dl can round to zero.
        let nx = (b.width() / self.dl).ceil();
        let ny = (b.height() / self.dl).ceil();
        if nx < 1.0 {
            return Err(EnvConfigError::EmptyAxis {
                axis: Axis::X,
                start: b.start_x,
                end: b.end_x,
            });
        }
        if ny < 1.0 {
            return Err(EnvConfigError::EmptyAxis {
                axis: Axis::Y,
                start: b.start_y,
                end: b.end_y,
            });
        }
        let cells = nx * ny;
        if !cells.is_finite() || cells > Self::MAX_GRID_CELLS as f64 {
            return Err(EnvConfigError::GridTooLarge {
                max: Self::MAX_GRID_CELLS,
            });
        }
        Ok(())
    }
}
