use crate::config::{Bounds, EnvConfig};

/// Uniform 2D grid over a half-open bounding box.
///
/// Axis `k` holds `start + k * dl` for every `k` with `start + k * dl < end`,
/// giving `ceil((end - start) / dl)` points per axis. Cell `(i, j)` is the mesh
/// point `(xs[i], ys[j])`; `i` runs along x and `j` along y.
#[derive(Clone, Debug)]
pub struct Grid {
    bounds: Bounds,
    dl: f64,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Grid {
    /// Coordinates within this fraction of a cell below a grid line resolve to
    /// that line, absorbing round-off such as `0.7 / 0.1 = 6.999...`.
    ///
    /// This departs from a literal `floor`: a point genuinely less than
    /// `1e-9 * dl` below a line lands in the cell that starts on that line.
    pub const SNAP_TOLERANCE: f64 = 1e-9;

    /// Build the grid for an already validated config.
    pub(crate) fn from_config(config: &EnvConfig) -> Self {
        let b = config.bounds;
        Self {
            bounds: b,
            dl: config.dl,
            xs: axis(b.start_x, b.end_x, config.dl),
            ys: axis(b.start_y, b.end_y, config.dl),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn dl(&self) -> f64 {
        self.dl
    }

    pub fn width(&self) -> usize {
        self.xs.len()
    }

    pub fn height(&self) -> usize {
        self.ys.len()
    }

    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Mesh coordinate of cell `(i, j)`.
    pub fn point(&self, i: usize, j: usize) -> Option<[f64; 2]> {
        Some([*self.xs.get(i)?, *self.ys.get(j)?])
    }

    /// Map a continuous coordinate to its cell.
    ///
    /// Returns `None` unless `start <= v < end` holds on both axes. Inside the
    /// box the index is `floor((v - start) / dl + SNAP_TOLERANCE)`, capped at
    /// the last cell.
    pub fn cell_index(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let i = axis_index(x, self.bounds.start_x, self.dl, self.width());
        let j = axis_index(y, self.bounds.start_y, self.dl, self.height());
        Some((i, j))
    }

    /// Row-major offset (rows along y) of cell `(i, j)`.
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        j * self.width() + i
    }
}

fn axis(start: f64, end: f64, dl: f64) -> Vec<f64> {
    let len = ((end - start) / dl).ceil() as usize;
    (0..len).map(|k| start + k as f64 * dl).collect()
}

fn axis_index(value: f64, start: f64, dl: f64, len: usize) -> usize {
    let raw = ((value - start) / dl + Grid::SNAP_TOLERANCE).floor();
    (raw.max(0.0) as usize).min(len - 1)
}
