use crate::grid::Grid;
use rayon::prelude::*;

/// Distance from the source at which the intensity peaks.
pub const RING_RADIUS: f64 = 0.2;
/// Falloff coefficient of the ring around `RING_RADIUS`.
pub const RING_SHARPNESS: f64 = 100.0;

/// Intensity at Euclidean `distance` from the source: `exp(-100 * (d - 0.2)^2)`.
///
/// Clamped below at the smallest positive normal so values stay in `(0, 1]`
/// when the exponential underflows far from the ring.
pub fn ring_intensity(distance: f64) -> f64 {
    let offset = distance - RING_RADIUS;
    (-RING_SHARPNESS * offset * offset)
        .exp()
        .max(f64::MIN_POSITIVE)
}

/// Detection probability per grid cell, rows along y.
#[derive(Clone, Debug)]
pub struct IntensityField {
    pub width: usize,
    pub height: usize,
    data: Vec<f64>,
}

impl IntensityField {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Recompute every cell for a source at `origin`.
    pub fn regenerate(&mut self, grid: &Grid, origin: [f64; 2]) {
        debug_assert_eq!((self.width, self.height), (grid.width(), grid.height()));
        let xs = grid.xs();
        let ys = grid.ys();
        let [sx, sy] = origin;
        self.data
            .par_chunks_mut(self.width)
            .zip(ys.par_iter())
            .for_each(|(row, &y)| {
                let dy = y - sy;
                for (v, &x) in row.iter_mut().zip(xs) {
                    *v = ring_intensity((x - sx).hypot(dy));
                }
            });
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.width || j >= self.height {
            return None;
        }
        Some(self.data[j * self.width + i])
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.width)
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, EnvConfig};
    use approx::assert_abs_diff_eq;

    #[test]
    fn ring_peaks_at_radius() {
        assert_abs_diff_eq!(ring_intensity(RING_RADIUS), 1.0);
        assert_abs_diff_eq!(ring_intensity(0.0), (-4.0f64).exp(), epsilon = 1e-15);
        assert!(ring_intensity(0.1) < 1.0);
        assert!(ring_intensity(0.3) < 1.0);
        assert_abs_diff_eq!(ring_intensity(0.1), ring_intensity(0.3), epsilon = 1e-12);
    }

    #[test]
    fn far_cells_stay_strictly_positive() {
        assert!(ring_intensity(50.0) > 0.0);
    }

    #[test]
    fn regenerate_fills_every_cell() {
        let config = EnvConfig::new(Bounds::new(0.0, 0.0, 1.0, 0.5), 0.1, [0.5, 0.25]);
        let grid = Grid::from_config(&config);
        let mut field = IntensityField::zeros(grid.width(), grid.height());
        field.regenerate(&grid, config.source_origin);

        assert_eq!(field.rows().count(), 5);
        assert!(field.data().iter().all(|&v| v > 0.0 && v <= 1.0));
        let [x, y] = grid.point(3, 1).unwrap();
        let expected = ring_intensity((x - 0.5).hypot(y - 0.25));
        assert_abs_diff_eq!(field.get(3, 1).unwrap(), expected);
        assert_eq!(field.get(10, 0), None);
    }
}
