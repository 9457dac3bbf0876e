use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use source_field_core::{EnvConfig, EnvError, Environment, Observation, SampleMode};

fn to_py_err(err: EnvError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn label_from_code(code: u8) -> PyResult<Observation> {
    Observation::from_code(code)
        .ok_or_else(|| PyValueError::new_err(format!("unknown observation code {code}")))
}

/// Python view of the sensing environment.
///
/// Labels cross the boundary as ints: NEGATIVE = 0, POSITIVE = 1, UNKNOWN = 2.
#[pyclass(name = "Environment")]
struct PyEnvironment {
    inner: Environment,
}

#[pymethods]
impl PyEnvironment {
    #[new]
    #[pyo3(signature = (start_x, start_y, end_x, end_y, dl, source_x, source_y, seed=0))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        dl: f64,
        source_x: f64,
        source_y: f64,
        seed: u64,
    ) -> PyResult<Self> {
        let config =
            EnvConfig::from_args(start_x, start_y, end_x, end_y, dl, source_x, source_y)
                .with_seed(seed);
        let inner = Environment::try_new(config).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn set_source_origin(&mut self, sx: f64, sy: f64) -> PyResult<()> {
        self.inner.set_source_origin(sx, sy).map_err(to_py_err)
    }

    #[pyo3(signature = (x, y, commit=true))]
    fn sample_observation(&mut self, x: f64, y: f64, commit: bool) -> PyResult<u8> {
        let mode = if commit {
            SampleMode::Commit
        } else {
            SampleMode::DryRun
        };
        self.inner
            .sample_observation(x, y, mode)
            .map(Observation::code)
            .map_err(to_py_err)
    }

    fn clear_observation_map(&mut self) {
        self.inner.clear_observation_map();
    }

    fn reseed(&mut self, seed: u64) {
        self.inner.reseed(seed);
    }

    /// Field rows, `field()[j][i]` at mesh point `(xs[i], ys[j])`.
    fn field(&self) -> Vec<Vec<f64>> {
        self.inner.field_snapshot().values
    }

    fn observation_map(&self) -> Vec<Vec<u32>> {
        self.inner
            .observation_map()
            .rows()
            .map(|row| row.iter().map(|l| u32::from(l.code())).collect())
            .collect()
    }

    fn observed_points(&self, label: u8) -> PyResult<Vec<(f64, f64)>> {
        let label = label_from_code(label)?;
        Ok(self
            .inner
            .observed_points(label)
            .into_iter()
            .map(|[x, y]| (x, y))
            .collect())
    }

    fn axes(&self) -> (Vec<f64>, Vec<f64>) {
        let grid = self.inner.grid();
        (grid.xs().to_vec(), grid.ys().to_vec())
    }

    /// `(start_x, end_x, start_y, end_y)`, the extent order plotting libraries expect.
    fn extent(&self) -> (f64, f64, f64, f64) {
        let b = self.inner.grid().bounds();
        (b.start_x, b.end_x, b.start_y, b.end_y)
    }

    fn source_origin(&self) -> (f64, f64) {
        let [sx, sy] = self.inner.source_origin();
        (sx, sy)
    }

    #[pyo3(signature = (include_points=true))]
    fn snapshot_json(&self, include_points: bool) -> PyResult<String> {
        serde_json::to_string(&self.inner.snapshot(include_points))
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("NEGATIVE", Observation::Negative.code())?;
    m.add("POSITIVE", Observation::Positive.code())?;
    m.add("UNKNOWN", Observation::Unknown.code())?;
    m.add_class::<PyEnvironment>()?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    Ok(())
}
