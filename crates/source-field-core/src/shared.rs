use crate::environment::{EnvError, Environment, EnvironmentSnapshot};
use crate::observation::{Observation, SampleMode};
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::sync::{Arc, Mutex, MutexGuard};

/// Thread-safe handle to an [`Environment`].
///
/// Each call takes the single lock for its whole duration, so the random draw
/// and the observation-map write of one sample are atomic with respect to
/// every other caller.
pub struct SharedEnvironment<R = ChaCha12Rng> {
    inner: Arc<Mutex<Environment<R>>>,
}

impl<R> Clone for SharedEnvironment<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Rng> SharedEnvironment<R> {
    pub fn new(env: Environment<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(env)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Environment<R>>, EnvError> {
        self.inner.lock().map_err(|_| EnvError::LockPoisoned)
    }

    /// Run `f` with exclusive access to the environment.
    pub fn with<T>(&self, f: impl FnOnce(&mut Environment<R>) -> T) -> Result<T, EnvError> {
        let mut env = self.lock()?;
        Ok(f(&mut env))
    }

    pub fn sample_observation(
        &self,
        x: f64,
        y: f64,
        mode: SampleMode,
    ) -> Result<Observation, EnvError> {
        self.lock()?.sample_observation(x, y, mode)
    }

    pub fn set_source_origin(&self, sx: f64, sy: f64) -> Result<(), EnvError> {
        self.lock()?.set_source_origin(sx, sy)
    }

    pub fn clear_observation_map(&self) -> Result<(), EnvError> {
        self.lock()?.clear_observation_map();
        Ok(())
    }

    pub fn snapshot(&self, include_points: bool) -> Result<EnvironmentSnapshot, EnvError> {
        Ok(self.lock()?.snapshot(include_points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, EnvConfig};
    use std::thread;

    #[test]
    fn concurrent_samples_commit_every_cell() {
        let config = EnvConfig::new(Bounds::new(0.0, 0.0, 1.0, 1.0), 0.1, [0.5, 0.5]).with_seed(3);
        let shared = SharedEnvironment::new(Environment::new(config));

        thread::scope(|s| {
            for row in 0..4 {
                let handle = shared.clone();
                s.spawn(move || {
                    for _ in 0..50 {
                        for col in 0..10 {
                            let x = col as f64 * 0.1 + 0.05;
                            let y = row as f64 * 0.1 + 0.05;
                            handle
                                .sample_observation(x, y, SampleMode::Commit)
                                .unwrap();
                        }
                    }
                });
            }
        });

        let snapshot = shared.snapshot(false).unwrap();
        assert_eq!(snapshot.observations.summary.observed(), 40);
        assert_eq!(snapshot.observations.summary.unknown, 60);

        shared.clear_observation_map().unwrap();
        let observed = shared
            .with(|env| env.observation_summary().observed())
            .unwrap();
        assert_eq!(observed, 0);
    }

    #[test]
    fn shared_origin_changes_are_visible_to_all_handles() {
        let config = EnvConfig::centered(Bounds::new(0.0, 0.0, 1.0, 1.0), 0.1);
        let a = SharedEnvironment::new(Environment::new(config));
        let b = a.clone();
        a.set_source_origin(0.2, 0.8).unwrap();
        assert_eq!(b.with(|env| env.source_origin()).unwrap(), [0.2, 0.8]);
        assert!(b
            .sample_observation(5.0, 5.0, SampleMode::DryRun)
            .is_err());
    }
}
