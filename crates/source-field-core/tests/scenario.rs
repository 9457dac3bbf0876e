use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use source_field_core::{Bounds, EnvConfig, EnvError, Environment, Observation, SampleMode};

fn positive_rate(env: &mut Environment, x: f64, y: f64, trials: usize) -> f64 {
    let hits = (0..trials)
        .filter(|_| env.probe_observation(x, y).unwrap() == Observation::Positive)
        .count();
    hits as f64 / trials as f64
}

#[test]
fn ring_and_centre_detection_rates() {
    let config = EnvConfig::new(Bounds::new(0.0, 0.0, 1.0, 1.0), 0.1, [0.0, 0.0]).with_seed(42);
    let mut env = Environment::try_new(config).unwrap();
    assert_eq!((env.grid().width(), env.grid().height()), (10, 10));

    env.set_source_origin(0.5, 0.5).unwrap();
    assert!(positive_rate(&mut env, 0.5, 0.7, 50) >= 0.95);
    assert!(positive_rate(&mut env, 0.5, 0.5, 50) <= 0.1);
    assert_eq!(env.observation_summary().observed(), 0);
}

#[test]
fn random_survey_then_reset() {
    let bounds = Bounds::new(0.0, 0.0, 1.0, 1.0);
    let config = EnvConfig::new(bounds, 0.01, [0.3, 0.4]).with_seed(7);
    let mut env = Environment::try_new(config).unwrap();
    let mut rng = ChaCha12Rng::seed_from_u64(8);

    let mut positives = 0;
    for _ in 0..100 {
        let x = bounds.start_x + rng.random::<f64>() * bounds.width();
        let y = bounds.start_y + rng.random::<f64>() * bounds.height();
        if env.sample_observation(x, y, SampleMode::Commit).unwrap() == Observation::Positive {
            positives += 1;
        }
    }

    let summary = env.observation_summary();
    assert!(summary.observed() <= 100);
    assert!(summary.positive <= positives);
    assert_eq!(
        env.observed_points(Observation::Positive).len(),
        summary.positive
    );
    assert_eq!(summary.observed() + summary.unknown, 100 * 100);

    env.clear_observation_map();
    assert_eq!(env.observation_summary().unknown, 100 * 100);
}

#[test]
fn off_grid_source_is_allowed_but_off_grid_queries_are_not() {
    let config = EnvConfig::new(Bounds::new(-1.0, -1.0, 1.0, 1.0), 0.05, [3.0, -3.0]);
    let mut env = Environment::try_new(config).unwrap();
    assert!(env.field().max() < 1e-50);
    assert_eq!(
        env.probe_observation(-1.0, 1.0),
        Err(EnvError::OutOfBounds { x: -1.0, y: 1.0 })
    );
    assert_eq!(env.probe_observation(-1.0, -1.0), Ok(Observation::Negative));
}
