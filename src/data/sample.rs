//! Deterministic synthetic data for exploratory operations.

use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Sine wave over `[0, 4π]` with Gaussian noise. Same seed, same bytes.
pub fn sine_wave(size: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let span = 4.0 * std::f64::consts::PI;
    (0..size)
        .map(|i| {
            let x = if size > 1 {
                i as f64 * span / (size - 1) as f64
            } else {
                0.0
            };
            let noise: f64 = rng.sample(StandardNormal);
            x.sin() + 0.1 * noise
        })
        .collect()
}

/// Seeded uniform matrix used when a math operation is invoked without
/// input data.
pub fn uniform_matrix(rows: usize, cols: usize, seed: u64) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    ArrayD::from_shape_fn(IxDyn(&[rows, cols]), |_| rng.gen::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_wave() {
        assert_eq!(sine_wave(50, 42), sine_wave(50, 42));
    }

    #[test]
    fn different_seeds_differ() {
        assert_ne!(sine_wave(50, 42), sine_wave(50, 43));
    }

    #[test]
    fn wave_values_are_bounded() {
        for v in sine_wave(200, 7) {
            assert!(v.abs() < 2.0, "unexpected amplitude: {}", v);
        }
    }

    #[test]
    fn matrix_is_deterministic_and_uniform() {
        let a = uniform_matrix(10, 5, 42);
        let b = uniform_matrix(10, 5, 42);
        assert_eq!(a, b);
        assert_eq!(a.shape(), &[10, 5]);
        assert!(a.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
