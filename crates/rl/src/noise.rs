//! Sampling helpers over [`fastrand::Rng`].
//!
//! Gaussian samples use the Box-Muller transform.

use std::f64::consts::TAU;

/// Uniform sample in `[low, high)`.
pub fn uniform(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + (high - low) * rng.f64()
}

/// Standard normal sample.
pub fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    // 1 - u keeps the log argument in (0, 1].
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Fair coin flip.
pub fn coin(rng: &mut fastrand::Rng) -> bool {
    rng.bool()
}

/// Derive an independent stream seed from a base seed (splitmix64 finalizer).
#[must_use]
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stays_in_bounds() {
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..1000 {
            let x = uniform(&mut rng, -0.1, 0.1);
            assert!((-0.1..0.1).contains(&x));
        }
    }

    #[test]
    fn normal_moments() {
        let mut rng = fastrand::Rng::with_seed(11);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / f64::from(n);
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / f64::from(n);
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
        assert!(samples.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn derived_streams_differ() {
        assert_ne!(derive_seed(7, 0), derive_seed(7, 1));
        assert_eq!(derive_seed(7, 1), derive_seed(7, 1));
    }
}
